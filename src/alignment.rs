use serde::{Deserialize, Serialize};

pub const GAP: char = '-';
pub const MATCH: char = '|';
pub const CODON_SEPARATOR: char = ' ';

/// An original/modified pair with a match line between them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentData {
    original: String,
    modified: String,
    matches: String,
}

impl AlignmentData {
    pub fn new(original: &str, modified: &str) -> Self {
        Self {
            original: original.to_string(),
            modified: modified.to_string(),
            matches: alignment_match_string(original, modified),
        }
    }

    #[inline(always)]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[inline(always)]
    pub fn modified(&self) -> &str {
        &self.modified
    }

    #[inline(always)]
    pub fn matches(&self) -> &str {
        &self.matches
    }

    pub fn identical_positions(&self) -> usize {
        self.matches.chars().filter(|&c| c == MATCH).count()
    }

    /// Three codon-spaced rows: original, match line, modified.
    pub fn render(&self, frame: usize) -> String {
        format!(
            "{}\n{}\n{}",
            codon_spaced_format(&self.original, frame),
            codon_spaced_format(&self.matches, frame),
            codon_spaced_format(&self.modified, frame)
        )
    }
}

/// `|` wherever both strings carry the same non-gap character, blank elsewhere.
pub fn alignment_match_string(a: &str, b: &str) -> String {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    (0..a.len().max(b.len()))
        .map(|i| match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) if x == y && *x != GAP => MATCH,
            _ => ' ',
        })
        .collect()
}

/// Separates codons with a space. `frame` is the index of the first complete
/// codon; gap characters are copied but not counted.
pub fn codon_spaced_format(seq: &str, frame: usize) -> String {
    let frame = frame % 3;
    let mut ret = String::with_capacity(seq.len() + seq.len() / 3 + 1);
    let mut counted = 0;
    for c in seq.chars() {
        ret.push(c);
        if c == GAP {
            continue;
        }
        counted += 1;
        if counted % 3 == frame {
            ret.push(CODON_SEPARATOR);
        }
    }
    if ret.ends_with(CODON_SEPARATOR) {
        ret.pop();
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_string() {
        assert_eq!(alignment_match_string("ACGT", "ACCT"), "|| |");
        assert_eq!(alignment_match_string("AC-T", "AC-T"), "|| |");
        assert_eq!(alignment_match_string("ACG", "ACGTT"), "|||  ");
        assert_eq!(alignment_match_string("", "AC"), "  ");
    }

    #[test]
    fn test_match_string_is_case_sensitive() {
        assert_eq!(alignment_match_string("CTT", "CcT"), "| |");
    }

    #[test]
    fn test_codon_spaced_frame_0() {
        assert_eq!(codon_spaced_format("ATGCTTTAA", 0), "ATG CTT TAA");
        assert_eq!(codon_spaced_format("ATGCT", 0), "ATG CT");
    }

    #[test]
    fn test_codon_spaced_other_frames() {
        assert_eq!(codon_spaced_format("GATGCTT", 1), "G ATG CTT");
        assert_eq!(codon_spaced_format("GGATGC", 2), "GG ATG C");
    }

    #[test]
    fn test_codon_spaced_skips_gaps() {
        assert_eq!(codon_spaced_format("AT-GCTT", 0), "AT-G CTT");
        assert_eq!(codon_spaced_format("---", 0), "---");
    }

    #[test]
    fn test_render() {
        let alignment = AlignmentData::new("ATGCTT", "ATGCcT");
        assert_eq!(alignment.matches(), "|||| |");
        assert_eq!(alignment.identical_positions(), 5);
        assert_eq!(alignment.render(0), "ATG CTT\n||| | |\nATG CcT");
    }
}
