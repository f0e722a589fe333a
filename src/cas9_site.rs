//! SpCas9 target sites (N20-NGG) around a codon of interest.

use crate::nucleotide::{is_acgt, reverse_complement};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const SPACER_LENGTH: usize = 20;
pub const PAM_LENGTH: usize = 3;
pub const SITE_LENGTH: usize = SPACER_LENGTH + PAM_LENGTH;
/// Cut position relative to the start of the matched 23-mer
pub const CUT_OFFSET: usize = 17;

const FORWARD_CRITICAL: [usize; 2] = [21, 22];
const REVERSE_CRITICAL: [usize; 2] = [0, 1];
const FORWARD_SEED: Range<usize> = 10..20;
const REVERSE_SEED: Range<usize> = 3..13;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cas9Site {
    /// Offset of the match start in the gene
    pub position: usize,
    /// The 23-nt match as found on the forward strand
    pub sequence: String,
    pub strand: Strand,
}

impl Cas9Site {
    pub fn cut_position(&self) -> usize {
        self.position + CUT_OFFSET
    }

    pub fn distance_to(&self, target: usize) -> usize {
        self.position.abs_diff(target)
    }

    /// Gene offsets of the PAM "GG" (or "CC" on the reverse strand).
    pub fn critical_positions(&self) -> [usize; 2] {
        let offsets = match self.strand {
            Strand::Forward => FORWARD_CRITICAL,
            Strand::Reverse => REVERSE_CRITICAL,
        };
        offsets.map(|o| self.position + o)
    }

    pub fn seed_positions(&self) -> Range<usize> {
        let seed = match self.strand {
            Strand::Forward => FORWARD_SEED,
            Strand::Reverse => REVERSE_SEED,
        };
        self.position + seed.start..self.position + seed.end
    }

    /// Spacer followed by PAM, 5'->3' on the targeted strand. Split it at
    /// `SPACER_LENGTH` for the two parts.
    pub fn guide_with_pam(&self) -> String {
        match self.strand {
            Strand::Forward => self.sequence.clone(),
            Strand::Reverse => reverse_complement(&self.sequence),
        }
    }

    fn is_forward_match(s: &[u8]) -> bool {
        is_acgt(s[SPACER_LENGTH])
            && s[SPACER_LENGTH + 1].eq_ignore_ascii_case(&b'G')
            && s[SPACER_LENGTH + 2].eq_ignore_ascii_case(&b'G')
    }

    fn is_reverse_match(s: &[u8]) -> bool {
        s[0].eq_ignore_ascii_case(&b'C') && s[1].eq_ignore_ascii_case(&b'C')
    }

    /// The `[start, end)` scan window of `width` nt centred on `target`, clamped to the sequence.
    pub fn search_window(seq_len: usize, target: usize, width: usize) -> Range<usize> {
        let start = target.saturating_sub(width / 2).min(seq_len);
        let end = (target + width - width / 2).min(seq_len);
        start..end
    }

    /// All overlapping sites within the window, nearest to `target` first.
    pub fn find_sites(sequence: &[u8], target: usize, window_width: usize) -> Vec<Cas9Site> {
        let window = Self::search_window(sequence.len(), target, window_width);
        let mut ret = vec![];
        for (strand, matches) in [
            (Strand::Forward, Self::is_forward_match as fn(&[u8]) -> bool),
            (Strand::Reverse, Self::is_reverse_match as fn(&[u8]) -> bool),
        ] {
            if window.len() < SITE_LENGTH {
                break;
            }
            for start in window.start..=window.end - SITE_LENGTH {
                let s = &sequence[start..start + SITE_LENGTH];
                if matches(s) {
                    ret.push(Cas9Site {
                        position: start,
                        sequence: String::from_utf8_lossy(s).to_string(),
                        strand,
                    });
                }
            }
        }
        ret.sort_by_key(|site| site.distance_to(target));
        ret
    }
}
