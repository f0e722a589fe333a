//! Single-strand nucleotide helpers.

/// Complement of an A/C/G/T letter, keeping its case. Anything else is returned as-is.
#[inline(always)]
pub fn letter_complement(letter: char) -> char {
    match letter {
        'A' => 'T',
        'C' => 'G',
        'G' => 'C',
        'T' => 'A',
        'a' => 't',
        'c' => 'g',
        'g' => 'c',
        't' => 'a',
        _ => letter,
    }
}

pub fn reverse_complement(seq: &str) -> String {
    seq.chars().rev().map(letter_complement).collect()
}

/// Number of positions at which two equally long sequences differ, ignoring case.
pub fn hamming(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b.iter())
        .filter(|(x, y)| !x.eq_ignore_ascii_case(y))
        .count()
}

#[inline(always)]
pub fn is_acgt(letter: u8) -> bool {
    matches!(letter.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T')
}

pub fn gc_fraction(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let gc = seq
        .iter()
        .map(|c| c.to_ascii_uppercase())
        .filter(|&c| c == b'G' || c == b'C')
        .count() as f64;
    gc / seq.len() as f64
}
