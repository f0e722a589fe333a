//! Rule-based on-target efficiency estimate for a spacer+PAM.
//!
//! The weights are heuristic and uncalibrated against measured cutting data.

use crate::{cas9_site::PAM_LENGTH, nucleotide::gc_fraction};

const BASE_SCORE: i32 = 50;

fn gc_adjustment(spacer: &[u8]) -> i32 {
    let gc = gc_fraction(spacer);
    if (0.4..=0.6).contains(&gc) {
        20
    } else if (0.3..=0.8).contains(&gc) {
        10
    } else {
        -20
    }
}

/// Base immediately 5' of the PAM.
fn proximal_base_adjustment(spacer: &[u8]) -> i32 {
    match spacer.last() {
        Some(b'G') => 15,
        Some(b'C') => 5,
        Some(b'T') => -10,
        _ => 0,
    }
}

fn poly_t_adjustment(spacer: &[u8]) -> i32 {
    if spacer.windows(4).any(|w| w == b"TTTT") {
        -50
    } else {
        0
    }
}

fn pam_adjustment(pam: &[u8]) -> i32 {
    match pam {
        b"CGG" | b"TGG" => 5,
        b"GGG" => -5,
        _ => 0,
    }
}

fn seed_t_adjustment(spacer: &[u8]) -> i32 {
    let tail = &spacer[spacer.len().saturating_sub(10)..];
    if tail.iter().filter(|&&c| c == b'T').count() >= 4 {
        -10
    } else {
        0
    }
}

/// Scores a 23-nt guide+PAM from 0 to 100. The last three bases are taken as
/// the PAM and everything before them as the spacer.
pub fn calculate_efficiency_score(guide_with_pam: &str) -> u8 {
    let seq = guide_with_pam.to_ascii_uppercase().into_bytes();
    let (spacer, pam) = seq.split_at(seq.len().saturating_sub(PAM_LENGTH));
    let score = BASE_SCORE
        + gc_adjustment(spacer)
        + proximal_base_adjustment(spacer)
        + poly_t_adjustment(spacer)
        + pam_adjustment(pam)
        + seed_t_adjustment(spacer);
    score.clamp(0, 100) as u8
}
