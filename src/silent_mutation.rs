//! Synonymous edits that keep Cas9 from re-cutting an edited locus.

use crate::{
    CODON_TABLE,
    cas9_site::Cas9Site,
    codon_table::{CODON_LENGTH, STOP},
    nucleotide::hamming,
};
use serde::{Deserialize, Serialize};

/// Total edits a seed-only disruption must reach. Heuristic; not calibrated.
pub const MIN_SEED_EDITS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    /// The requested substitution itself destroys the PAM
    PamDisruptedByTarget,
    PamSilent,
    SeedSilent,
}

/// An edited copy of the gene and how it was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disruption {
    pub strategy: Strategy,
    pub sequence: Vec<u8>,
    pub silent_mutation_count: usize,
}

/// Start offsets of reading-frame codons covering any of `positions`, ascending.
/// Codons running past the end of the sequence are left out.
pub fn overlapping_codons<I>(positions: I, seq_len: usize) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut ret: Vec<usize> = positions
        .into_iter()
        .map(|p| p - p % CODON_LENGTH)
        .filter(|start| start + CODON_LENGTH <= seq_len)
        .collect();
    ret.sort_unstable();
    ret.dedup();
    ret
}

/// Amino acid of the codon at `start`, unless it is a stop or unreadable.
fn sense_amino_acid(seq: &[u8], start: usize) -> Option<char> {
    CODON_TABLE
        .amino_acid(&seq[start..start + CODON_LENGTH])
        .filter(|aa| *aa != STOP)
}

/// Synonyms of the codon at `start`, excluding the codon itself.
fn alternative_codons(seq: &[u8], start: usize) -> Vec<&'static [u8]> {
    let current = &seq[start..start + CODON_LENGTH];
    let Some(aa) = sense_amino_acid(seq, start) else {
        return vec![];
    };
    CODON_TABLE
        .synonymous_codons(aa)
        .iter()
        .map(|c| c.as_bytes())
        .filter(|c| !c.eq_ignore_ascii_case(current))
        .filter(|c| CODON_TABLE.amino_acid(c) == Some(aa))
        .collect()
}

/// Codon offsets (0..3) at which `candidate` differs from the codon at `start`.
fn changed_offsets(seq: &[u8], start: usize, candidate: &[u8]) -> impl Iterator<Item = usize> {
    let current = seq[start..start + CODON_LENGTH].to_vec();
    let candidate = candidate.to_vec();
    (0..CODON_LENGTH).filter(move |&k| !current[k].eq_ignore_ascii_case(&candidate[k]))
}

fn replace_codon(seq: &[u8], start: usize, codon: &[u8]) -> Vec<u8> {
    let mut ret = seq.to_vec();
    ret[start..start + CODON_LENGTH].copy_from_slice(codon);
    ret
}

/// Does `edited` differ from `original` at one of the site's PAM critical bases?
pub fn pam_altered(original: &[u8], edited: &[u8], site: &Cas9Site) -> bool {
    site.critical_positions().iter().any(|&p| {
        match (original.get(p), edited.get(p)) {
            (Some(a), Some(b)) => !a.eq_ignore_ascii_case(b),
            _ => false,
        }
    })
}

/// Cheapest single synonymous codon swap that changes a PAM critical base.
pub fn pam_silent(seq: &[u8], site: &Cas9Site) -> Option<(Vec<u8>, usize)> {
    let critical = site.critical_positions();
    let mut best: Option<(usize, &[u8], usize)> = None;
    for start in overlapping_codons(critical, seq.len()) {
        for candidate in alternative_codons(seq, start) {
            let hits_pam = changed_offsets(seq, start, candidate)
                .any(|k| critical.contains(&(start + k)));
            if !hits_pam {
                continue;
            }
            let changes = hamming(&seq[start..start + CODON_LENGTH], candidate);
            if best.is_none_or(|(_, _, fewest)| changes < fewest) {
                best = Some((start, candidate, changes));
            }
        }
    }
    best.map(|(start, codon, changes)| (replace_codon(seq, start, codon), changes))
}

/// Walks the seed codons in order, taking the synonym with the most seed changes
/// for each, until at least `MIN_SEED_EDITS` bases have been edited.
pub fn seed_silent(seq: &[u8], site: &Cas9Site) -> Option<(Vec<u8>, usize)> {
    let seed = site.seed_positions();
    let mut working = seq.to_vec();
    let mut total = 0;
    for start in overlapping_codons(seed.clone(), seq.len()) {
        let mut best: Option<(&[u8], usize)> = None;
        for candidate in alternative_codons(&working, start) {
            let in_seed = changed_offsets(&working, start, candidate)
                .filter(|k| seed.contains(&(start + k)))
                .count();
            if best.is_none_or(|(_, most)| in_seed > most) {
                best = Some((candidate, in_seed));
            }
        }
        let Some((codon, in_seed)) = best else {
            continue;
        };
        if in_seed == 0 {
            continue;
        }
        total += hamming(&working[start..start + CODON_LENGTH], codon);
        working = replace_codon(&working, start, codon);
        if total >= MIN_SEED_EDITS {
            return Some((working, total));
        }
    }
    None
}

/// Applies the strategies in order of preference to a gene already carrying the
/// requested substitution. `None` means the site cannot be protected.
pub fn disrupt(original: &[u8], mutated: &[u8], site: &Cas9Site) -> Option<Disruption> {
    if pam_altered(original, mutated, site) {
        return Some(Disruption {
            strategy: Strategy::PamDisruptedByTarget,
            sequence: mutated.to_vec(),
            silent_mutation_count: 0,
        });
    }
    if let Some((sequence, changes)) = pam_silent(mutated, site) {
        return Some(Disruption {
            strategy: Strategy::PamSilent,
            sequence,
            silent_mutation_count: changes,
        });
    }
    seed_silent(mutated, site).map(|(sequence, changes)| Disruption {
        strategy: Strategy::SeedSilent,
        sequence,
        silent_mutation_count: changes,
    })
}
