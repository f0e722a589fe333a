//! Repair template synthesis: one Cas9 site in, one verified design out.

use crate::{
    CODON_TABLE,
    alignment::AlignmentData,
    cas9_site::{Cas9Site, SPACER_LENGTH},
    codon_table::{CODON_LENGTH, CodonTable, UNKNOWN_AMINO_ACID},
    efficiency::calculate_efficiency_score,
    error::{DesignError, Result},
    gene::GeneInfo,
    nucleotide::{hamming, reverse_complement},
    parameters::{DesignParameters, VectorAdapters},
    silent_mutation::{self, Strategy},
};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DesignRequest {
    pub gene: GeneInfo,
    /// 1-based
    pub residue: usize,
    pub amino_acid: char,
    #[serde(default)]
    pub parameters: DesignParameters,
}

impl DesignRequest {
    pub fn new(gene: GeneInfo, residue: usize, amino_acid: char) -> Self {
        Self {
            gene,
            residue,
            amino_acid,
            parameters: DesignParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: DesignParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Three-letter protein change, e.g. `Leu10Pro`.
    pub fn mutation_label(&self) -> String {
        let name = |aa: Option<char>| {
            aa.and_then(|aa| CODON_TABLE.three_letter(aa))
                .unwrap_or("Xaa")
                .to_string()
        };
        format!(
            "{}{}{}",
            name(self.gene.amino_acid(self.residue)),
            self.residue,
            name(Some(self.amino_acid))
        )
    }

    /// Checks gene, parameters and residue; returns the target codon offset.
    fn validate(&self) -> Result<usize> {
        self.gene.validate()?;
        self.parameters.validate()?;
        self.gene.residue_start(self.residue)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloningOligos {
    pub forward: String,
    pub reverse: String,
}

impl CloningOligos {
    pub fn new(spacer: &str, vector: &VectorAdapters) -> Self {
        Self {
            forward: format!("{}{}{}", vector.forward_5, spacer, vector.forward_3),
            reverse: format!(
                "{}{}{}",
                vector.reverse_5,
                reverse_complement(spacer),
                vector.reverse_3
            ),
        }
    }
}

/// Translation of the unedited and edited gene around the target codon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub window_start: usize,
    pub window_end: usize,
    pub original_protein: String,
    pub edited_protein: String,
    pub aa_changes_count: usize,
}

impl Verification {
    pub fn new(original: &[u8], edited: &[u8], target: usize, flank: usize) -> Self {
        let mut window_start = target.saturating_sub(flank).min(original.len());
        window_start -= window_start % CODON_LENGTH;
        let window_end = (target + flank).min(original.len()).min(edited.len());
        let original_protein = CODON_TABLE.translate_bytes(&original[window_start..window_end]);
        let edited_protein = CODON_TABLE.translate_bytes(&edited[window_start..window_end]);
        let aa_changes_count = original_protein
            .chars()
            .zip(edited_protein.chars())
            .filter(|(a, b)| a != b)
            .count();
        Self {
            window_start,
            window_end,
            original_protein,
            edited_protein,
            aa_changes_count,
        }
    }

    pub fn is_single_substitution(&self) -> bool {
        self.aa_changes_count == 1
    }
}

/// One accepted design.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairResult {
    pub site: Cas9Site,
    pub strategy: Strategy,
    pub silent_mutation_count: usize,
    pub score: u8,
    pub mutation: String,
    pub guide_with_pam: String,
    pub spacer: String,
    pub pam: String,
    pub target_position: usize,
    pub cut_position: usize,
    pub arm_start: usize,
    pub arm_end: usize,
    pub original_region: String,
    /// Edited arm; changed bases are lowercase
    pub repair_template: String,
    pub repair_template_reverse_complement: String,
    pub oligos: CloningOligos,
    pub verification: Verification,
    pub arm_alignment: AlignmentData,
    pub window_alignment: AlignmentData,
}

impl RepairResult {
    /// Gene offsets of every edited base.
    pub fn edited_positions(&self) -> Vec<usize> {
        self.repair_template
            .bytes()
            .enumerate()
            .filter(|(_, c)| c.is_ascii_lowercase())
            .map(|(i, _)| self.arm_start + i)
            .collect()
    }

    /// Index of the first complete codon in the homology arm.
    pub fn arm_reading_frame(&self) -> usize {
        (CODON_LENGTH - self.arm_start % CODON_LENGTH) % CODON_LENGTH
    }
}

/// Lowercases every base of `edited` that differs from `original`, uppercases the rest.
pub fn mark_changes(original: &[u8], edited: &[u8]) -> String {
    original
        .iter()
        .zip(edited.iter())
        .map(|(o, e)| {
            if o.eq_ignore_ascii_case(e) {
                e.to_ascii_uppercase()
            } else {
                e.to_ascii_lowercase()
            }
        })
        .map(char::from)
        .collect()
}

/// Codon for `amino_acid` to put in place of `current`: the closest codon that
/// differs from it, or `current` itself when it is the only one.
pub fn substitution_codon(current: &[u8], amino_acid: char) -> Result<Vec<u8>> {
    let aa = amino_acid.to_ascii_uppercase();
    if !CodonTable::is_standard_amino_acid(aa) {
        return Err(DesignError::InvalidAminoAcid(amino_acid));
    }
    let codons = CODON_TABLE.synonymous_codons(aa);
    codons
        .iter()
        .map(|c| c.as_bytes())
        .filter(|c| !c.eq_ignore_ascii_case(current))
        .min_by_key(|c| hamming(c, current))
        .or_else(|| codons.first().map(|c| c.as_bytes()))
        .map(|c| c.to_vec())
        .ok_or(DesignError::InvalidAminoAcid(amino_acid))
}

fn homology_arm(site: &Cas9Site, target: usize, flank: usize, seq_len: usize) -> (usize, usize) {
    let cut = site.cut_position();
    let start = cut.min(target).saturating_sub(flank);
    let end = (cut.max(target) + flank).min(seq_len);
    (start, end)
}

fn design_for_site(
    request: &DesignRequest,
    site: &Cas9Site,
    target: usize,
) -> Result<Option<RepairResult>> {
    let original = request.gene.bytes();
    let params = &request.parameters;

    let codon = substitution_codon(&original[target..target + CODON_LENGTH], request.amino_acid)?;
    let mut mutated = original.to_vec();
    mutated[target..target + CODON_LENGTH].copy_from_slice(&codon);

    let Some(disruption) = silent_mutation::disrupt(original, &mutated, site) else {
        debug!(
            "{} site at {}: no PAM or seed disruption available",
            request.gene.id, site.position
        );
        return Ok(None);
    };
    let edited = disruption.sequence;

    let verification = Verification::new(original, &edited, target, params.verification_flank);
    if !verification.is_single_substitution() {
        debug!(
            "{} site at {}: {} amino acid changes in verification window",
            request.gene.id, site.position, verification.aa_changes_count
        );
        return Ok(None);
    }

    let (arm_start, arm_end) = homology_arm(site, target, params.flank(), original.len());
    let original_region = request.gene.sequence[arm_start..arm_end].to_string();
    let repair_template = mark_changes(&original[arm_start..arm_end], &edited[arm_start..arm_end]);
    let guide_with_pam = site.guide_with_pam();
    let (spacer, pam) = guide_with_pam.split_at(SPACER_LENGTH);
    let (spacer, pam) = (spacer.to_string(), pam.to_string());
    let old_aa = request.gene.amino_acid(request.residue).unwrap_or(UNKNOWN_AMINO_ACID);

    Ok(Some(RepairResult {
        site: site.clone(),
        strategy: disruption.strategy,
        silent_mutation_count: disruption.silent_mutation_count,
        score: calculate_efficiency_score(&guide_with_pam),
        mutation: format!(
            "{}{}{}",
            old_aa,
            request.residue,
            request.amino_acid.to_ascii_uppercase()
        ),
        oligos: CloningOligos::new(&spacer, &params.vector),
        guide_with_pam,
        spacer,
        pam,
        target_position: target,
        cut_position: site.cut_position(),
        arm_start,
        arm_end,
        arm_alignment: AlignmentData::new(&original_region, &repair_template),
        repair_template_reverse_complement: reverse_complement(&repair_template),
        original_region,
        repair_template,
        window_alignment: AlignmentData::new(
            &verification.original_protein,
            &verification.edited_protein,
        ),
        verification,
    }))
}

/// Designs up to `max_results` repair templates, nearest Cas9 site first.
pub fn generate_repair_templates(request: &DesignRequest) -> Result<Vec<RepairResult>> {
    let target = request.validate()?;
    let params = &request.parameters;
    let sites = Cas9Site::find_sites(request.gene.bytes(), target, params.site_window);
    if sites.is_empty() {
        return Err(DesignError::NoSiteFound {
            residue: request.residue,
        });
    }

    // Sites are independent; collect keeps proximity order
    let outcomes: Vec<Result<Option<RepairResult>>> = sites
        .par_iter()
        .map(|site| design_for_site(request, site, target))
        .collect();

    let mut ret = vec![];
    for (site, outcome) in sites.iter().zip(outcomes) {
        if ret.len() >= params.max_results {
            break;
        }
        match outcome {
            Ok(Some(result)) => ret.push(result),
            Ok(None) => {}
            Err(e) => debug!("{} site at {}: {e}", request.gene.id, site.position),
        }
    }

    info!(
        "{} {}: {} Cas9 sites, {} designs",
        request.gene.symbol,
        request.mutation_label(),
        sites.len(),
        ret.len()
    );
    if ret.is_empty() {
        return Err(DesignError::NoViableTemplate {
            sites_tried: sites.len(),
        });
    }
    Ok(ret)
}
