use crate::{
    CODON_TABLE,
    codon_table::CODON_LENGTH,
    error::{DesignError, Result},
};
use bio::io::fasta;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fs::File, path::Path};

/// Nucleotide and IUPAC ambiguity letters accepted in a gene sequence.
const SEQUENCE_ALPHABET: &[u8] = b"ACGTUNRYKMSWBDHV";

fn deserialize_sequence<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    Ok(GeneInfo::normalize_sequence(&text))
}

/// A resolved gene: identifiers plus its uppercase coding sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneInfo {
    pub id: String,
    pub symbol: String,
    #[serde(deserialize_with = "deserialize_sequence")]
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GeneInfo {
    pub fn new(id: &str, symbol: &str, sequence: &str) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_string(),
            sequence: Self::normalize_sequence(sequence),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn from_fasta_record(record: &fasta::Record) -> Self {
        let id = record.id().to_string();
        let mut ret = Self {
            symbol: id.clone(),
            id,
            sequence: Self::normalize_sequence(&String::from_utf8_lossy(record.seq())),
            description: None,
        };
        if let Some(desc) = record.desc() {
            ret = ret.with_description(desc);
        }
        ret
    }

    pub fn from_fasta_file<P: AsRef<Path>>(path: P) -> Result<Vec<GeneInfo>> {
        let file = File::open(path)?;
        let mut ret = vec![];
        for record in fasta::Reader::new(file).records() {
            ret.push(Self::from_fasta_record(&record?));
        }
        Ok(ret)
    }

    fn normalize_sequence(seq: &str) -> String {
        seq.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    /// Rejects empty sequences and anything outside the IUPAC nucleotide letters.
    pub fn validate(&self) -> Result<()> {
        if self.sequence.is_empty() {
            return Err(DesignError::InvalidSequence(format!(
                "gene '{}' has an empty sequence",
                self.id
            )));
        }
        if let Some((pos, c)) = self
            .sequence
            .char_indices()
            .find(|(_, c)| !c.is_ascii() || !SEQUENCE_ALPHABET.contains(&(*c as u8)))
        {
            return Err(DesignError::InvalidSequence(format!(
                "gene '{}' has '{c}' at offset {pos}",
                self.id
            )));
        }
        Ok(())
    }

    /// Offset of the first nucleotide of a 1-based residue inside this gene.
    pub fn residue_start(&self, residue: usize) -> Result<usize> {
        let codons = self.codon_count();
        if residue == 0 || residue > codons {
            return Err(DesignError::InvalidResidue { residue, codons });
        }
        Ok((residue - 1) * CODON_LENGTH)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    #[inline(always)]
    pub fn bytes(&self) -> &[u8] {
        self.sequence.as_bytes()
    }

    /// Complete codons only.
    pub fn codon_count(&self) -> usize {
        self.len() / CODON_LENGTH
    }

    /// Offset of the first nucleotide of a 1-based residue; `None` for 0 or on overflow.
    #[inline(always)]
    pub fn residue_position(residue: usize) -> Option<usize> {
        residue.checked_sub(1)?.checked_mul(CODON_LENGTH)
    }

    pub fn codon(&self, residue: usize) -> Option<&str> {
        let start = Self::residue_position(residue)?;
        self.sequence.get(start..start.checked_add(CODON_LENGTH)?)
    }

    pub fn amino_acid(&self, residue: usize) -> Option<char> {
        self.codon(residue)
            .and_then(|codon| CODON_TABLE.codon_to_amino_acid(codon))
    }

    pub fn protein(&self) -> String {
        CODON_TABLE.translate(&self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_normalizes() {
        let gene = GeneInfo::new("YFL039C", "ACT1", "atg ctt\ntaa");
        assert_eq!(gene.sequence, "ATGCTTTAA");
        assert_eq!(gene.codon_count(), 3);
        assert!(gene.description.is_none());
    }

    #[test]
    fn test_codon_access() {
        let gene = GeneInfo::new("x", "X", "ATGCTTTAAG");
        assert_eq!(gene.codon(1), Some("ATG"));
        assert_eq!(gene.codon(2), Some("CTT"));
        assert_eq!(gene.codon(0), None);
        assert_eq!(gene.codon(4), None);
        assert_eq!(gene.amino_acid(2), Some('L'));
        assert_eq!(gene.amino_acid(3), Some('*'));
        assert_eq!(gene.protein(), "ML*");
        assert_eq!(GeneInfo::residue_position(10), Some(27));
        assert_eq!(GeneInfo::residue_position(0), None);
    }

    #[test]
    fn test_huge_residue() {
        let gene = GeneInfo::new("x", "X", "ATGCTTTAA");
        assert_eq!(GeneInfo::residue_position(usize::MAX / 2), None);
        assert_eq!(gene.codon(usize::MAX / 2), None);
        assert_eq!(gene.codon(usize::MAX / 3 + 1), None);
        assert!(matches!(
            gene.residue_start(usize::MAX / 2),
            Err(DesignError::InvalidResidue { codons: 3, .. })
        ));
    }

    #[test]
    fn test_residue_start() {
        let gene = GeneInfo::new("x", "X", "ATGCTTTAAG");
        assert_eq!(gene.residue_start(1).unwrap(), 0);
        assert_eq!(gene.residue_start(3).unwrap(), 6);
        for residue in [0, 4] {
            assert!(matches!(
                gene.residue_start(residue),
                Err(DesignError::InvalidResidue { codons: 3, .. })
            ));
        }
    }

    #[test]
    fn test_validate_rejects_foreign_letters() {
        for seq in ["ATGéCTT", "ATG-CTT", "ATGXCTT", "ATG1CT"] {
            let gene = GeneInfo::new("x", "X", seq);
            assert!(matches!(
                gene.validate(),
                Err(DesignError::InvalidSequence(_))
            ));
        }
        assert!(GeneInfo::new("x", "X", "ATGNNRCTT").validate().is_ok());
    }

    #[test]
    fn test_deserialize_normalizes() {
        let gene: GeneInfo =
            serde_json::from_str(r#"{"id":"x","symbol":"X","sequence":"atg ctt\ntaa"}"#).unwrap();
        assert_eq!(gene.sequence, "ATGCTTTAA");
        assert!(gene.validate().is_ok());
    }

    #[test]
    fn test_with_description() {
        let gene = GeneInfo::new("YFL039C", "ACT1", "ATG").with_description("actin");
        assert_eq!(gene.description.as_deref(), Some("actin"));
    }

    #[test]
    fn test_validate_empty() {
        let gene = GeneInfo::new("x", "X", "");
        assert!(matches!(
            gene.validate(),
            Err(DesignError::InvalidSequence(_))
        ));
    }

    #[test]
    fn test_from_fasta_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">YFL039C ACT1 actin").unwrap();
        writeln!(file, "ATGGATTCTGAG").unwrap();
        writeln!(file, "gtTGCTGC").unwrap();
        file.flush().unwrap();
        let genes = GeneInfo::from_fasta_file(file.path()).unwrap();
        assert_eq!(genes.len(), 1);
        assert_eq!(genes[0].id, "YFL039C");
        assert_eq!(genes[0].symbol, "YFL039C");
        assert_eq!(genes[0].sequence, "ATGGATTCTGAGGTTGCTGC");
        assert_eq!(genes[0].description.as_deref(), Some("ACT1 actin"));
    }

    #[test]
    fn test_from_fasta_missing_file() {
        assert!(matches!(
            GeneInfo::from_fasta_file("/nonexistent/gene.fa"),
            Err(DesignError::Io(_))
        ));
    }
}
