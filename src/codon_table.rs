//! Standard genetic code, loaded from the embedded codon table.

use csv::ReaderBuilder;
use std::collections::HashMap;

pub const CODON_LENGTH: usize = 3;
pub const STOP: char = '*';
pub const UNKNOWN_AMINO_ACID: char = 'X';

const STANDARD_AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

#[derive(Clone, Debug)]
pub struct CodonTable {
    amino_acids: HashMap<[u8; CODON_LENGTH], char>,
    // Codons per amino acid, in table order
    synonyms: HashMap<char, Vec<String>>,
    tla: HashMap<char, String>,
}

impl CodonTable {
    fn from_text(csv_text: &str) -> Self {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_text.as_bytes());

        let mut ret = Self {
            amino_acids: HashMap::new(),
            synonyms: HashMap::new(),
            tla: HashMap::new(),
        };
        for record in rdr.records().flatten() {
            let (Some(codon), Some(aa), Some(tla)) = (record.get(0), record.get(1), record.get(2))
            else {
                continue;
            };
            let Ok(key) = <[u8; CODON_LENGTH]>::try_from(codon.as_bytes()) else {
                continue;
            };
            let Some(aa) = aa.chars().next() else {
                continue;
            };
            ret.amino_acids.insert(key, aa);
            ret.synonyms.entry(aa).or_default().push(codon.to_string());
            ret.tla.insert(aa, tla.to_string());
        }
        ret
    }

    pub fn len(&self) -> usize {
        self.amino_acids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amino_acids.is_empty()
    }

    /// Amino acid (or `*` for stop) encoded by a codon, case-insensitive.
    pub fn amino_acid(&self, codon: &[u8]) -> Option<char> {
        let key: [u8; CODON_LENGTH] = codon.try_into().ok()?;
        self.amino_acids.get(&key.map(|c| c.to_ascii_uppercase())).copied()
    }

    pub fn codon_to_amino_acid(&self, codon: &str) -> Option<char> {
        self.amino_acid(codon.as_bytes())
    }

    /// All codons for an amino acid, in table order. Empty if the symbol is unknown.
    pub fn synonymous_codons(&self, aa: char) -> &[String] {
        self.synonyms
            .get(&aa.to_ascii_uppercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn three_letter(&self, aa: char) -> Option<&str> {
        self.tla.get(&aa.to_ascii_uppercase()).map(|s| s.as_str())
    }

    pub fn is_standard_amino_acid(aa: char) -> bool {
        STANDARD_AMINO_ACIDS.contains(aa)
    }

    /// Translates whole codons; a trailing partial codon is dropped.
    pub fn translate_bytes(&self, seq: &[u8]) -> String {
        seq.chunks_exact(CODON_LENGTH)
            .map(|codon| self.amino_acid(codon).unwrap_or(UNKNOWN_AMINO_ACID))
            .collect()
    }

    pub fn translate(&self, seq: &str) -> String {
        self.translate_bytes(seq.as_bytes())
    }
}

impl Default for CodonTable {
    fn default() -> Self {
        let text = include_str!("../assets/codon_table.csv");
        Self::from_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CODON_TABLE;

    #[test]
    fn test_default_has_all_codons() {
        assert_eq!(CODON_TABLE.len(), 64);
        let symbols: std::collections::HashSet<char> =
            CODON_TABLE.amino_acids.values().copied().collect();
        assert_eq!(symbols.len(), 21);
    }

    #[test]
    fn test_codon_to_amino_acid() {
        assert_eq!(CODON_TABLE.codon_to_amino_acid("ATG"), Some('M'));
        assert_eq!(CODON_TABLE.codon_to_amino_acid("ctt"), Some('L'));
        assert_eq!(CODON_TABLE.codon_to_amino_acid("TGA"), Some(STOP));
        assert_eq!(CODON_TABLE.codon_to_amino_acid("NNN"), None);
        assert_eq!(CODON_TABLE.codon_to_amino_acid("AT"), None);
    }

    #[test]
    fn test_synonymous_codons() {
        assert_eq!(CODON_TABLE.synonymous_codons('W'), ["TGG"]);
        assert_eq!(
            CODON_TABLE.synonymous_codons('P'),
            ["CCT", "CCC", "CCA", "CCG"]
        );
        assert_eq!(CODON_TABLE.synonymous_codons('L').len(), 6);
        assert_eq!(CODON_TABLE.synonymous_codons('*').len(), 3);
        assert!(CODON_TABLE.synonymous_codons('B').is_empty());
    }

    #[test]
    fn test_every_codon_is_its_own_synonym() {
        for (codon, aa) in CODON_TABLE.amino_acids.iter() {
            let codon = std::str::from_utf8(codon).unwrap();
            assert!(
                CODON_TABLE
                    .synonymous_codons(*aa)
                    .iter()
                    .any(|c| c == codon)
            );
        }
    }

    #[test]
    fn test_translate() {
        assert_eq!(CODON_TABLE.translate("ATGCTTTAA"), "ML*");
        assert_eq!(CODON_TABLE.translate("ATGCTTTA"), "ML");
        assert_eq!(CODON_TABLE.translate("ATGNNN"), "MX");
        assert_eq!(CODON_TABLE.translate(""), "");
    }

    #[test]
    fn test_translate_ignores_case() {
        let s = "atgCcTaatTgGAagc";
        assert_eq!(CODON_TABLE.translate(s), CODON_TABLE.translate(&s.to_uppercase()));
    }

    #[test]
    fn test_three_letter() {
        assert_eq!(CODON_TABLE.three_letter('L'), Some("Leu"));
        assert_eq!(CODON_TABLE.three_letter('p'), Some("Pro"));
        assert_eq!(CODON_TABLE.three_letter('*'), Some("Ter"));
        assert_eq!(CODON_TABLE.three_letter('B'), None);
    }

    #[test]
    fn test_standard_amino_acids() {
        assert!(CodonTable::is_standard_amino_acid('P'));
        assert!(!CodonTable::is_standard_amino_acid('*'));
        assert!(!CodonTable::is_standard_amino_acid('X'));
        assert!(!CodonTable::is_standard_amino_acid('p'));
    }
}
