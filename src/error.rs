use thiserror::Error;

pub type Result<T> = std::result::Result<T, DesignError>;

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("no Cas9 site found near residue {residue}")]
    NoSiteFound { residue: usize },

    #[error("none of the {sites_tried} Cas9 sites yielded a viable repair template")]
    NoViableTemplate { sites_tried: usize },

    #[error("amino acid '{0}' has no codon")]
    InvalidAminoAcid(char),

    #[error("residue {residue} is outside the coding sequence ({codons} codons)")]
    InvalidResidue { residue: usize, codons: usize },

    #[error("oligo length {0} is outside 60..=100")]
    InvalidOligoLength(usize),

    #[error("invalid sequence: {0}")]
    InvalidSequence(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DesignError::NoSiteFound { residue: 10 }.to_string(),
            "no Cas9 site found near residue 10"
        );
        assert_eq!(
            DesignError::InvalidAminoAcid('B').to_string(),
            "amino acid 'B' has no codon"
        );
    }

    #[test]
    fn test_from_io() {
        let err: DesignError = std::io::Error::other("boom").into();
        assert!(matches!(err, DesignError::Io(_)));
    }
}
