use crate::error::{DesignError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{ops::RangeInclusive, path::Path};

pub const DEFAULT_FLANK: usize = 30;
pub const OLIGO_LENGTH_RANGE: RangeInclusive<usize> = 60..=100;

/// Adapters that clone a 20-nt spacer into the guide expression vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorAdapters {
    pub name: String,
    pub forward_5: String,
    pub forward_3: String,
    pub reverse_5: String,
    pub reverse_3: String,
}

impl Default for VectorAdapters {
    // pML104 (BclI/SwaI)
    fn default() -> Self {
        Self {
            name: "pML104".to_string(),
            forward_5: "GATC".to_string(),
            forward_3: "GTTTTAGAGCTAG".to_string(),
            reverse_5: "CTAGCTCTAAAAC".to_string(),
            reverse_3: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignParameters {
    /// Repair oligo length; resizes the homology arm flank when set.
    pub oligo_length: Option<usize>,
    pub site_window: usize,
    pub verification_flank: usize,
    pub max_results: usize,
    pub vector: VectorAdapters,
}

impl Default for DesignParameters {
    fn default() -> Self {
        Self {
            oligo_length: None,
            site_window: 105,
            verification_flank: 150,
            max_results: 5,
            vector: VectorAdapters::default(),
        }
    }
}

impl DesignParameters {
    pub fn with_oligo_length(mut self, oligo_length: Option<usize>) -> Self {
        self.oligo_length = oligo_length;
        self
    }

    pub fn validate(&self) -> Result<()> {
        match self.oligo_length {
            Some(n) if !OLIGO_LENGTH_RANGE.contains(&n) => Err(DesignError::InvalidOligoLength(n)),
            _ => Ok(()),
        }
    }

    /// Homology arm flank on either side of the cut/target span.
    pub fn flank(&self) -> usize {
        self.oligo_length
            .map(|n| n / 2)
            .unwrap_or(DEFAULT_FLANK)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let ret: Self = serde_json::from_str(&text)?;
        ret.validate()?;
        Ok(ret)
    }

    /// Like `load_from_path`, but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_path(path)
        } else {
            warn!(
                "Parameter file '{}' not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = DesignParameters::default();
        assert_eq!(params.flank(), 30);
        assert_eq!(params.site_window, 105);
        assert_eq!(params.max_results, 5);
        assert_eq!(params.vector.name, "pML104");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_oligo_length_resizes_flank() {
        let params = DesignParameters::default().with_oligo_length(Some(90));
        assert_eq!(params.flank(), 45);
        assert!(params.validate().is_ok());
        let params = DesignParameters::default().with_oligo_length(Some(61));
        assert_eq!(params.flank(), 30);
    }

    #[test]
    fn test_oligo_length_bounds() {
        for n in [59, 101, 0] {
            let params = DesignParameters::default().with_oligo_length(Some(n));
            assert!(matches!(
                params.validate(),
                Err(DesignError::InvalidOligoLength(m)) if m == n
            ));
        }
        for n in [60, 100] {
            let params = DesignParameters::default().with_oligo_length(Some(n));
            assert!(params.validate().is_ok());
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: DesignParameters = serde_json::from_str(r#"{"oligo_length": 80}"#).unwrap();
        assert_eq!(params.oligo_length, Some(80));
        assert_eq!(params.verification_flank, 150);
        assert_eq!(params.vector, VectorAdapters::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let mut params = DesignParameters::default().with_oligo_length(Some(70));
        params.max_results = 3;
        params.save_to_path(&path).unwrap();
        assert_eq!(DesignParameters::load_from_path(&path).unwrap(), params);
    }

    #[test]
    fn test_load_rejects_bad_oligo_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"oligo_length": 120}"#).unwrap();
        assert!(matches!(
            DesignParameters::load_from_path(&path),
            Err(DesignError::InvalidOligoLength(120))
        ));
    }

    #[test]
    fn test_load_or_default_missing() {
        let dir = tempfile::tempdir().unwrap();
        let params = DesignParameters::load_or_default(dir.path().join("missing.json")).unwrap();
        assert_eq!(params, DesignParameters::default());
    }
}
