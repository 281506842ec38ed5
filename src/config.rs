//! Run configuration, built from CLI flags or loaded from a JSON file.

use crate::error::{AssemblyError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// How the OLC assembler treats reads containing characters outside {A,C,G,T}.
///
/// The DBG builder always drops offending k-mer windows; the OLC builder has no
/// per-window notion, so filtering there is an explicit choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetPolicy {
    /// Reads are compared exactly as ingested.
    #[default]
    Permissive,
    /// Reads containing any non-ACGT character are excluded before subsampling.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbgConfig {
    /// One independent DBG run per value, in order.
    pub k_values: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlcConfig {
    pub min_overlap: usize,
    #[serde(default)]
    pub alphabet: AlphabetPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    #[serde(default)]
    pub dbg: Option<DbgConfig>,
    #[serde(default)]
    pub olc: Option<OlcConfig>,
    pub output_dir: PathBuf,
    /// Write `<basename>_runs.json` next to the assemblies.
    #[serde(default)]
    pub metadata: bool,
}

impl AssemblyConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| AssemblyError::io(path, e))?;
        let config: AssemblyConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would fail mid-run.
    pub fn validate(&self) -> Result<()> {
        if self.dbg.is_none() && self.olc.is_none() {
            return Err(AssemblyError::Configuration {
                message: "no assembly strategy selected (enable dbg and/or olc)".to_string(),
            });
        }
        if let Some(dbg) = &self.dbg {
            if dbg.k_values.is_empty() {
                return Err(AssemblyError::Configuration {
                    message: "dbg strategy needs at least one k value".to_string(),
                });
            }
            if let Some(&k) = dbg.k_values.iter().find(|&&k| k == 0) {
                return Err(AssemblyError::InvalidKmerSize { k });
            }
        }
        if let Some(olc) = &self.olc {
            if olc.min_overlap == 0 {
                return Err(AssemblyError::InvalidMinOverlap {
                    min_overlap: olc.min_overlap,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn both() -> AssemblyConfig {
        AssemblyConfig {
            dbg: Some(DbgConfig { k_values: vec![31] }),
            olc: Some(OlcConfig {
                min_overlap: 20,
                alphabet: AlphabetPolicy::Permissive,
            }),
            output_dir: PathBuf::from("out"),
            metadata: false,
        }
    }

    #[test]
    fn test_validate_accepts_both_strategies() {
        assert!(both().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_k() {
        let mut config = both();
        config.dbg = Some(DbgConfig { k_values: vec![21, 0] });
        assert!(matches!(
            config.validate(),
            Err(AssemblyError::InvalidKmerSize { k: 0 })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_overlap() {
        let mut config = both();
        config.olc = Some(OlcConfig {
            min_overlap: 0,
            alphabet: AlphabetPolicy::Strict,
        });
        assert!(matches!(
            config.validate(),
            Err(AssemblyError::InvalidMinOverlap { min_overlap: 0 })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_config() {
        let mut config = both();
        config.dbg = None;
        config.olc = None;
        assert!(matches!(
            config.validate(),
            Err(AssemblyError::Configuration { .. })
        ));
    }

    #[test]
    fn test_load_json_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"dbg": {{"k_values": [35, 45]}}, "olc": {{"min_overlap": 30, "alphabet": "strict"}}, "output_dir": "results"}}"#
        )
        .unwrap();

        let config = AssemblyConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.dbg.unwrap().k_values, vec![35, 45]);
        let olc = config.olc.unwrap();
        assert_eq!(olc.min_overlap, 30);
        assert_eq!(olc.alphabet, AlphabetPolicy::Strict);
        assert_eq!(config.output_dir, PathBuf::from("results"));
        assert!(!config.metadata);
    }
}
