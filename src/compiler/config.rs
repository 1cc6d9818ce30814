use crate::rings::DEFAULT_MODULUS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Options controlling compilation and the generated keys.
///
/// Every field has a default, so a TOML file only needs to list the ones it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilationConfiguration {
    /// Validate every inputset sample against the declared parameter types
    /// instead of only the first one.
    pub check_every_input_in_inputset: bool,
    pub treat_warnings_as_errors: bool,
    /// Widest encrypted intermediate value accepted.
    pub max_bit_width: u32,
    /// Ciphertext modulus q.
    pub modulus: u64,
    pub scale_bits: u32,
    pub error_variance: f64,
    /// Secret and ephemeral key Hamming weight; half the ring degree when
    /// unset.
    pub hamming_weight: Option<usize>,
    /// Seed for key generation and encryption noise.
    pub seed: Option<u64>,
}

impl Default for CompilationConfiguration {
    fn default() -> Self {
        Self {
            check_every_input_in_inputset: false,
            treat_warnings_as_errors: false,
            max_bit_width: 7,
            modulus: DEFAULT_MODULUS,
            scale_bits: 30,
            error_variance: 3.2,
            hamming_weight: None,
            seed: None,
        }
    }
}

impl CompilationConfiguration {
    /// Strict settings used by the benchmark targets.
    pub fn benchmark() -> Self {
        Self {
            check_every_input_in_inputset: true,
            treat_warnings_as_errors: true,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&source)
    }
}
