//! Harness configuration
//!
//! A [`HarnessConfig`] can be built in code, loaded from a JSON file (with
//! the `serde` feature), or assembled by the CLI from flags and
//! environment variables.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::io::Read;

use crate::error::{BenchError, Result};
use crate::kernels::KernelKind;

/// Default maximum size of a JSON config file (1 MB)
#[cfg(feature = "serde")]
const DEFAULT_CONFIG_MAX_BYTES: u64 = 1024 * 1024;

/// Settings for one harness run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct HarnessConfig {
    /// Emit per-kernel detail lines in addition to scores
    #[cfg_attr(feature = "serde", serde(default))]
    pub verbose: bool,

    /// Kernels to register, in order. Empty selects every built-in kernel.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kernels: Vec<KernelKind>,

    /// Replaces every kernel's own iteration count when set
    #[cfg_attr(feature = "serde", serde(default))]
    pub iterations: Option<u64>,
}

impl HarnessConfig {
    /// Configuration with every built-in kernel at its own iteration count
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Select kernels to register
    pub fn with_kernels(mut self, kernels: Vec<KernelKind>) -> Self {
        self.kernels = kernels;
        self
    }

    /// Override every kernel's iteration count
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Kernels the harness should register
    pub fn selected_kernels(&self) -> Vec<KernelKind> {
        if self.kernels.is_empty() {
            KernelKind::ALL.to_vec()
        } else {
            self.kernels.clone()
        }
    }

    /// Reject settings that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.iterations == Some(0) {
            return Err(BenchError::Config(
                "iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load a configuration from a JSON reader, capped at `max_bytes`
    #[cfg(feature = "serde")]
    pub fn from_json_reader_with_limit<R: Read>(reader: R, max_bytes: u64) -> Result<Self> {
        let mut buffer = Vec::new();
        let mut limited = reader.take(max_bytes.saturating_add(1));
        limited.read_to_end(&mut buffer)?;

        if buffer.len() as u64 > max_bytes {
            return Err(BenchError::Config(format!(
                "config exceeds size limit of {} bytes",
                max_bytes
            )));
        }

        let config: HarnessConfig = serde_json::from_slice(&buffer)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON reader (1 MB limit)
    #[cfg(feature = "serde")]
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_json_reader_with_limit(reader, DEFAULT_CONFIG_MAX_BYTES)
    }

    /// Load a configuration from a JSON file
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading harness config from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_select_all_kernels() {
        let config = HarnessConfig::new();
        assert!(!config.verbose);
        assert_eq!(config.iterations, None);
        assert_eq!(config.selected_kernels(), KernelKind::ALL.to_vec());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = HarnessConfig::new()
            .with_verbose(true)
            .with_kernels(vec![KernelKind::Mandelbrot])
            .with_iterations(10);
        assert!(config.verbose);
        assert_eq!(config.selected_kernels(), vec![KernelKind::Mandelbrot]);
        assert_eq!(config.iterations, Some(10));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = HarnessConfig::new().with_iterations(0).validate().unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let json = r#"{ "verbose": true, "kernels": ["mandelbrot", "average"], "iterations": 5 }"#;
        let config = HarnessConfig::from_json_reader(json.as_bytes()).unwrap();
        assert!(config.verbose);
        assert_eq!(
            config.kernels,
            vec![KernelKind::Mandelbrot, KernelKind::Average]
        );
        assert_eq!(config.iterations, Some(5));

        let empty = HarnessConfig::from_json_reader("{}".as_bytes()).unwrap();
        assert_eq!(empty, HarnessConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            HarnessConfig::from_json_reader(r#"{ "kernels": ["matrix"] }"#.as_bytes()),
            Err(BenchError::Json(_))
        ));
        assert!(matches!(
            HarnessConfig::from_json_reader(r#"{ "iterations": 0 }"#.as_bytes()),
            Err(BenchError::Config(_))
        ));
        assert!(matches!(
            HarnessConfig::from_json_reader_with_limit("{}      ".as_bytes(), 4),
            Err(BenchError::Config(_))
        ));
    }
}
