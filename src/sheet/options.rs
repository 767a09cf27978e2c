//! Decode configuration.

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for decoding documents into record tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Decode rows on worker threads
    pub parallel: bool,
    /// Documents with fewer data rows than this decode on the calling thread
    pub parallel_threshold: usize,
    /// Size of a dedicated worker pool; `None` uses the global rayon pool
    pub worker_threads: Option<usize>,
    /// Drop a leading byte order mark
    pub strip_bom: bool,
    /// Report rows that replace an earlier row with the same id
    pub warn_on_duplicate_ids: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 64, // data rows
            worker_threads: None,   // global rayon pool
            strip_bom: true,
            warn_on_duplicate_ids: true,
        }
    }
}

impl DecodeOptions {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that never leaves the calling thread
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Enable/disable parallel row decoding
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the minimum number of data rows for parallel decoding
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the size of a dedicated worker pool
    pub fn with_worker_threads(mut self, threads: Option<usize>) -> Self {
        self.worker_threads = threads;
        self
    }

    /// Enable/disable byte order mark stripping
    pub fn with_strip_bom(mut self, strip: bool) -> Self {
        self.strip_bom = strip;
        self
    }

    /// Enable/disable duplicate id diagnostics
    pub fn with_warn_on_duplicate_ids(mut self, warn: bool) -> Self {
        self.warn_on_duplicate_ids = warn;
        self
    }

    /// Whether `rows` data rows should be spread across workers.
    pub fn runs_parallel(&self, rows: usize) -> bool {
        self.parallel && rows >= self.parallel_threshold && self.worker_threads != Some(1)
    }

    /// Loads options from YAML. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: DecodeOptions =
            serde_saphyr::from_str(yaml).map_err(|e| Error::Config(format!("Failed to parse decode options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Serializes the options to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize decode options: {}", e)))
    }

    /// Rejects settings no builder can honor.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.worker_threads == Some(0) {
            return Err(Error::Config("worker_threads must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::new();
        assert!(options.parallel);
        assert_eq!(options.parallel_threshold, 64);
        assert_eq!(options.worker_threads, None);
        assert!(options.strip_bom);
        assert!(options.warn_on_duplicate_ids);
    }

    #[test]
    fn test_runs_parallel() {
        let options = DecodeOptions::new().with_parallel_threshold(10);
        assert!(!options.runs_parallel(9));
        assert!(options.runs_parallel(10));
        assert!(!options.clone().with_worker_threads(Some(1)).runs_parallel(100));
        assert!(!DecodeOptions::sequential().runs_parallel(1000));
    }

    #[test]
    fn test_from_yaml() {
        let options = DecodeOptions::from_yaml_str("parallel_threshold: 8\nworker_threads: 4\n").unwrap();
        assert_eq!(options.parallel_threshold, 8);
        assert_eq!(options.worker_threads, Some(4));
        assert!(options.parallel);
        assert!(options.strip_bom);
    }

    #[test]
    fn test_yaml_round_trip() {
        let options = DecodeOptions::sequential().with_worker_threads(Some(2));
        let yaml = options.to_yaml_string().unwrap();
        assert_eq!(DecodeOptions::from_yaml_str(&yaml).unwrap(), options);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            DecodeOptions::from_yaml_str("parallel: [1, 2]"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            DecodeOptions::from_yaml_str("worker_threads: 0"),
            Err(Error::Config(_))
        ));
    }
}
