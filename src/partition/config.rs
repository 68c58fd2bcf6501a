// src/partition/config.rs

use crate::partition::error::{PartitionError, PartitionResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Konfiguration eines Partitionierungslaufs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Anzahl der Worker-Threads. `None` = rayon-Standard (Anzahl der Kerne).
    pub workers: Option<usize>,
    /// Granularität der Fortschrittsmeldungen in Prozent.
    pub progress_step: u8,
    /// Fortschritt überhaupt melden.
    pub report_progress: bool,
    /// Nach wie vielen verarbeiteten Punkten ein Worker Abbruch und Deadline prüft.
    pub cancel_check_interval: usize,
    /// Optionale Laufzeitgrenze der Klassifikation in Millisekunden.
    pub deadline_ms: Option<u64>,
    /// Optionaler Pfad für eine Debug-SVG der Zellen.
    pub svg_debug: Option<PathBuf>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            workers: None,
            progress_step: 5,
            report_progress: true,
            cancel_check_interval: 1,
            deadline_ms: None,
            svg_debug: None,
        }
    }
}

impl PartitionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lädt eine Konfiguration aus einer JSON-Datei; fehlende Felder erhalten Standardwerte.
    pub fn from_json_file(path: impl AsRef<Path>) -> PartitionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_progress_step(mut self, step: u8) -> Self {
        self.progress_step = step;
        self
    }

    pub fn with_report_progress(mut self, enabled: bool) -> Self {
        self.report_progress = enabled;
        self
    }

    pub fn with_cancel_check_interval(mut self, interval: usize) -> Self {
        self.cancel_check_interval = interval;
        self
    }

    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    pub fn with_svg_debug(mut self, path: impl Into<PathBuf>) -> Self {
        self.svg_debug = Some(path.into());
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> PartitionResult<()> {
        if self.workers == Some(0) {
            return Err(PartitionError::InvalidConfiguration {
                message: "Worker count must be greater than 0.".to_string(),
            });
        }
        if !(1..=100).contains(&self.progress_step) {
            return Err(PartitionError::InvalidConfiguration {
                message: format!(
                    "Progress step must be within 1..=100 percent, got {}.",
                    self.progress_step
                ),
            });
        }
        if self.cancel_check_interval == 0 {
            return Err(PartitionError::InvalidConfiguration {
                message: "Cancel check interval must be greater than 0.".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PartitionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.progress_step, 5);
        assert_eq!(config.cancel_check_interval, 1);
        assert!(config.deadline().is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(PartitionConfig::new().with_workers(0).validate().is_err());
        assert!(PartitionConfig::new().with_progress_step(0).validate().is_err());
        assert!(PartitionConfig::new().with_progress_step(101).validate().is_err());
        assert!(PartitionConfig::new().with_cancel_check_interval(0).validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: PartitionConfig =
            serde_json::from_str(r#"{ "workers": 4, "deadline_ms": 1500 }"#).unwrap();
        assert_eq!(config.workers, Some(4));
        assert_eq!(config.deadline(), Some(Duration::from_millis(1500)));
        assert_eq!(config.progress_step, 5);
        assert!(config.report_progress);
    }

    #[test]
    fn test_from_json_file() {
        let dir = std::env::temp_dir().join("pip_partition_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{ "progress_step": 10, "report_progress": false }"#).unwrap();

        let config = PartitionConfig::from_json_file(&path).unwrap();
        assert_eq!(config.progress_step, 10);
        assert!(!config.report_progress);

        std::fs::write(&path, r#"{ "progress_step": 0 }"#).unwrap();
        assert!(matches!(
            PartitionConfig::from_json_file(&path),
            Err(PartitionError::InvalidConfiguration { .. })
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
