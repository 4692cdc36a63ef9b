//! Run configuration.
//!
//! An optional YAML file; every field has a default, so an empty file (or no
//! file at all) is a valid configuration.
//!
//! ```yaml
//! general:
//!   log_level: debug
//!   threads: 4
//! paths:
//!   snapshots_dir: data/snapshots
//!   reports_dir: data/reports
//!   ground_truth: data/ground_truth.txt
//!   output_dir: out
//! detector:
//!   management_interface: FastEthernet0/0
//!   loopback_prefixes: [Loopback]
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use log::info;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detect::DetectorOptions;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid paths configuration: {0}")]
    InvalidPaths(String),
    #[error("Invalid detector configuration: {0}")]
    InvalidDetector(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct General {
    /// env_logger filter used when `--log-level` is not given
    pub log_level: Option<String>,
    /// Worker threads; 0 lets rayon decide
    pub threads: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub snapshots_dir: PathBuf,
    /// File-name regex for snapshots; capture 1 is the topology id
    pub snapshot_pattern: String,
    pub reports_dir: PathBuf,
    /// File-name regex for detector text reports; capture 1 is the topology id
    pub report_pattern: String,
    pub ground_truth: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            snapshots_dir: PathBuf::from("snapshots"),
            snapshot_pattern: r"^topologi_(\d+)\.json$".to_string(),
            reports_dir: PathBuf::from("reports"),
            report_pattern: r"^detection_(\d+)\.txt$".to_string(),
            ground_truth: PathBuf::from("ground_truth.txt"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Top-level configuration structure that mirrors the YAML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub general: General,
    pub paths: Paths,
    pub detector: DetectorOptions,
}

fn compile_file_pattern(name: &str, pattern: &str) -> Result<Regex, ConfigError> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPaths(format!("{} does not compile: {}", name, e)))?;

    if regex.captures_len() < 2 {
        return Err(ConfigError::InvalidPaths(format!(
            "{} '{}' needs a capture group for the topology id",
            name, pattern
        )));
    }
    Ok(regex)
}

impl AuditConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.general.log_level {
            if level.trim().is_empty() {
                return Err(ConfigError::InvalidGeneral("log_level cannot be empty".to_string()));
            }
        }

        self.snapshot_regex()?;
        self.report_regex()?;

        if self.detector.management_interface.trim().is_empty() {
            return Err(ConfigError::InvalidDetector(
                "management_interface cannot be empty".to_string(),
            ));
        }
        if self.detector.loopback_prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidDetector(
                "loopback_prefixes cannot contain an empty prefix".to_string(),
            ));
        }

        Ok(())
    }

    pub fn snapshot_regex(&self) -> Result<Regex, ConfigError> {
        compile_file_pattern("snapshot_pattern", &self.paths.snapshot_pattern)
    }

    pub fn report_regex(&self) -> Result<Regex, ConfigError> {
        compile_file_pattern("report_pattern", &self.paths.report_pattern)
    }
}

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<AuditConfig> {
    info!("Loading configuration from: {}", config_path.display());

    let file = File::open(config_path)
        .with_context(|| format!("Failed to open config file: {}", config_path.display()))?;

    // An empty YAML document parses as null, not as an empty mapping
    let value: serde_yaml::Value = serde_yaml::from_reader(file)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
    let config: AuditConfig = if value.is_null() {
        AuditConfig::default()
    } else {
        serde_yaml::from_value(value)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))?
    };

    config.validate()?;
    Ok(config)
}

/// CLI arguments that override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub threads: Option<usize>,
    pub snapshots_dir: Option<PathBuf>,
    pub reports_dir: Option<PathBuf>,
    pub ground_truth: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub management_interface: Option<String>,
}

/// Apply CLI overrides, then re-validate
pub fn apply_overrides(config: &mut AuditConfig, overrides: &CliOverrides) -> Result<(), ConfigError> {
    if let Some(level) = &overrides.log_level {
        config.general.log_level = Some(level.clone());
    }
    if let Some(threads) = overrides.threads {
        config.general.threads = threads;
    }
    if let Some(dir) = &overrides.snapshots_dir {
        config.paths.snapshots_dir = dir.clone();
    }
    if let Some(dir) = &overrides.reports_dir {
        config.paths.reports_dir = dir.clone();
    }
    if let Some(path) = &overrides.ground_truth {
        config.paths.ground_truth = path.clone();
    }
    if let Some(dir) = &overrides.output_dir {
        config.paths.output_dir = dir.clone();
    }
    if let Some(iface) = &overrides.management_interface {
        config.detector.management_interface = iface.clone();
    }

    config.validate()
}
