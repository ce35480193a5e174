// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::{
    COMPARISON_FILE, DEFAULT_BETA_END, DEFAULT_BETA_START, DEFAULT_FORWARD_STEPS,
    DEFAULT_KSPACE_KEY, DEFAULT_OUTPUT_DIR, DEFAULT_TIMESTEPS,
};
use crate::error::{ReconError, ReconResult};

/// Top-level run configuration.
/// Every section is optional in JSON; `{}` deserializes to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub forward: ForwardConfig,
}

/// Linear β schedule parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_timesteps")]
    pub timesteps: usize,
    #[serde(default = "default_beta_start")]
    pub beta_start: f64,
    #[serde(default = "default_beta_end")]
    pub beta_end: f64,
}

/// Where the k-space archive lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to a `.npz` archive or a bare `.npy` array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Dataset name inside the archive.
    #[serde(default = "default_kspace_key")]
    pub kspace_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default = "default_comparison_file")]
    pub comparison_file: String,
}

/// Forward-noise demo parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardConfig {
    #[serde(default = "default_forward_steps")]
    pub steps: Vec<usize>,
    /// Fixed RNG seed; `None` draws from the thread RNG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_timesteps() -> usize {
    DEFAULT_TIMESTEPS
}
fn default_beta_start() -> f64 {
    DEFAULT_BETA_START
}
fn default_beta_end() -> f64 {
    DEFAULT_BETA_END
}
fn default_kspace_key() -> String {
    DEFAULT_KSPACE_KEY.to_string()
}
fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}
fn default_comparison_file() -> String {
    COMPARISON_FILE.to_string()
}
fn default_forward_steps() -> Vec<usize> {
    DEFAULT_FORWARD_STEPS.to_vec()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            timesteps: default_timesteps(),
            beta_start: default_beta_start(),
            beta_end: default_beta_end(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            path: None,
            kspace_key: default_kspace_key(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: default_output_dir(),
            comparison_file: default_comparison_file(),
        }
    }
}

impl Default for ForwardConfig {
    fn default() -> Self {
        ForwardConfig {
            steps: default_forward_steps(),
            seed: None,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> ReconResult<()> {
        if self.timesteps == 0 {
            return Err(ReconError::ConfigError(
                "scheduler.timesteps must be >= 1".to_string(),
            ));
        }
        if !self.beta_start.is_finite() || !self.beta_end.is_finite() {
            return Err(ReconError::ConfigError(format!(
                "scheduler betas must be finite, got [{}, {}]",
                self.beta_start, self.beta_end
            )));
        }
        if self.beta_start <= 0.0 || self.beta_end >= 1.0 || self.beta_start > self.beta_end {
            return Err(ReconError::ConfigError(format!(
                "scheduler betas must satisfy 0 < beta_start <= beta_end < 1, got [{}, {}]",
                self.beta_start, self.beta_end
            )));
        }
        Ok(())
    }
}

impl ReconConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> ReconResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Check schedule bounds and that every forward step fits in the schedule.
    pub fn validate(&self) -> ReconResult<()> {
        self.scheduler.validate()?;
        if let Some(&bad) = self
            .forward
            .steps
            .iter()
            .find(|&&t| t >= self.scheduler.timesteps)
        {
            return Err(ReconError::TimestepOutOfRange {
                t: bad,
                timesteps: self.scheduler.timesteps,
            });
        }
        if self.data.kspace_key.is_empty() {
            return Err(ReconError::ConfigError(
                "data.kspace_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Full path of the comparison figure.
    pub fn comparison_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.output.dir).join(&self.output.comparison_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// CARGO_MANIFEST_DIR points to crates/recon-types/, the workspace root is 2 up.
    fn config_path(relative: &str) -> String {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(relative)
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let cfg: ReconConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.scheduler.timesteps, 1000);
        assert!((cfg.scheduler.beta_start - 1e-4).abs() < 1e-15);
        assert!((cfg.scheduler.beta_end - 0.02).abs() < 1e-15);
        assert_eq!(cfg.data.kspace_key, "kspace");
        assert!(cfg.data.path.is_none());
        assert_eq!(cfg.output.dir, "outputs");
        assert_eq!(cfg.forward.steps, vec![0, 50, 150, 400, 999]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_load_default_config_file() {
        let cfg = ReconConfig::from_file(&config_path("configs/default.json")).unwrap();
        assert_eq!(cfg.scheduler.timesteps, 1000);
        assert_eq!(cfg.forward.steps.len(), 5);
        assert_eq!(
            cfg.comparison_path(),
            PathBuf::from("outputs").join("kspace_vs_image_comparison.png")
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let cfg: ReconConfig =
            serde_json::from_str(r#"{"scheduler": {"timesteps": 200}}"#).unwrap();
        assert_eq!(cfg.scheduler.timesteps, 200);
        assert!((cfg.scheduler.beta_end - 0.02).abs() < 1e-15);
        // default steps include 400 and 999, both past T=200
        assert!(matches!(
            cfg.validate(),
            Err(ReconError::TimestepOutOfRange { t: 400, timesteps: 200 })
        ));
    }

    #[test]
    fn test_rejects_bad_betas() {
        let mut sched = SchedulerConfig::default();
        sched.beta_start = 0.0;
        assert!(sched.validate().is_err());

        let mut sched = SchedulerConfig::default();
        sched.beta_start = 0.5;
        sched.beta_end = 0.1;
        assert!(sched.validate().is_err());

        let mut sched = SchedulerConfig::default();
        sched.beta_end = f64::NAN;
        assert!(sched.validate().is_err());

        let mut sched = SchedulerConfig::default();
        sched.timesteps = 0;
        assert!(sched.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ReconConfig::from_file("/nonexistent/diff-recon.json").unwrap_err();
        assert!(matches!(err, ReconError::Io(_)));
    }

    #[test]
    fn test_roundtrip_serialization() {
        let cfg = ReconConfig::default();
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let cfg2: ReconConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.scheduler.timesteps, cfg2.scheduler.timesteps);
        assert_eq!(cfg.forward.steps, cfg2.forward.steps);
        assert_eq!(cfg.output.comparison_file, cfg2.output.comparison_file);
    }
}
