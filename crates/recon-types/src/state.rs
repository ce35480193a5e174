// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ReconError;

/// Frequency mask applied to k-space before reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskType {
    /// No filtering.
    #[serde(rename = "none")]
    Full,
    /// Keep the central half of k-space, zero the outer ring.
    LowPass,
    /// Zero the central half of k-space, keep the outer ring.
    HighPass,
}

impl MaskType {
    /// Order used by the comparison figure.
    pub const ALL: [MaskType; 3] = [MaskType::Full, MaskType::LowPass, MaskType::HighPass];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaskType::Full => "none",
            MaskType::LowPass => "low_pass",
            MaskType::HighPass => "high_pass",
        }
    }
}

impl fmt::Display for MaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaskType {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "full" => Ok(MaskType::Full),
            "low_pass" | "lowpass" => Ok(MaskType::LowPass),
            "high_pass" | "highpass" => Ok(MaskType::HighPass),
            other => Err(ReconError::ConfigError(format!(
                "unknown mask type '{other}', expected none | low_pass | high_pass"
            ))),
        }
    }
}

/// Result of reconstructing one k-space slice.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// Magnitude image |ifft2c(k)| [H, W].
    pub image_abs: Array2<f64>,
    /// The (masked) k-space that produced the image [H, W].
    pub kspace: Array2<Complex64>,
    pub mask: MaskType,
}

impl Reconstruction {
    pub fn dim(&self) -> (usize, usize) {
        self.image_abs.dim()
    }
}
