// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Number of forward diffusion steps T.
pub const DEFAULT_TIMESTEPS: usize = 1000;

/// First value of the linear β schedule.
pub const DEFAULT_BETA_START: f64 = 1e-4;

/// Last value of the linear β schedule.
pub const DEFAULT_BETA_END: f64 = 0.02;

/// Offset added before taking log of k-space magnitude, avoids log(0).
pub const LOG_EPS: f64 = 1e-9;

/// Timesteps shown in the forward-noise strip.
pub const DEFAULT_FORWARD_STEPS: [usize; 5] = [0, 50, 150, 400, 999];

/// Dataset name used by fastMRI singlecoil volumes.
pub const DEFAULT_KSPACE_KEY: &str = "kspace";

/// Default directory for rendered figures.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// File name of the k-space vs image comparison figure.
pub const COMPARISON_FILE: &str = "kspace_vs_image_comparison.png";
