// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Diffusion Scheduler
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Linear β schedule with precomputed reparameterization coefficients.
//!
//! Forward sample at step t:
//!   x_t = sqrt(ᾱ_t) · x_0 + sqrt(1 − ᾱ_t) · ε,   ε ~ N(0, 1)
//! with ᾱ_t = Π_{s<=t} (1 − β_s).

use ndarray::{Array1, Array2, Array3, Axis};
use rand::Rng;
use rand_distr::StandardNormal;
use recon_types::config::SchedulerConfig;
use recon_types::constants::{DEFAULT_BETA_END, DEFAULT_BETA_START, DEFAULT_TIMESTEPS};
use recon_types::error::{ReconError, ReconResult};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DiffusionScheduler {
    timesteps: usize,
    /// β_t, linear in t.
    betas: Array1<f64>,
    /// α_t = 1 − β_t.
    alphas: Array1<f64>,
    /// ᾱ_t, cumulative product of α.
    alphas_cumprod: Array1<f64>,
    sqrt_alphas_cumprod: Array1<f64>,
    sqrt_one_minus_alphas_cumprod: Array1<f64>,
}

impl DiffusionScheduler {
    /// Validated constructor.
    pub fn new(timesteps: usize, beta_start: f64, beta_end: f64) -> ReconResult<Self> {
        SchedulerConfig {
            timesteps,
            beta_start,
            beta_end,
        }
        .validate()?;
        Ok(Self::build(timesteps, beta_start, beta_end))
    }

    pub fn from_config(cfg: &SchedulerConfig) -> ReconResult<Self> {
        Self::new(cfg.timesteps, cfg.beta_start, cfg.beta_end)
    }

    fn build(timesteps: usize, beta_start: f64, beta_end: f64) -> Self {
        let betas = Array1::linspace(beta_start, beta_end, timesteps);
        let alphas = betas.mapv(|b| 1.0 - b);

        let mut alphas_cumprod = Array1::zeros(timesteps);
        let mut acc = 1.0;
        for (dst, &a) in alphas_cumprod.iter_mut().zip(alphas.iter()) {
            acc *= a;
            *dst = acc;
        }

        let sqrt_alphas_cumprod = alphas_cumprod.mapv(f64::sqrt);
        let sqrt_one_minus_alphas_cumprod = alphas_cumprod.mapv(|a| (1.0 - a).sqrt());

        debug!(
            timesteps,
            beta_start,
            beta_end,
            alpha_bar_final = alphas_cumprod[timesteps - 1],
            "built linear diffusion schedule"
        );

        DiffusionScheduler {
            timesteps,
            betas,
            alphas,
            alphas_cumprod,
            sqrt_alphas_cumprod,
            sqrt_one_minus_alphas_cumprod,
        }
    }

    /// Number of diffusion steps T.
    pub fn timesteps(&self) -> usize {
        self.timesteps
    }

    pub fn betas(&self) -> &Array1<f64> {
        &self.betas
    }

    pub fn alphas(&self) -> &Array1<f64> {
        &self.alphas
    }

    pub fn alphas_cumprod(&self) -> &Array1<f64> {
        &self.alphas_cumprod
    }

    pub fn sqrt_alphas_cumprod(&self) -> &Array1<f64> {
        &self.sqrt_alphas_cumprod
    }

    pub fn sqrt_one_minus_alphas_cumprod(&self) -> &Array1<f64> {
        &self.sqrt_one_minus_alphas_cumprod
    }

    fn check_timestep(&self, t: usize) -> ReconResult<()> {
        if t >= self.timesteps {
            return Err(ReconError::TimestepOutOfRange {
                t,
                timesteps: self.timesteps,
            });
        }
        Ok(())
    }

    /// (sqrt(ᾱ_t), sqrt(1 − ᾱ_t)) for step t.
    pub fn coefficients(&self, t: usize) -> ReconResult<(f64, f64)> {
        self.check_timestep(t)?;
        Ok((
            self.sqrt_alphas_cumprod[t],
            self.sqrt_one_minus_alphas_cumprod[t],
        ))
    }

    fn check_batch(&self, batch: usize, t: &[usize]) -> ReconResult<()> {
        if t.len() != batch {
            return Err(ReconError::ShapeMismatch {
                expected: format!("{batch} timesteps (one per batch element)"),
                found: format!("{} timesteps", t.len()),
            });
        }
        t.iter().try_for_each(|&step| self.check_timestep(step))
    }

    /// Apply the forward identity with caller-supplied noise.
    ///
    /// `x_start` and `noise` are (batch, H, W); `t[b]` is the step of element b.
    pub fn add_noise_with(
        &self,
        x_start: &Array3<f64>,
        t: &[usize],
        noise: &Array3<f64>,
    ) -> ReconResult<Array3<f64>> {
        if noise.dim() != x_start.dim() {
            return Err(ReconError::ShapeMismatch {
                expected: format!("noise shape {:?}", x_start.dim()),
                found: format!("{:?}", noise.dim()),
            });
        }
        self.check_batch(x_start.len_of(Axis(0)), t)?;

        let mut x_noisy = Array3::zeros(x_start.dim());
        for (b, &step) in t.iter().enumerate() {
            let signal = self.sqrt_alphas_cumprod[step];
            let spread = self.sqrt_one_minus_alphas_cumprod[step];
            let mut out = x_noisy.index_axis_mut(Axis(0), b);
            out.assign(&x_start.index_axis(Axis(0), b));
            out.zip_mut_with(&noise.index_axis(Axis(0), b), |x, &eps| {
                *x = signal * *x + spread * eps;
            });
        }
        Ok(x_noisy)
    }

    /// Forward process: noise a batch of clean images at per-element steps.
    ///
    /// Returns `(x_noisy, noise)`, both shaped like `x_start`.
    pub fn add_noise<R: Rng + ?Sized>(
        &self,
        x_start: &Array3<f64>,
        t: &[usize],
        rng: &mut R,
    ) -> ReconResult<(Array3<f64>, Array3<f64>)> {
        self.check_batch(x_start.len_of(Axis(0)), t)?;
        let noise = Array3::from_shape_simple_fn(x_start.dim(), || {
            rng.sample::<f64, _>(StandardNormal)
        });
        let x_noisy = self.add_noise_with(x_start, t, &noise)?;
        Ok((x_noisy, noise))
    }

    /// Single-image convenience over [`add_noise`](Self::add_noise).
    pub fn add_noise_2d<R: Rng + ?Sized>(
        &self,
        image: &Array2<f64>,
        t: usize,
        rng: &mut R,
    ) -> ReconResult<(Array2<f64>, Array2<f64>)> {
        let batch = image.clone().insert_axis(Axis(0));
        let (x_noisy, noise) = self.add_noise(&batch, &[t], rng)?;
        Ok((x_noisy.index_axis_move(Axis(0), 0), noise.index_axis_move(Axis(0), 0)))
    }
}

impl Default for DiffusionScheduler {
    /// T = 1000, β from 1e-4 to 0.02.
    fn default() -> Self {
        Self::build(DEFAULT_TIMESTEPS, DEFAULT_BETA_START, DEFAULT_BETA_END)
    }
}
