// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Recon Diffusion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Score-based diffusion groundwork.
//!
//! Forward process only: variance schedule and closed-form noising.

pub mod scheduler;
