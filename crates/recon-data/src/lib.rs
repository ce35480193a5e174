// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Recon Data
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! k-space data path.
//!
//! Archive loading, frequency masking, inverse-FFT reconstruction and a
//! synthetic phantom generator for runs without scanner data.

pub mod loader;
pub mod mask;
pub mod phantom;
pub mod reconstruct;
