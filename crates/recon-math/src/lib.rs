//! Mathematical primitives for Diff-Recon.

pub mod complex;
pub mod fft;
