//! Command handlers behind the `diffrecon` binary.

pub mod commands;
pub mod logging;
