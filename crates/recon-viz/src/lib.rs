//! Figure rendering.
//!
//! Panels are min-max scaled grayscale images tiled into a grid and written
//! as PNG. Panel order is fixed per figure and documented on each builder.

pub mod figures;
pub mod render;
