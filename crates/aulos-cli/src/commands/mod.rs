//! CLI command implementations.

pub mod patch;
pub mod render;
