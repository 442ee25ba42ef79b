//! Data layer for the college table
//!
//! Records are loaded once and never mutated. Everything the rendering
//! surfaces show is derived from them on demand.

pub mod display;
pub mod exporter;
pub mod loaders;
pub mod record;
