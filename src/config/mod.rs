//! Configuration module
//!
//! Display and behavior settings, loaded from a TOML file.

pub mod config;
