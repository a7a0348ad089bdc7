//! # Core Module
//!
//! Shared abstractions that the projection and label subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: Label configuration (enable flag, override, distance limits)
//! - **Foundation**: Low-level utilities (math, units, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    LabelConfig,
    LabelOverride,
    Config,
    ConfigError,
};
