//! # Aircraft Labels
//!
//! Per-frame label overlay for simulated aircraft in a flight-simulator host.
//!
//! ## Features
//!
//! - **Projection**: CPU-side replay of the OpenGL transform pipeline to find
//!   where a world-space point lands on screen
//! - **Culling**: Distance cutoff scaled by camera zoom and capped by reported visibility
//! - **Layout**: Background box, primary label and optional sub-label per aircraft
//! - **Host-agnostic**: Data references, draw callbacks and text drawing sit behind traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aircraft_labels::prelude::*;
//!
//! fn frame(source: &dyn FrameSource, fleet: &[Aircraft]) {
//!     let config = LabelConfig::default();
//!     let mut renderer = LabelRenderer::new();
//!     let mut backend = RecordingBackend::new();
//!
//!     let stats = renderer.draw_all_labels(source, fleet, &config, &mut backend);
//!     assert!(stats.drawn <= fleet.len());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core configuration
pub mod core;

pub mod foundation;
pub mod config;
pub mod render;
pub mod labels;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        core::config::{LabelConfig, LabelOverride},
        foundation::math::{Vec3, Vec4, Mat4},
        render::{
            backend::{DrawCommand, Font, LabelRenderBackend, RecordingBackend, Rgba, ScreenRect},
            frame_state::{DataRefFrameSource, DataRefHost, DepthConvention, FrameSource, FrameState},
            projection::{project, ProjectionResult},
        },
        labels::{
            aircraft::{Aircraft, AircraftId, ModelInfo, WakeCategory},
            controller::{DrawCallbackHost, LabelController},
            LabelError, LabelPassStats, LabelRenderer,
        },
    };
}
