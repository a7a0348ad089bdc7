//! Rendering-side building blocks of the label overlay
//!
//! - [`frame_state`]: per-frame camera matrices and screen geometry read from the host
//! - [`projection`]: world-space point to screen pixel conversion
//! - [`backend`]: the drawing primitives the host renderer provides

pub mod backend;
pub mod frame_state;
pub mod projection;

pub use backend::{DrawCommand, Font, LabelRenderBackend, RecordingBackend, Rgba, ScreenRect};
pub use frame_state::{DepthConvention, FrameSource, FrameState};
pub use projection::{project, ProjectionResult};
