//! # Label Selection and Drawing
//!
//! Decides, once per frame, which aircraft get a label and where it goes.
//!
//! ## Per-frame pass
//!
//! 1. Bail out without touching the host if labels are inactive.
//! 2. Refresh the [`FrameState`] from the host.
//! 3. Compute the distance cutoff from configuration, visibility and zoom.
//! 4. For every aircraft: filter, project the label anchor, lay out the box
//!    and issue draw calls.
//!
//! A failure while handling one aircraft (backend error or panic) is logged
//! with the aircraft's id and only costs that aircraft its label.

pub mod aircraft;
pub mod controller;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::config::LabelConfig;
use crate::render::backend::{LabelRenderBackend, Rgba, ScreenRect};
use crate::render::frame_state::{FrameSource, FrameState};
use crate::render::projection::project;

use aircraft::Aircraft;

/// Fixed color of the sub-label: semi-transparent white
pub const SUB_LABEL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.6];

/// Horizontal padding of the background box on each side
pub const BOX_PADDING_X: i32 = 5;
/// Box extent above the label baseline
pub const BOX_TOP_OFFSET: i32 = 15;
/// Box extent below the label baseline
pub const BOX_BOTTOM_OFFSET: i32 = 10;
/// Distance between label and sub-label baselines
pub const SUB_LABEL_SPACING: i32 = 25;

/// Label subsystem errors
#[derive(Error, Debug)]
pub enum LabelError {
    /// The host refused to (un)register the drawing callback
    #[error("Draw callback registration failed: {0}")]
    CallbackRegistration(String),

    /// A draw call failed
    #[error("Render backend error: {0}")]
    Backend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<Box<dyn std::error::Error>> for LabelError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        Self::Backend(err.to_string())
    }
}

/// What happened to one aircraft during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LabelOutcome {
    /// The host does not render the aircraft
    NotRendered,
    /// Label switched off for this aircraft
    Suppressed,
    /// Farther away than the label cutoff
    TooFar,
    /// Anchor point outside the depth range
    OffScreen,
    /// Box and text were drawn
    Drawn,
}

/// Counters for one label pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelPassStats {
    /// Aircraft looked at
    pub considered: usize,
    /// Labels drawn
    pub drawn: usize,
    /// Skipped because not rendered
    pub not_rendered: usize,
    /// Skipped because the label flag is off
    pub suppressed: usize,
    /// Skipped because of distance
    pub too_far: usize,
    /// Skipped because the anchor is not visible
    pub off_screen: usize,
    /// Skipped because processing failed
    pub failed: usize,
}

impl LabelPassStats {
    fn record(&mut self, outcome: LabelOutcome) {
        match outcome {
            LabelOutcome::NotRendered => self.not_rendered += 1,
            LabelOutcome::Suppressed => self.suppressed += 1,
            LabelOutcome::TooFar => self.too_far += 1,
            LabelOutcome::OffScreen => self.off_screen += 1,
            LabelOutcome::Drawn => self.drawn += 1,
        }
    }
}

/// Screen placement of one label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelLayout {
    /// Background box
    pub background: ScreenRect,
    /// Primary label position `(x, baseline)`
    pub label: (i32, i32),
    /// Sub-label position, if there is one
    pub sub_label: Option<(i32, i32)>,
}

/// Lay out a label centered horizontally on `(x, y)`
///
/// The box is as wide as the wider of the two texts plus padding; both texts
/// are centered inside it. Coordinates saturate at the `i32` range, so an
/// anchor projected far off screen still yields an ordered box.
pub fn layout_label(x: i32, y: i32, label_width: i32, sub_label_width: Option<i32>) -> LabelLayout {
    let box_width = label_width.max(sub_label_width.unwrap_or(0));
    let box_left = x.saturating_sub(box_width / 2);
    let box_right = box_left.saturating_add(box_width);

    LabelLayout {
        background: ScreenRect {
            left: box_left.saturating_sub(BOX_PADDING_X),
            top: y.saturating_add(BOX_TOP_OFFSET),
            right: box_right.saturating_add(BOX_PADDING_X),
            bottom: y.saturating_sub(BOX_BOTTOM_OFFSET),
        },
        label: (box_left.saturating_add((box_width - label_width) / 2), y),
        sub_label: sub_label_width.map(|w| {
            (box_left.saturating_add((box_width - w) / 2), y.saturating_sub(SUB_LABEL_SPACING))
        }),
    }
}

/// Farthest camera distance at which labels are drawn, in meters
///
/// The configured maximum, capped by the reported visibility when the
/// cut-off option is on, then scaled by camera zoom: zooming in makes far
/// aircraft readable.
pub fn max_label_distance(config: &LabelConfig, frame: &FrameState) -> f32 {
    let configured = config.max_label_dist_m();
    let visibility = if config.cut_off_at_visibility {
        frame.visibility_m.unwrap_or(configured)
    } else {
        configured
    };
    configured.min(visibility) * frame.camera_zoom
}

/// Per-frame label renderer
///
/// Owns the frame-state cache; everything else is passed in per call.
#[derive(Debug, Clone, Default)]
pub struct LabelRenderer {
    frame: FrameState,
}

impl LabelRenderer {
    /// Create a renderer with an empty frame state
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame state as of the last refresh
    pub const fn frame_state(&self) -> &FrameState {
        &self.frame
    }

    /// Draw labels for all eligible aircraft
    ///
    /// Aircraft are processed in iterator order; each exactly once.
    pub fn draw_all_labels<'a, I>(
        &mut self,
        source: &dyn FrameSource,
        aircraft: I,
        config: &LabelConfig,
        backend: &mut dyn LabelRenderBackend,
    ) -> LabelPassStats
    where
        I: IntoIterator<Item = &'a Aircraft>,
    {
        let mut stats = LabelPassStats::default();
        if !config.labels_active() {
            return stats;
        }

        self.frame.refresh(source);
        let frame = &self.frame;
        let max_distance = max_label_distance(config, frame);

        for ac in aircraft {
            stats.considered += 1;

            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                Self::draw_label(frame, ac, config, max_distance, &mut *backend)
            }));

            match result {
                Ok(Ok(outcome)) => stats.record(outcome),
                Ok(Err(err)) => {
                    stats.failed += 1;
                    log::warn!("Aircraft {}: label not drawn: {}", ac.id, err);
                }
                Err(payload) => {
                    stats.failed += 1;
                    log::warn!(
                        "Aircraft {}: label drawing panicked: {}",
                        ac.id,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        log::trace!(
            "Label pass: {} aircraft, {} drawn, {} too far, {} off screen, {} failed (cutoff {:.0} m)",
            stats.considered,
            stats.drawn,
            stats.too_far,
            stats.off_screen,
            stats.failed,
            max_distance
        );
        stats
    }

    fn draw_label(
        frame: &FrameState,
        ac: &Aircraft,
        config: &LabelConfig,
        max_distance: f32,
        backend: &mut dyn LabelRenderBackend,
    ) -> Result<LabelOutcome, LabelError> {
        if !ac.rendered {
            return Ok(LabelOutcome::NotRendered);
        }
        if !(ac.draw_label || config.labels_forced()) {
            return Ok(LabelOutcome::Suppressed);
        }
        if ac.camera_distance > max_distance {
            return Ok(LabelOutcome::TooFar);
        }

        // Place the label above the aircraft, not across it
        let projected = project(&ac.label_anchor(), frame);
        if !projected.visible {
            return Ok(LabelOutcome::OffScreen);
        }

        let font = config.font;
        let label_width = backend.measure_text_width(&ac.label, font);
        let sub_label_width = ac
            .has_sub_label()
            .then(|| backend.measure_text_width(&ac.sub_label, font));

        let layout = layout_label(projected.screen_x, projected.screen_y, label_width, sub_label_width);

        backend.draw_translucent_quad(layout.background, ac.background_color)?;
        backend.draw_text(layout.label.0, layout.label.1, ac.label_color, &ac.label, font)?;
        if let Some((x, y)) = layout.sub_label {
            backend.draw_text(x, y, Rgba::from(SUB_LABEL_COLOR), &ac.sub_label, font)?;
        }

        Ok(LabelOutcome::Drawn)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
