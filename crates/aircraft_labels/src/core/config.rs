//! # Label Configuration
//!
//! Process-wide label settings, passed explicitly into every label pass
//! instead of living in mutable globals.
//!
//! ## Settings
//!
//! - **Enable flag**: Whether labels are drawn at all
//! - **Override**: Forces labels on or off regardless of the enable flag and per-aircraft flags
//! - **Distance**: Maximum label distance in nautical miles, optionally capped by visibility
//!
//! ## Example file (`label_demo.toml`)
//!
//! ```toml
//! draw_labels = true
//! label_override = "auto"
//! max_label_dist_nm = 3.0
//! cut_off_at_visibility = true
//! font = "proportional"
//! ```

use serde::{Serialize, Deserialize};

use crate::foundation::math::units;
use crate::render::backend::Font;

// Re-export from the file config module for convenience
pub use crate::config::{Config, ConfigError};

/// Smallest label distance accepted, in nautical miles
pub const MIN_LABEL_DIST_NM: f32 = 1.0;

/// Label distance used when nothing is configured, in nautical miles
pub const DEFAULT_LABEL_DIST_NM: f32 = 3.0;

/// Global label override mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOverride {
    /// Follow the enable flag and the per-aircraft label flags
    #[default]
    Auto,
    /// Draw labels for every rendered aircraft in range
    ForceOn,
    /// Never draw labels
    ForceOff,
}

/// # Label Configuration
///
/// Read-only during a label pass; change it only between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Whether label drawing is enabled
    pub draw_labels: bool,
    /// Override mode applied on top of the enable flag
    pub label_override: LabelOverride,
    /// Maximum label distance in nautical miles
    pub max_label_dist_nm: f32,
    /// Cap the label distance at the visibility reported by the host
    pub cut_off_at_visibility: bool,
    /// Font used to measure and draw label text
    pub font: Font,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            draw_labels: true,
            label_override: LabelOverride::Auto,
            max_label_dist_nm: DEFAULT_LABEL_DIST_NM,
            cut_off_at_visibility: true,
            font: Font::Proportional,
        }
    }
}

impl Config for LabelConfig {}

impl LabelConfig {
    /// Set the override mode
    pub fn with_override(mut self, label_override: LabelOverride) -> Self {
        self.label_override = label_override;
        self
    }

    /// Enable or disable label drawing
    pub fn with_labels(mut self, enabled: bool) -> Self {
        self.draw_labels = enabled;
        self
    }

    /// Set the maximum label distance and visibility cut-off
    pub fn with_label_distance(mut self, dist_nm: f32, cut_off_at_visibility: bool) -> Self {
        self.set_label_distance(dist_nm, cut_off_at_visibility);
        self
    }

    /// Configure maximum label distance and whether labels are cut off at reported visibility
    ///
    /// Distances below one nautical mile are raised to one.
    pub fn set_label_distance(&mut self, dist_nm: f32, cut_off_at_visibility: bool) {
        self.cut_off_at_visibility = cut_off_at_visibility;
        self.max_label_dist_nm = dist_nm.max(MIN_LABEL_DIST_NM);
    }

    /// Maximum label distance in meters
    pub fn max_label_dist_m(&self) -> f32 {
        units::nm_to_m(self.max_label_dist_nm.max(MIN_LABEL_DIST_NM))
    }

    /// Whether a label pass should do any work at all
    pub fn labels_active(&self) -> bool {
        match self.label_override {
            LabelOverride::ForceOff => false,
            LabelOverride::ForceOn => true,
            LabelOverride::Auto => self.draw_labels,
        }
    }

    /// Whether per-aircraft label flags are ignored
    pub fn labels_forced(&self) -> bool {
        self.label_override == LabelOverride::ForceOn
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_label_dist_nm.is_finite() || self.max_label_dist_nm <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_label_dist_nm must be a positive number, got {}",
                self.max_label_dist_nm
            )));
        }
        Ok(())
    }
}
