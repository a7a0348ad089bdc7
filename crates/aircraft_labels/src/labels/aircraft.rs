//! Aircraft snapshots as seen by the label pass
//!
//! The aircraft manager owns and updates the traffic; the label pass only
//! reads one snapshot per aircraft per frame.

use std::fmt;

use crate::foundation::math::Vec3;
use crate::render::backend::Rgba;

/// Vertical label offset when nothing better is known, in meters
pub const DEFAULT_LABEL_OFFSET: f32 = 10.0;
/// Vertical label offset for light aircraft
pub const LIGHT_LABEL_OFFSET: f32 = 6.0;
/// Vertical label offset for heavy aircraft
pub const HEAVY_LABEL_OFFSET: f32 = 11.0;

/// Aircraft identity, typically the 24-bit ICAO transponder address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AircraftId(pub u32);

impl fmt::Display for AircraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}

/// ICAO wake-turbulence category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WakeCategory {
    /// `L`
    Light,
    /// `M`
    Medium,
    /// `H`
    Heavy,
    /// `J`
    Super,
    /// Anything else, including an empty code
    Unknown,
}

impl WakeCategory {
    /// Parse the category from the first character of an ICAO wake code
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('L') => Self::Light,
            Some('M') => Self::Medium,
            Some('H') => Self::Heavy,
            Some('J') => Self::Super,
            _ => Self::Unknown,
        }
    }

    /// How far above the aircraft's reference point the label goes
    ///
    /// Only light and heavy aircraft deviate from the default.
    pub const fn label_offset(self) -> f32 {
        match self {
            Self::Light => LIGHT_LABEL_OFFSET,
            Self::Heavy => HEAVY_LABEL_OFFSET,
            Self::Medium | Self::Super | Self::Unknown => DEFAULT_LABEL_OFFSET,
        }
    }
}

/// The visual model an aircraft is rendered with
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelInfo {
    /// Model name
    pub name: String,
    /// ICAO aircraft type designator
    pub icao_type: String,
    /// Wake-turbulence category code from ICAO Doc 8643
    pub wtc: String,
}

impl ModelInfo {
    /// Create a model record
    pub fn new(name: impl Into<String>, icao_type: impl Into<String>, wtc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icao_type: icao_type.into(),
            wtc: wtc.into(),
        }
    }

    /// Wake category of this model
    pub fn wake_category(&self) -> WakeCategory {
        WakeCategory::from_code(&self.wtc)
    }
}

/// Read-only per-frame view of one aircraft
#[derive(Debug, Clone, PartialEq)]
pub struct Aircraft {
    /// Identity, used in log messages
    pub id: AircraftId,
    /// Position in local world coordinates (meters, Y up)
    pub position: Vec3,
    /// Whether the host currently renders the aircraft
    pub rendered: bool,
    /// Per-aircraft label flag
    pub draw_label: bool,
    /// Distance to the camera in meters
    pub camera_distance: f32,
    /// Visual model, if one is assigned
    pub model: Option<ModelInfo>,
    /// Primary label text
    pub label: String,
    /// Secondary label text, empty if none
    pub sub_label: String,
    /// Primary label color
    pub label_color: Rgba,
    /// Background box color including alpha
    pub background_color: Rgba,
}

impl Aircraft {
    /// Yellow, the classic label color
    pub const DEFAULT_LABEL_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    /// Translucent black behind the text
    pub const DEFAULT_BACKGROUND_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.5];

    /// Create a rendered, labelled aircraft at `position`
    pub fn new(id: AircraftId, label: impl Into<String>, position: Vec3) -> Self {
        Self {
            id,
            position,
            rendered: true,
            draw_label: true,
            camera_distance: 0.0,
            model: None,
            label: label.into(),
            sub_label: String::new(),
            label_color: Rgba::from(Self::DEFAULT_LABEL_COLOR),
            background_color: Rgba::from(Self::DEFAULT_BACKGROUND_COLOR),
        }
    }

    /// Set the secondary label
    pub fn with_sub_label(mut self, sub_label: impl Into<String>) -> Self {
        self.sub_label = sub_label.into();
        self
    }

    /// Assign a visual model
    pub fn with_model(mut self, model: ModelInfo) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the distance to the camera
    pub fn with_camera_distance(mut self, distance: f32) -> Self {
        self.camera_distance = distance;
        self
    }

    /// Set label and background colors
    pub fn with_colors(mut self, label_color: Rgba, background_color: Rgba) -> Self {
        self.label_color = label_color;
        self.background_color = background_color;
        self
    }

    /// Mark the aircraft as rendered or not
    pub fn with_rendered(mut self, rendered: bool) -> Self {
        self.rendered = rendered;
        self
    }

    /// Set the per-aircraft label flag
    pub fn with_draw_label(mut self, draw_label: bool) -> Self {
        self.draw_label = draw_label;
        self
    }

    /// Wake category, `Unknown` without a model
    pub fn wake_category(&self) -> WakeCategory {
        self.model
            .as_ref()
            .map_or(WakeCategory::Unknown, ModelInfo::wake_category)
    }

    /// Vertical label offset in meters
    pub fn vertical_label_offset(&self) -> f32 {
        self.wake_category().label_offset()
    }

    /// Point the label is anchored to
    pub fn label_anchor(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + self.vertical_label_offset(),
            self.position.z,
        )
    }

    /// Whether a sub-label should be drawn
    pub fn has_sub_label(&self) -> bool {
        !self.sub_label.is_empty()
    }
}
