//! # Frame-State Cache
//!
//! Holds the camera matrices and screen geometry for the current frame.
//! The label pass refreshes it once from the host before projecting anything,
//! and treats it as read-only for the rest of the frame.
//!
//! ## Host data model
//! Hosts expose their state best-effort: any value may be missing. A missing
//! value keeps whatever the cache held before, so callers must tolerate
//! stale or zero values (e.g. a zero-sized screen before the first read).

use crate::foundation::math::{Mat4, mat4_from_gl};

/// Depth range convention of the active graphics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthConvention {
    /// OpenGL: normalized depth in [-1, 1]
    #[default]
    Legacy,
    /// Vulkan/Metal: normalized depth in [0, 1]
    Modern,
}

impl DepthConvention {
    /// Pick the convention from the host's "modern driver" flag
    pub const fn from_modern_flag(modern: bool) -> Self {
        if modern { Self::Modern } else { Self::Legacy }
    }

    /// Valid normalized-device depth range, inclusive
    pub const fn ndc_depth_range(self) -> (f32, f32) {
        match self {
            Self::Legacy => (-1.0, 1.0),
            Self::Modern => (0.0, 1.0),
        }
    }

    /// Whether a normalized depth lies between the near and far planes
    pub fn contains(self, ndc_z: f32) -> bool {
        let (near, far) = self.ndc_depth_range();
        near <= ndc_z && ndc_z <= far
    }
}

/// Per-frame view state read from the host
pub trait FrameSource {
    /// World (model-view) matrix
    fn world_matrix(&self) -> Option<Mat4>;

    /// Projection matrix
    fn projection_matrix(&self) -> Option<Mat4>;

    /// Window size in pixels as `(width, height)`
    fn screen_size(&self) -> Option<(f32, f32)>;

    /// Field of view in degrees
    fn field_of_view(&self) -> Option<f32>;

    /// Effective atmospheric visibility in meters
    fn visibility_m(&self) -> Option<f32>;

    /// Camera zoom factor, 1.0 when not zoomed
    fn camera_zoom(&self) -> Option<f32>;

    /// Whether the host renders through a [0, 1]-depth backend
    fn uses_modern_depth(&self) -> Option<bool>;
}

/// Cached view state for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    /// World (model-view) matrix
    pub world_matrix: Mat4,
    /// Projection matrix
    pub projection_matrix: Mat4,
    /// Screen width in pixels
    pub screen_width: f32,
    /// Screen height in pixels
    pub screen_height: f32,
    /// Field of view in degrees; read for completeness, unused by the projection
    pub field_of_view: f32,
    /// Visibility in meters, `None` when the host does not report it
    pub visibility_m: Option<f32>,
    /// Camera zoom factor
    pub camera_zoom: f32,
    /// Depth convention used to decide visibility
    pub depth_convention: DepthConvention,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            world_matrix: Mat4::identity(),
            projection_matrix: Mat4::identity(),
            screen_width: 0.0,
            screen_height: 0.0,
            field_of_view: 0.0,
            visibility_m: None,
            camera_zoom: 1.0,
            depth_convention: DepthConvention::Legacy,
        }
    }
}

impl FrameState {
    /// Create an empty frame state
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read all values from the host
    ///
    /// Missing values keep their previous content, except visibility which
    /// mirrors the source so that an unavailable visibility disables the cap.
    pub fn refresh(&mut self, source: &dyn FrameSource) {
        if let Some(m) = source.world_matrix() {
            self.world_matrix = m;
        }
        if let Some(m) = source.projection_matrix() {
            self.projection_matrix = m;
        }
        if let Some((w, h)) = source.screen_size() {
            self.screen_width = w;
            self.screen_height = h;
        }
        if let Some(fov) = source.field_of_view() {
            self.field_of_view = fov;
        }
        if let Some(zoom) = source.camera_zoom() {
            self.camera_zoom = zoom;
        }
        if let Some(modern) = source.uses_modern_depth() {
            self.depth_convention = DepthConvention::from_modern_flag(modern);
        }
        self.visibility_m = source.visibility_m();
    }
}

/// Plain-data frame source
///
/// Useful for hosts that already gathered their view state, for replaying
/// recorded frames, and for tests.
#[derive(Debug, Clone, Default)]
pub struct FixedFrameSource {
    /// World matrix to report
    pub world_matrix: Option<Mat4>,
    /// Projection matrix to report
    pub projection_matrix: Option<Mat4>,
    /// Screen size to report
    pub screen_size: Option<(f32, f32)>,
    /// Field of view to report
    pub field_of_view: Option<f32>,
    /// Visibility to report
    pub visibility_m: Option<f32>,
    /// Zoom to report
    pub camera_zoom: Option<f32>,
    /// Modern-driver flag to report
    pub modern_depth: Option<bool>,
}

impl FixedFrameSource {
    /// Source reporting the given camera on a screen of the given size
    pub fn new(world: Mat4, projection: Mat4, width: f32, height: f32) -> Self {
        Self {
            world_matrix: Some(world),
            projection_matrix: Some(projection),
            screen_size: Some((width, height)),
            field_of_view: None,
            visibility_m: None,
            camera_zoom: Some(1.0),
            modern_depth: Some(false),
        }
    }

    /// Report a visibility distance
    pub fn with_visibility(mut self, visibility_m: f32) -> Self {
        self.visibility_m = Some(visibility_m);
        self
    }

    /// Report a camera zoom factor
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.camera_zoom = Some(zoom);
        self
    }

    /// Report the depth convention
    pub fn with_depth(mut self, convention: DepthConvention) -> Self {
        self.modern_depth = Some(convention == DepthConvention::Modern);
        self
    }
}

impl FrameSource for FixedFrameSource {
    fn world_matrix(&self) -> Option<Mat4> {
        self.world_matrix
    }

    fn projection_matrix(&self) -> Option<Mat4> {
        self.projection_matrix
    }

    fn screen_size(&self) -> Option<(f32, f32)> {
        self.screen_size
    }

    fn field_of_view(&self) -> Option<f32> {
        self.field_of_view
    }

    fn visibility_m(&self) -> Option<f32> {
        self.visibility_m
    }

    fn camera_zoom(&self) -> Option<f32> {
        self.camera_zoom
    }

    fn uses_modern_depth(&self) -> Option<bool> {
        self.modern_depth
    }
}

/// Opaque handle to a resolved host data reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataRef(pub u64);

/// Named data references as published by the simulator
pub mod data_ref_names {
    /// World (model-view) matrix, 16 floats
    pub const WORLD_MATRIX: &str = "sim/graphics/view/world_matrix";
    /// 3D projection matrix, 16 floats
    pub const PROJECTION_MATRIX: &str = "sim/graphics/view/projection_matrix_3d";
    /// Window width in pixels
    pub const WINDOW_WIDTH: &str = "sim/graphics/view/window_width";
    /// Window height in pixels
    pub const WINDOW_HEIGHT: &str = "sim/graphics/view/window_height";
    /// Effective visibility, newer simulator versions
    pub const VISIBILITY: &str = "sim/graphics/view/visibility_effective_m";
    /// Effective visibility, older simulator versions
    pub const VISIBILITY_LEGACY: &str = "sim/weather/visibility_effective_m";
    /// Field of view in degrees
    pub const FIELD_OF_VIEW: &str = "sim/graphics/view/field_of_view_deg";
}

/// Low-level host access through named data references
pub trait DataRefHost {
    /// Resolve a data reference by name
    fn find_data_ref(&self, name: &str) -> Option<DataRef>;

    /// Read a float value
    fn get_f32(&self, data_ref: DataRef) -> f32;

    /// Read an integer value
    fn get_i32(&self, data_ref: DataRef) -> i32;

    /// Read a float array into `out`, returning the number of values copied
    fn get_f32_array(&self, data_ref: DataRef, out: &mut [f32]) -> usize;

    /// Current camera zoom factor
    fn camera_zoom(&self) -> Option<f32>;

    /// Whether the simulator runs on a Vulkan/Metal driver
    fn using_modern_graphics_driver(&self) -> bool;
}

/// [`FrameSource`] backed by simulator data references
///
/// References are resolved once on construction; unresolved ones simply
/// report `None` every frame.
pub struct DataRefFrameSource<H: DataRefHost> {
    host: H,
    world_matrix: Option<DataRef>,
    projection_matrix: Option<DataRef>,
    window_width: Option<DataRef>,
    window_height: Option<DataRef>,
    visibility: Option<DataRef>,
    field_of_view: Option<DataRef>,
}

impl<H: DataRefHost> DataRefFrameSource<H> {
    /// Resolve all data references on `host`
    pub fn new(host: H) -> Self {
        let find = |name: &str| {
            let found = host.find_data_ref(name);
            if found.is_none() {
                log::debug!("Data reference '{}' not available", name);
            }
            found
        };

        let world_matrix = find(data_ref_names::WORLD_MATRIX);
        let projection_matrix = find(data_ref_names::PROJECTION_MATRIX);
        let window_width = find(data_ref_names::WINDOW_WIDTH);
        let window_height = find(data_ref_names::WINDOW_HEIGHT);
        let visibility = host
            .find_data_ref(data_ref_names::VISIBILITY)
            .or_else(|| find(data_ref_names::VISIBILITY_LEGACY));
        let field_of_view = find(data_ref_names::FIELD_OF_VIEW);

        Self {
            host,
            world_matrix,
            projection_matrix,
            window_width,
            window_height,
            visibility,
            field_of_view,
        }
    }

    /// The wrapped host
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the wrapped host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn read_matrix(&self, data_ref: Option<DataRef>) -> Option<Mat4> {
        let mut raw = [0.0_f32; 16];
        let copied = self.host.get_f32_array(data_ref?, &mut raw);
        (copied == raw.len()).then(|| mat4_from_gl(&raw))
    }
}

impl<H: DataRefHost> FrameSource for DataRefFrameSource<H> {
    fn world_matrix(&self) -> Option<Mat4> {
        self.read_matrix(self.world_matrix)
    }

    fn projection_matrix(&self) -> Option<Mat4> {
        self.read_matrix(self.projection_matrix)
    }

    fn screen_size(&self) -> Option<(f32, f32)> {
        let width = self.host.get_i32(self.window_width?);
        let height = self.host.get_i32(self.window_height?);
        Some((width as f32, height as f32))
    }

    fn field_of_view(&self) -> Option<f32> {
        self.field_of_view.map(|r| self.host.get_f32(r))
    }

    fn visibility_m(&self) -> Option<f32> {
        self.visibility.map(|r| self.host.get_f32(r))
    }

    fn camera_zoom(&self) -> Option<f32> {
        self.host.camera_zoom()
    }

    fn uses_modern_depth(&self) -> Option<bool> {
        Some(self.host.using_modern_graphics_driver())
    }
}
