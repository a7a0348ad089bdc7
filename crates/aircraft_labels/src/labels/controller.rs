//! Label lifecycle: enabling, disabling and the host drawing callback
//!
//! The host calls the label pass from a drawing callback once per frame
//! while labels are enabled. [`LabelController`] keeps the configuration and
//! the callback registration in step.

use crate::core::config::{LabelConfig, LabelOverride};
use crate::labels::aircraft::Aircraft;
use crate::labels::{LabelError, LabelPassStats, LabelRenderer};
use crate::render::backend::LabelRenderBackend;
use crate::render::frame_state::FrameSource;

/// Host side of the per-frame drawing callback
pub trait DrawCallbackHost {
    /// Start invoking the label pass every frame
    fn register_label_callback(&mut self) -> Result<(), LabelError>;

    /// Stop invoking the label pass
    fn unregister_label_callback(&mut self) -> Result<(), LabelError>;
}

/// Owns label configuration and drawing state for one host
pub struct LabelController<H: DrawCallbackHost> {
    host: H,
    config: LabelConfig,
    renderer: LabelRenderer,
    registered: bool,
}

impl<H: DrawCallbackHost> LabelController<H> {
    /// Create a controller; call [`init`](Self::init) before the first frame
    pub fn new(host: H, config: LabelConfig) -> Self {
        Self {
            host,
            config,
            renderer: LabelRenderer::new(),
            registered: false,
        }
    }

    /// Register the drawing callback if labels are enabled
    pub fn init(&mut self) -> Result<(), LabelError> {
        self.config.validate()?;
        self.config.draw_labels = self.apply_override(self.config.draw_labels);
        if self.config.draw_labels {
            self.activate()?;
        }
        Ok(())
    }

    /// Remove the drawing callback
    pub fn cleanup(&mut self) -> Result<(), LabelError> {
        self.deactivate()
    }

    /// Enable or disable label drawing
    ///
    /// A configured override wins over the requested state.
    pub fn enable_labels(&mut self, enable: bool) -> Result<(), LabelError> {
        let enable = self.apply_override(enable);

        // Only act on actual changes
        if self.config.draw_labels == enable {
            return Ok(());
        }

        log::debug!("Aircraft labels {}", if enable { "enabled" } else { "disabled" });
        self.config.draw_labels = enable;

        if enable {
            self.activate()
        } else {
            self.deactivate()
        }
    }

    /// Disable label drawing
    pub fn disable_labels(&mut self) -> Result<(), LabelError> {
        self.enable_labels(false)
    }

    /// Whether labels are currently drawn
    pub const fn labels_enabled(&self) -> bool {
        self.config.draw_labels
    }

    /// Configure maximum label distance and the visibility cut-off
    pub fn set_label_distance(&mut self, dist_nm: f32, cut_off_at_visibility: bool) {
        self.config.set_label_distance(dist_nm, cut_off_at_visibility);
    }

    /// Whether the drawing callback is currently registered
    pub const fn is_registered(&self) -> bool {
        self.registered
    }

    /// Current configuration
    pub const fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// The wrapped host
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Label renderer, holding the frame state of the last pass
    pub const fn renderer(&self) -> &LabelRenderer {
        &self.renderer
    }

    /// Body of the per-frame drawing callback
    pub fn draw_frame<'a, I>(
        &mut self,
        source: &dyn FrameSource,
        aircraft: I,
        backend: &mut dyn LabelRenderBackend,
    ) -> LabelPassStats
    where
        I: IntoIterator<Item = &'a Aircraft>,
    {
        self.renderer.draw_all_labels(source, aircraft, &self.config, backend)
    }

    fn apply_override(&self, requested: bool) -> bool {
        match self.config.label_override {
            LabelOverride::ForceOn => {
                log::debug!("Label drawing enforced ON by configuration");
                true
            }
            LabelOverride::ForceOff => {
                log::debug!("Label drawing enforced OFF by configuration");
                false
            }
            LabelOverride::Auto => requested,
        }
    }

    fn activate(&mut self) -> Result<(), LabelError> {
        if !self.registered {
            self.host.register_label_callback()?;
            self.registered = true;
        }
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), LabelError> {
        if self.registered {
            self.host.unregister_label_callback()?;
            self.registered = false;
        }
        Ok(())
    }
}
