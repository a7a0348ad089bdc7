//! Label overlay demo application
//!
//! Runs the label pass headless against a simulated host: a camera panning
//! across randomly scattered traffic. Every frame's draw calls are logged
//! instead of rendered.
//!
//! Usage: `label_demo [config.toml|config.ron] [frames]`

use std::collections::BTreeMap;
use std::f32::consts::TAU;

use aircraft_labels::config::{Config, ConfigError};
use aircraft_labels::foundation::logging::{self, LevelFilter};
use aircraft_labels::foundation::math::{mat4_to_gl, Mat4Ext};
use aircraft_labels::prelude::*;
use aircraft_labels::render::frame_state::{data_ref_names, DataRef};
use rand::Rng;
use thiserror::Error;

const SCREEN_WIDTH: i32 = 1920;
const SCREEN_HEIGHT: i32 = 1080;
const FIELD_OF_VIEW_DEG: f32 = 60.0;
const DEFAULT_CONFIG_PATH: &str = "label_demo.toml";
const DEFAULT_FRAMES: u32 = 8;
const FLEET_SIZE: usize = 24;

/// Demo application errors
#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Label error: {0}")]
    Label(#[from] LabelError),

    #[error("Invalid frame count '{0}'")]
    FrameCount(String),
}

/// Simulated flight-simulator host
///
/// Publishes the view data references a label pass reads every frame.
struct SimHost {
    eye: Vec3,
    heading: f32,
    zoom: f32,
    visibility_m: f32,
}

impl SimHost {
    const REFS: [&'static str; 6] = [
        data_ref_names::WORLD_MATRIX,
        data_ref_names::PROJECTION_MATRIX,
        data_ref_names::WINDOW_WIDTH,
        data_ref_names::WINDOW_HEIGHT,
        data_ref_names::VISIBILITY,
        data_ref_names::FIELD_OF_VIEW,
    ];

    fn new() -> Self {
        Self {
            eye: Vec3::new(0.0, 150.0, 0.0),
            heading: 0.0,
            zoom: 1.0,
            visibility_m: 9000.0,
        }
    }

    fn world_matrix(&self) -> Mat4 {
        let forward = Vec3::new(self.heading.sin(), 0.0, -self.heading.cos());
        Mat4::look_at(self.eye, self.eye + forward, Vec3::new(0.0, 1.0, 0.0))
    }

    fn projection_matrix() -> Mat4 {
        Mat4::perspective_gl(
            FIELD_OF_VIEW_DEG.to_radians(),
            SCREEN_WIDTH as f32 / SCREEN_HEIGHT as f32,
            1.0,
            100_000.0,
        )
    }

    fn name_of(data_ref: DataRef) -> Option<&'static str> {
        Self::REFS.get(usize::try_from(data_ref.0).ok()?).copied()
    }
}

impl DataRefHost for SimHost {
    fn find_data_ref(&self, name: &str) -> Option<DataRef> {
        Self::REFS
            .iter()
            .position(|r| *r == name)
            .map(|i| DataRef(i as u64))
    }

    fn get_f32(&self, data_ref: DataRef) -> f32 {
        match Self::name_of(data_ref) {
            Some(data_ref_names::VISIBILITY) => self.visibility_m,
            Some(data_ref_names::FIELD_OF_VIEW) => FIELD_OF_VIEW_DEG,
            _ => 0.0,
        }
    }

    fn get_i32(&self, data_ref: DataRef) -> i32 {
        match Self::name_of(data_ref) {
            Some(data_ref_names::WINDOW_WIDTH) => SCREEN_WIDTH,
            Some(data_ref_names::WINDOW_HEIGHT) => SCREEN_HEIGHT,
            _ => 0,
        }
    }

    fn get_f32_array(&self, data_ref: DataRef, out: &mut [f32]) -> usize {
        let matrix = match Self::name_of(data_ref) {
            Some(data_ref_names::WORLD_MATRIX) => self.world_matrix(),
            Some(data_ref_names::PROJECTION_MATRIX) => Self::projection_matrix(),
            _ => return 0,
        };
        let raw = mat4_to_gl(&matrix);
        let n = raw.len().min(out.len());
        out[..n].copy_from_slice(&raw[..n]);
        n
    }

    fn camera_zoom(&self) -> Option<f32> {
        Some(self.zoom)
    }

    fn using_modern_graphics_driver(&self) -> bool {
        false
    }
}

/// Callback registration as seen by the window drawing phase
#[derive(Default)]
struct WindowPhase {
    registered: bool,
}

impl DrawCallbackHost for WindowPhase {
    fn register_label_callback(&mut self) -> Result<(), LabelError> {
        log::info!("Label callback registered for the window drawing phase");
        self.registered = true;
        Ok(())
    }

    fn unregister_label_callback(&mut self) -> Result<(), LabelError> {
        log::info!("Label callback unregistered");
        self.registered = false;
        Ok(())
    }
}

struct DemoApp {
    source: DataRefFrameSource<SimHost>,
    controller: LabelController<WindowPhase>,
    fleet: BTreeMap<AircraftId, Aircraft>,
    backend: RecordingBackend,
}

impl DemoApp {
    fn new(config: LabelConfig) -> Result<Self, DemoError> {
        log::info!("Creating label demo application...");
        let mut controller = LabelController::new(WindowPhase::default(), config);
        controller.init()?;

        let source = DataRefFrameSource::new(SimHost::new());
        let fleet = Self::spawn_fleet(FLEET_SIZE, source.host().eye);
        log::info!("Spawned {} aircraft", fleet.len());

        Ok(Self {
            source,
            controller,
            fleet,
            backend: RecordingBackend::new(),
        })
    }

    fn spawn_fleet(count: usize, eye: Vec3) -> BTreeMap<AircraftId, Aircraft> {
        const AIRLINES: [&str; 6] = ["DLH", "BAW", "AFR", "KLM", "SWR", "UAL"];
        const TYPES: [(&str, &str); 5] = [
            ("C172", "L"),
            ("A320", "M"),
            ("B738", "M"),
            ("B744", "H"),
            ("A388", "J"),
        ];

        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| {
                let id = AircraftId(rng.gen_range(0x10_0000..0xFF_FFFF));
                let bearing = rng.gen_range(0.0..TAU);
                let range = rng.gen_range(500.0..14_000.0_f32);
                let altitude = rng.gen_range(50.0..1500.0_f32);
                let position = Vec3::new(range * bearing.sin(), altitude, -range * bearing.cos());

                let (icao_type, wtc) = TYPES[rng.gen_range(0..TYPES.len())];
                let callsign = format!(
                    "{}{}",
                    AIRLINES[rng.gen_range(0..AIRLINES.len())],
                    rng.gen_range(1..9999)
                );
                let model = ModelInfo::new(format!("{icao_type} Generic"), icao_type, wtc);

                let mut aircraft = Aircraft::new(id, callsign, position)
                    .with_model(model)
                    .with_camera_distance((position - eye).norm())
                    .with_rendered(rng.gen_bool(0.9))
                    .with_draw_label(rng.gen_bool(0.8));
                if rng.gen_bool(0.5) {
                    aircraft = aircraft.with_sub_label(icao_type);
                }
                (id, aircraft)
            })
            .collect()
    }

    fn run(&mut self, frames: u32) {
        for frame in 0..frames {
            // Pan the camera a little each frame and zoom in halfway through
            let host = self.source.host_mut();
            host.heading = frame as f32 * TAU / frames.max(1) as f32;
            host.zoom = if frame >= frames / 2 { 2.0 } else { 1.0 };

            self.backend.clear();
            let stats = self.controller.draw_frame(&self.source, self.fleet.values(), &mut self.backend);

            log::info!(
                "Frame {}: {} labels drawn ({} too far, {} off screen, {} suppressed)",
                frame,
                stats.drawn,
                stats.too_far,
                stats.off_screen,
                stats.suppressed
            );
            for command in self.backend.commands() {
                log::debug!("  {:?}", command);
            }
        }
    }

    fn shutdown(&mut self) -> Result<(), DemoError> {
        self.controller.cleanup()?;
        log::info!(
            "Labels enabled at shutdown: {}, callback registered: {}",
            self.controller.labels_enabled(),
            self.controller.host().registered
        );
        Ok(())
    }
}

fn run_demo() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let frames = match args.next() {
        Some(arg) => arg.parse().map_err(|_| DemoError::FrameCount(arg))?,
        None => DEFAULT_FRAMES,
    };

    let config = LabelConfig::load_or_default(&config_path)?;
    config.validate()?;
    log::info!("Label config: {:?}", config);

    let mut app = DemoApp::new(config)?;
    app.run(frames);
    app.shutdown()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(LevelFilter::Info);

    log::info!("Starting aircraft label demo");

    // Wrap in catch_unwind to handle panics gracefully
    let result = std::panic::catch_unwind(run_demo);

    match result {
        Ok(Ok(())) => {
            log::info!("Label demo finished successfully");
            Ok(())
        }
        Ok(Err(e)) => {
            log::error!("Application error: {}", e);
            Err(e.into())
        }
        Err(panic) => {
            log::error!("Application panicked: {:?}", panic);
            Err("Application panicked during execution".into())
        }
    }
}
