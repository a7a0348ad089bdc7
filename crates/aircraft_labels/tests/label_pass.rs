//! Full label passes driven through the public API, the way a simulator
//! plugin would: data references for the view state, a draw-callback host,
//! and a recording text renderer.

use std::collections::{BTreeMap, HashMap};

use aircraft_labels::foundation::math::{mat4_to_gl, Mat4Ext};
use aircraft_labels::labels::SUB_LABEL_COLOR;
use aircraft_labels::prelude::*;
use aircraft_labels::render::frame_state::{data_ref_names, DataRef};

const WIDTH: i32 = 1280;
const HEIGHT: i32 = 720;

/// Minimal simulator exposing the view data references
struct Sim {
    names: HashMap<&'static str, DataRef>,
    world: Mat4,
    projection: Mat4,
    visibility_m: f32,
    zoom: f32,
    modern: bool,
}

impl Sim {
    fn new() -> Self {
        let names = [
            data_ref_names::WORLD_MATRIX,
            data_ref_names::PROJECTION_MATRIX,
            data_ref_names::WINDOW_WIDTH,
            data_ref_names::WINDOW_HEIGHT,
            data_ref_names::VISIBILITY,
            data_ref_names::FIELD_OF_VIEW,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, DataRef(i as u64)))
        .collect();

        Self {
            names,
            world: Mat4::look_at(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, 1.0, 0.0),
            ),
            projection: Mat4::perspective_gl(
                50_f32.to_radians(),
                WIDTH as f32 / HEIGHT as f32,
                1.0,
                50_000.0,
            ),
            visibility_m: 40_000.0,
            zoom: 1.0,
            modern: false,
        }
    }

    fn name_of(&self, data_ref: DataRef) -> &'static str {
        self.names
            .iter()
            .find_map(|(name, r)| (*r == data_ref).then_some(*name))
            .unwrap_or("")
    }
}

impl DataRefHost for Sim {
    fn find_data_ref(&self, name: &str) -> Option<DataRef> {
        self.names.get(name).copied()
    }

    fn get_f32(&self, data_ref: DataRef) -> f32 {
        match self.name_of(data_ref) {
            data_ref_names::VISIBILITY => self.visibility_m,
            data_ref_names::FIELD_OF_VIEW => 50.0,
            _ => 0.0,
        }
    }

    fn get_i32(&self, data_ref: DataRef) -> i32 {
        match self.name_of(data_ref) {
            data_ref_names::WINDOW_WIDTH => WIDTH,
            data_ref_names::WINDOW_HEIGHT => HEIGHT,
            _ => 0,
        }
    }

    fn get_f32_array(&self, data_ref: DataRef, out: &mut [f32]) -> usize {
        let matrix = match self.name_of(data_ref) {
            data_ref_names::WORLD_MATRIX => &self.world,
            data_ref_names::PROJECTION_MATRIX => &self.projection,
            _ => return 0,
        };
        let raw = mat4_to_gl(matrix);
        out[..16].copy_from_slice(&raw);
        16
    }

    fn camera_zoom(&self) -> Option<f32> {
        Some(self.zoom)
    }

    fn using_modern_graphics_driver(&self) -> bool {
        self.modern
    }
}

#[derive(Default)]
struct CallbackFlag {
    registered: bool,
}

impl DrawCallbackHost for CallbackFlag {
    fn register_label_callback(&mut self) -> Result<(), LabelError> {
        self.registered = true;
        Ok(())
    }

    fn unregister_label_callback(&mut self) -> Result<(), LabelError> {
        self.registered = false;
        Ok(())
    }
}

fn fleet() -> BTreeMap<AircraftId, Aircraft> {
    let heavy = ModelInfo::new("B744 Lufthansa", "B744", "H");
    let light = ModelInfo::new("C172 Generic", "C172", "L");

    [
        Aircraft::new(AircraftId(0x3C_4B26), "DLH400", Vec3::new(-200.0, 300.0, -3000.0))
            .with_model(heavy)
            .with_sub_label("B744 EDDF-KJFK")
            .with_camera_distance(3020.0),
        Aircraft::new(AircraftId(0xA1_2345), "N172SP", Vec3::new(150.0, 80.0, -1200.0))
            .with_model(light)
            .with_camera_distance(1212.0),
        Aircraft::new(AircraftId(0x40_0F0E), "BAW2490", Vec3::new(0.0, 500.0, -9000.0))
            .with_camera_distance(9014.0),
        Aircraft::new(AircraftId(0x4B_1805), "SWR8", Vec3::new(0.0, 0.0, 2000.0))
            .with_camera_distance(2000.0),
        Aircraft::new(AircraftId(0x44_0001), "GHOST", Vec3::new(0.0, 0.0, -800.0))
            .with_rendered(false)
            .with_camera_distance(800.0),
    ]
    .into_iter()
    .map(|ac| (ac.id, ac))
    .collect()
}

#[test]
fn full_pass_draws_only_eligible_aircraft() {
    let source = DataRefFrameSource::new(Sim::new());
    let mut controller = LabelController::new(CallbackFlag::default(), LabelConfig::default());
    controller.init().unwrap();
    assert!(controller.host().registered);

    let fleet = fleet();
    let mut backend = RecordingBackend::new();
    let stats = controller.draw_frame(&source, fleet.values(), &mut backend);

    assert_eq!(stats.considered, 5);
    assert_eq!(stats.drawn, 2, "{stats:?}");
    assert_eq!(stats.too_far, 1);
    assert_eq!(stats.off_screen, 1);
    assert_eq!(stats.not_rendered, 1);
    assert_eq!(stats.failed, 0);

    // Ordered by id: DLH400 (0x3C4B26) before N172SP (0xA12345)
    let texts: Vec<&str> = backend.texts().map(|t| t.3).collect();
    assert_eq!(texts, vec!["DLH400", "B744 EDDF-KJFK", "N172SP"]);
    assert_eq!(backend.quads().count(), 2);

    let gray = Rgba::from(SUB_LABEL_COLOR);
    let sub = backend.texts().find(|t| t.3 == "B744 EDDF-KJFK").unwrap();
    assert_eq!(*sub.2, gray);

    for (x, y, _, _) in backend.texts() {
        assert!((0..=WIDTH).contains(&x), "x {x}");
        assert!((-25..=HEIGHT).contains(&y), "y {y}");
    }

    let frame = controller.renderer().frame_state();
    assert_eq!(frame.screen_width, WIDTH as f32);
    assert_eq!(frame.field_of_view, 50.0);
}

#[test]
fn zooming_in_brings_far_aircraft_into_range() {
    let mut sim = Sim::new();
    sim.zoom = 2.0;
    let source = DataRefFrameSource::new(sim);

    let mut controller = LabelController::new(CallbackFlag::default(), LabelConfig::default());
    controller.init().unwrap();

    let fleet = fleet();
    let mut backend = RecordingBackend::new();
    let stats = controller.draw_frame(&source, fleet.values(), &mut backend);

    assert_eq!(stats.drawn, 3);
    assert!(backend.texts().any(|t| t.3 == "BAW2490"));
}

#[test]
fn low_visibility_cuts_labels_off() {
    let mut sim = Sim::new();
    sim.visibility_m = 1500.0;
    let source = DataRefFrameSource::new(sim);
    let fleet = fleet();

    let mut controller = LabelController::new(CallbackFlag::default(), LabelConfig::default());
    controller.init().unwrap();
    let mut backend = RecordingBackend::new();
    let stats = controller.draw_frame(&source, fleet.values(), &mut backend);
    assert_eq!(stats.drawn, 1);

    // Ignoring visibility restores the configured range
    controller.set_label_distance(3.0, false);
    backend.clear();
    let stats = controller.draw_frame(&source, fleet.values(), &mut backend);
    assert_eq!(stats.drawn, 2);
}

#[test]
fn disabled_labels_issue_no_draw_calls() {
    let source = DataRefFrameSource::new(Sim::new());
    let fleet = fleet();
    let mut controller = LabelController::new(CallbackFlag::default(), LabelConfig::default());
    controller.init().unwrap();

    controller.disable_labels().unwrap();
    assert!(!controller.host().registered);

    let mut backend = RecordingBackend::new();
    let stats = controller.draw_frame(&source, fleet.values(), &mut backend);
    assert_eq!(stats.considered, 0);
    assert!(backend.commands().is_empty());
}

#[test]
fn modern_driver_uses_zero_to_one_depth() {
    let mut sim = Sim::new();
    sim.modern = true;
    sim.projection = Mat4::perspective_zero_to_one(
        50_f32.to_radians(),
        WIDTH as f32 / HEIGHT as f32,
        1.0,
        50_000.0,
    );
    let source = DataRefFrameSource::new(sim);
    let fleet = fleet();

    let mut renderer = LabelRenderer::new();
    let mut backend = RecordingBackend::new();
    let stats = renderer.draw_all_labels(&source, fleet.values(), &LabelConfig::default(), &mut backend);

    assert_eq!(renderer.frame_state().depth_convention, DepthConvention::Modern);
    assert_eq!(stats.drawn, 2);
    assert_eq!(stats.off_screen, 1);
}
