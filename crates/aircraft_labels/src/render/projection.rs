//! World-to-screen projection
//!
//! Replays the fixed-function OpenGL transform on the CPU: world space to eye
//! space through the world matrix, eye space to clip space through the
//! projection matrix, perspective divide, then viewport mapping.
//!
//! Screen coordinates have their origin at the lower-left corner of the
//! window, matching the host's 2-D drawing phase.

use crate::foundation::math::{Vec3, Vec4, transform_gl};
use crate::render::frame_state::FrameState;

/// Result of projecting one point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionResult {
    /// Horizontal pixel position
    pub screen_x: i32,
    /// Vertical pixel position
    pub screen_y: i32,
    /// Whether the point lies between the near and far planes
    ///
    /// When `false`, `screen_x`/`screen_y` carry no meaning.
    pub visible: bool,
}

impl ProjectionResult {
    /// Result for points that cannot be placed on screen at all
    pub const NOT_VISIBLE: Self = Self { screen_x: -1, screen_y: -1, visible: false };
}

/// Project a world-space point to screen pixels
///
/// `frame` must have been refreshed for the current frame.
pub fn project(point: &Vec3, frame: &FrameState) -> ProjectionResult {
    let pos = Vec4::new(point.x, point.y, point.z, 1.0);

    let eye = transform_gl(&frame.world_matrix, &pos);
    let clip = transform_gl(&frame.projection_matrix, &eye);

    // w == 0 lies on the camera plane
    if clip.w == 0.0 || !clip.w.is_finite() {
        return ProjectionResult::NOT_VISIBLE;
    }

    let inv_w = 1.0 / clip.w;
    let ndc = clip.xyz() * inv_w;
    if !(ndc.x.is_finite() && ndc.y.is_finite() && ndc.z.is_finite()) {
        return ProjectionResult::NOT_VISIBLE;
    }

    let screen_x = (frame.screen_width * ndc.x.mul_add(0.5, 0.5)).round() as i32;
    let screen_y = (frame.screen_height * ndc.y.mul_add(0.5, 0.5)).round() as i32;

    ProjectionResult {
        screen_x,
        screen_y,
        visible: frame.depth_convention.contains(ndc.z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Mat4Ext};
    use crate::render::frame_state::DepthConvention;

    const WIDTH: f32 = 1920.0;
    const HEIGHT: f32 = 1080.0;

    fn frame(projection: Mat4, depth_convention: DepthConvention) -> FrameState {
        FrameState {
            world_matrix: Mat4::identity(),
            projection_matrix: projection,
            screen_width: WIDTH,
            screen_height: HEIGHT,
            depth_convention,
            ..FrameState::default()
        }
    }

    fn gl_frame() -> FrameState {
        frame(
            Mat4::perspective_gl(60_f32.to_radians(), WIDTH / HEIGHT, 1.0, 100.0),
            DepthConvention::Legacy,
        )
    }

    #[test]
    fn test_point_ahead_lands_in_screen_center() {
        let result = project(&Vec3::new(0.0, 0.0, -10.0), &gl_frame());
        assert_eq!(result, ProjectionResult { screen_x: 960, screen_y: 540, visible: true });
    }

    #[test]
    fn test_points_inside_frustum_stay_on_screen() {
        let frame = gl_frame();
        let samples = [
            Vec3::new(3.0, 2.0, -10.0),
            Vec3::new(-5.0, -2.5, -12.0),
            Vec3::new(20.0, 10.0, -60.0),
            Vec3::new(-0.5, 0.4, -1.5),
        ];

        for point in samples {
            let result = project(&point, &frame);
            assert!(result.visible, "{point:?} should be visible");
            assert!((0..=WIDTH as i32).contains(&result.screen_x), "{point:?} -> {result:?}");
            assert!((0..=HEIGHT as i32).contains(&result.screen_y), "{point:?} -> {result:?}");
        }
    }

    #[test]
    fn test_right_and_up_map_to_larger_pixels() {
        let frame = gl_frame();
        let center = project(&Vec3::new(0.0, 0.0, -10.0), &frame);
        let right_up = project(&Vec3::new(2.0, 2.0, -10.0), &frame);

        assert!(right_up.screen_x > center.screen_x);
        assert!(right_up.screen_y > center.screen_y);
    }

    #[test]
    fn test_behind_camera_not_visible() {
        let result = project(&Vec3::new(0.0, 0.0, 10.0), &gl_frame());
        assert!(!result.visible);
    }

    #[test]
    fn test_beyond_far_plane_not_visible() {
        let result = project(&Vec3::new(0.0, 0.0, -150.0), &gl_frame());
        assert!(!result.visible);
    }

    #[test]
    fn test_depth_range_depends_on_backend() {
        // Just past the near plane the OpenGL projection yields ndc z ≈ -0.82
        let projection = Mat4::perspective_gl(1.0, 1.0, 1.0, 100.0);
        let point = Vec3::new(0.0, 0.0, -1.1);

        assert!(project(&point, &frame(projection, DepthConvention::Legacy)).visible);
        assert!(!project(&point, &frame(projection, DepthConvention::Modern)).visible);
    }

    #[test]
    fn test_zero_to_one_projection_with_modern_depth() {
        let projection = Mat4::perspective_zero_to_one(1.0, WIDTH / HEIGHT, 1.0, 100.0);
        let frame = frame(projection, DepthConvention::Modern);

        assert!(project(&Vec3::new(0.0, 0.0, -1.1), &frame).visible);
        assert!(project(&Vec3::new(1.0, 1.0, -50.0), &frame).visible);
        assert!(!project(&Vec3::new(0.0, 0.0, 5.0), &frame).visible);
    }

    #[test]
    fn test_zero_w_not_visible() {
        // A point on the camera plane has w' == 0
        let result = project(&Vec3::new(1.0, 1.0, 0.0), &gl_frame());
        assert_eq!(result, ProjectionResult::NOT_VISIBLE);
    }

    #[test]
    fn test_world_matrix_applied_before_projection() {
        let mut frame = gl_frame();
        frame.world_matrix = Mat4::look_at(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::zeros(),
            Vec3::new(0.0, 1.0, 0.0),
        );

        let result = project(&Vec3::zeros(), &frame);
        assert_eq!(result, ProjectionResult { screen_x: 960, screen_y: 540, visible: true });
    }
}
