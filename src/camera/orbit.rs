use bevy::prelude::*;

use crate::math;

/// Limits and sensitivities of an [`OrbitCamera`].
#[derive(Clone, Debug, Reflect)]
pub struct OrbitSettings {
    /// Closest allowed distance to the look-at point.
    pub min_radius: f32,
    /// Farthest allowed distance to the look-at point.
    pub max_radius: f32,
    /// Radians of orbit per pixel of horizontal drag.
    pub rotate_sensitivity: f32,
    /// World units of pan per pixel of drag.
    pub pan_sensitivity: f32,
    /// Radius change per unit of zoom input.
    pub zoom_sensitivity: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            min_radius: 2.0,
            max_radius: 40.0,
            rotate_sensitivity: 0.01,
            pan_sensitivity: 0.02,
            zoom_sensitivity: 1.0,
        }
    }
}

/// Concrete camera placement derived from an [`OrbitCamera`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// World-space eye position.
    pub position: Vec3,
    /// Orientation looking at `look_at` with +Y up.
    pub rotation: Quat,
    /// The orbit center.
    pub look_at: Vec3,
}

impl CameraPose {
    /// Pose as a Bevy transform.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.rotation)
    }
}

/// Camera parametrized as a point on a sphere around a look-at target.
///
/// Pan, rotate and zoom each touch one independent scalar (or the center),
/// so they never interfere. The world is Y-up; the orbit runs in the XZ plane.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    angle: f32,
    height: f32,
    radius: f32,
    look_at: Vec3,
    settings: OrbitSettings,
}

impl OrbitCamera {
    /// Creates a camera; `angle` is wrapped and `radius` clamped.
    ///
    /// Radius limits are normalized first: the minimum is kept positive and
    /// the maximum is raised to at least the minimum.
    pub fn new(mut settings: OrbitSettings, look_at: Vec3, angle: f32, height: f32, radius: f32) -> Self {
        settings.min_radius = settings.min_radius.max(f32::EPSILON);
        settings.max_radius = settings.max_radius.max(settings.min_radius);
        let radius = radius.clamp(settings.min_radius, settings.max_radius);
        Self {
            angle: math::wrap_angle(angle),
            height,
            radius,
            look_at,
            settings,
        }
    }

    /// Orbit angle in `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Elevation of the eye per unit of radius.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Distance scale from the look-at point, within the configured limits.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Orbit center.
    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Limits and sensitivities.
    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    // ── Drag input ─────────────────────────────────────────────────

    /// Pans the look-at point in the ground plane from a screen-space drag delta.
    ///
    /// Dragging right slides the scene right; dragging down pulls it toward the viewer.
    pub fn update_position(&mut self, delta: Vec2) {
        let (sin, cos) = self.angle.sin_cos();
        let right = Vec3::new(sin, 0.0, -cos);
        let forward = Vec3::new(-cos, 0.0, -sin);
        let k = self.settings.pan_sensitivity;
        self.look_at += (-right * delta.x + forward * delta.y) * k;
    }

    /// Orbits horizontally from a screen-space drag delta.
    pub fn update_rotation(&mut self, delta: Vec2) {
        self.rotate_by(delta.x * self.settings.rotate_sensitivity);
    }

    /// Moves closer (negative) or farther (positive); only the radius changes.
    pub fn update_zoom(&mut self, delta: f32) {
        let radius = self.radius + delta * self.settings.zoom_sensitivity;
        self.radius = radius.clamp(self.settings.min_radius, self.settings.max_radius);
    }

    /// Discrete orbit step, wrapped into `[0, 2π)`.
    pub fn rotate_by(&mut self, delta_angle: f32) {
        self.angle = math::wrap_angle(self.angle + delta_angle);
    }

    // ── Pose ───────────────────────────────────────────────────────

    /// Eye position and orientation for the current state.
    pub fn derive_pose(&self) -> CameraPose {
        let (sin, cos) = self.angle.sin_cos();
        let position = self.look_at + Vec3::new(cos, self.height, sin) * self.radius;
        let rotation = Transform::from_translation(position)
            .looking_at(self.look_at, Vec3::Y)
            .rotation;
        CameraPose {
            position,
            rotation,
            look_at: self.look_at,
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(OrbitSettings::default(), Vec3::ZERO, 0.0, 1.0, 10.0)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{PI, TAU};

    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::default()
    }

    fn angle_distance(a: f32, b: f32) -> f32 {
        let d = math::wrap_angle(a - b);
        d.min(TAU - d)
    }

    // ── rotation ────────────────────────────────────────────────────

    #[test]
    fn rotate_round_trip_restores_angle() {
        for start in [0.0, 0.3, PI, 6.0] {
            for theta in [-7.0, -PI, -0.01, 0.0, 0.5, 3.0, 12.5] {
                let mut cam = OrbitCamera::new(OrbitSettings::default(), Vec3::ZERO, start, 1.0, 10.0);
                let before = cam.angle();
                cam.rotate_by(theta);
                cam.rotate_by(-theta);
                assert!(
                    angle_distance(cam.angle(), before) < 1e-4,
                    "start {start}, theta {theta}: {} vs {before}",
                    cam.angle()
                );
            }
        }
    }

    #[test]
    fn angle_stays_in_range() {
        let mut cam = camera();
        for step in [-0.05, -3.0, 1.0, 10.0, -100.0, 0.0001] {
            cam.rotate_by(step);
            assert!((0.0..TAU).contains(&cam.angle()), "angle {}", cam.angle());
        }
    }

    #[test]
    fn drag_rotation_is_linear_in_pixels() {
        let mut cam = camera();
        cam.update_rotation(Vec2::new(50.0, 999.0));
        assert!((cam.angle() - 0.5).abs() < 1e-6);
        assert_eq!(cam.height(), 1.0);
    }

    // ── zoom ────────────────────────────────────────────────────────

    #[test]
    fn zoom_stays_clamped() {
        let mut cam = camera();
        for delta in [-100.0, 3.0, 500.0, -1.0, -2.5, 0.25, -1e6, 1e6] {
            cam.update_zoom(delta);
            let s = cam.settings();
            assert!(cam.radius() >= s.min_radius && cam.radius() <= s.max_radius);
        }
    }

    #[test]
    fn zoom_only_touches_radius() {
        let mut cam = camera();
        let before = (cam.angle(), cam.height(), cam.look_at());
        cam.update_zoom(2.0);
        assert_eq!(cam.radius(), 12.0);
        assert_eq!(before, (cam.angle(), cam.height(), cam.look_at()));
    }

    #[test]
    fn new_clamps_radius() {
        let cam = OrbitCamera::new(OrbitSettings::default(), Vec3::ZERO, 0.0, 1.0, 0.0);
        assert_eq!(cam.radius(), OrbitSettings::default().min_radius);
    }

    #[test]
    fn inverted_limits_are_normalized() {
        let settings = OrbitSettings {
            min_radius: 5.0,
            max_radius: 1.0,
            ..default()
        };
        let mut cam = OrbitCamera::new(settings, Vec3::ZERO, 0.0, 1.0, 3.0);
        assert_eq!(cam.radius(), 5.0);
        cam.update_zoom(-10.0);
        assert_eq!(cam.radius(), 5.0);
        cam.update_zoom(10.0);
        assert_eq!(cam.radius(), 5.0);
    }

    #[test]
    fn radius_stays_positive_with_non_positive_minimum() {
        let settings = OrbitSettings {
            min_radius: -3.0,
            max_radius: 10.0,
            ..default()
        };
        let mut cam = OrbitCamera::new(settings, Vec3::ZERO, 0.0, 1.0, 0.0);
        assert!(cam.radius() > 0.0);
        cam.update_zoom(-100.0);
        assert!(cam.radius() > 0.0);
        assert!(cam.settings().min_radius > 0.0);
    }

    // ── pan ─────────────────────────────────────────────────────────

    #[test]
    fn pan_moves_only_look_at_in_ground_plane() {
        let mut cam = camera();
        cam.update_position(Vec2::new(10.0, -20.0));
        assert_eq!(cam.look_at().y, 0.0);
        assert_ne!(cam.look_at(), Vec3::ZERO);
        assert_eq!(cam.radius(), 10.0);
        assert_eq!(cam.angle(), 0.0);
    }

    #[test]
    fn pan_is_relative_to_heading() {
        // Facing -X from +X: dragging down pulls the center toward -X
        let mut cam = camera();
        cam.update_position(Vec2::new(0.0, 50.0));
        assert!(cam.look_at().x < 0.0);
        assert!(cam.look_at().z.abs() < 1e-5);
    }

    // ── pose ────────────────────────────────────────────────────────

    #[test]
    fn pose_sits_on_orbit() {
        let cam = OrbitCamera::new(OrbitSettings::default(), Vec3::new(1.0, 0.0, 2.0), PI / 2.0, 0.5, 8.0);
        let pose = cam.derive_pose();
        let expected = Vec3::new(1.0, 4.0, 10.0);
        assert!((pose.position - expected).length() < 1e-4, "{:?}", pose.position);
    }

    #[test]
    fn pose_looks_at_target() {
        let cam = OrbitCamera::new(OrbitSettings::default(), Vec3::new(3.0, 0.0, -1.0), 1.2, 0.8, 6.0);
        let pose = cam.derive_pose();
        let to_target = (pose.look_at - pose.position).normalize();
        assert!((pose.rotation * Vec3::NEG_Z - to_target).length() < 1e-4);
    }

    #[test]
    fn derive_pose_is_idempotent() {
        let mut cam = camera();
        cam.rotate_by(0.7);
        cam.update_zoom(-3.0);
        assert_eq!(cam.derive_pose(), cam.derive_pose());
    }
}
