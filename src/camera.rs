//! Orbit camera: spherical pose model plus the Bevy camera entity it drives.

mod entities;
mod orbit;
mod systems;

pub use entities::ViewerCamera;
pub use orbit::{CameraPose, OrbitCamera, OrbitSettings};

use bevy::prelude::*;

use crate::ViewerSet;

/// Projection and initial orbit of the viewer camera.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Radius limits and drag sensitivities.
    pub orbit: OrbitSettings,
    /// Initial orbit angle in radians.
    pub angle: f32,
    /// Initial eye elevation per unit of radius.
    pub height: f32,
    /// Initial distance from the look-at point.
    pub radius: f32,
    /// Initial orbit center.
    pub look_at: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            orbit: OrbitSettings::default(),
            angle: std::f32::consts::FRAC_PI_2,
            height: 0.9,
            radius: 10.0,
            look_at: Vec3::ZERO,
        }
    }
}

impl CameraConfig {
    /// Orbit camera at the configured initial pose.
    pub fn build_orbit(&self) -> OrbitCamera {
        OrbitCamera::new(
            self.orbit.clone(),
            self.look_at,
            self.angle,
            self.height,
            self.radius,
        )
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

/// Spawns the viewer camera and keeps it on the derived orbit pose.
pub struct CameraPlugin(pub CameraConfig);

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CameraConfig>()
            .register_type::<ViewerCamera>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, systems::spawn_camera)
            .add_systems(
                Update,
                systems::apply_camera_pose.in_set(ViewerSet::Present),
            );
    }
}
