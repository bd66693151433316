use bevy::prelude::*;

use super::CameraConfig;
use super::entities::ViewerCamera;
use crate::frame::FrameLoop;

/// Spawns the perspective camera at the configured orbit pose.
pub fn spawn_camera(mut commands: Commands, cfg: Res<CameraConfig>) {
    let pose = cfg.build_orbit().derive_pose();
    commands.spawn((
        Name::new("ViewerCamera"),
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: cfg.fov_y(),
            near: cfg.near,
            far: cfg.far,
            ..default()
        }),
        pose.transform(),
        ViewerCamera,
    ));
}

/// Copies the pose derived this frame onto the camera transform.
pub fn apply_camera_pose(
    frame_loop: Res<FrameLoop>,
    mut query: Query<&mut Transform, With<ViewerCamera>>,
) {
    let Some(state) = frame_loop.latest() else {
        return;
    };
    let Ok(mut transform) = query.single_mut() else {
        return;
    };
    *transform = state.camera.transform();
}
