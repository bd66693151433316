use bevy::prelude::*;

/// Marker component for the orbiting viewer camera.
#[derive(Component, Reflect)]
pub struct ViewerCamera;
