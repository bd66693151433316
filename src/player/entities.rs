use bevy::gltf::Gltf;
use bevy::prelude::*;

/// Root of the player avatar; its translation tracks the player position.
#[derive(Component, Reflect)]
pub struct PlayerAnchor;

/// Avatar asset whose load outcome is reported once.
#[derive(Component)]
pub struct AvatarScene {
    /// The glTF file the scene comes from.
    pub gltf: Handle<Gltf>,
    /// Set once the load outcome has been logged.
    pub reported: bool,
}
