//! Player avatar: velocity-intent motion on the ground plane and the glTF
//! scene that follows it.

mod entities;
mod motion;
mod systems;

pub use entities::{AvatarScene, PlayerAnchor};
pub use motion::{MotionAxis, PlayerMotion};

use bevy::prelude::*;

use crate::ViewerSet;

/// Player speed and avatar asset.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct PlayerConfig {
    /// Ground units per second at full intent.
    pub speed: f32,
    /// glTF file under `assets/`; scene 0 is spawned.
    pub avatar_path: String,
    /// Uniform scale applied to the avatar scene.
    pub avatar_scale: f32,
    /// World Y of the avatar anchor.
    pub elevation: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            avatar_path: "avocado/Avocado.gltf".into(),
            avatar_scale: 10.0,
            elevation: 0.05,
        }
    }
}

impl PlayerConfig {
    /// Player at the origin, at rest.
    pub fn build_motion(&self) -> PlayerMotion {
        PlayerMotion::new(Vec2::ZERO, self.speed)
    }
}

/// Ground-plane position to world translation: x → X, y → -Z.
pub fn player_translation(position: Vec2, elevation: f32) -> Vec3 {
    Vec3::new(position.x, elevation, -position.y)
}

/// Spawns the avatar and moves it with the frame state.
pub struct PlayerPlugin(pub PlayerConfig);

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerConfig>()
            .register_type::<PlayerAnchor>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, systems::spawn_avatar)
            .add_systems(
                Update,
                (systems::report_avatar_load, systems::follow_player)
                    .in_set(ViewerSet::Present),
            );
    }
}
