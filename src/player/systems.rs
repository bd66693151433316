use bevy::asset::LoadState;
use bevy::prelude::*;

use super::entities::{AvatarScene, PlayerAnchor};
use super::{PlayerConfig, player_translation};
use crate::frame::FrameLoop;

/// Spawns the anchor at the origin with the avatar scene as its child.
pub fn spawn_avatar(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    cfg: Res<PlayerConfig>,
) {
    let path = cfg.avatar_path.clone();
    let gltf = asset_server.load(path.clone());
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(path));

    commands
        .spawn((
            Name::new("Player"),
            PlayerAnchor,
            Transform::from_translation(player_translation(Vec2::ZERO, cfg.elevation)),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Name::new("Avatar"),
                SceneRoot(scene),
                AvatarScene {
                    gltf,
                    reported: false,
                },
                Transform::from_scale(Vec3::splat(cfg.avatar_scale)),
            ));
        });
}

/// Logs the avatar load outcome once. A failed avatar leaves the anchor empty.
pub fn report_avatar_load(
    asset_server: Res<AssetServer>,
    cfg: Res<PlayerConfig>,
    mut query: Query<&mut AvatarScene>,
) {
    for mut avatar in &mut query {
        if avatar.reported {
            continue;
        }
        match asset_server.load_state(&avatar.gltf) {
            LoadState::Loaded => {
                info!("avatar loaded from {}", cfg.avatar_path);
                avatar.reported = true;
            }
            LoadState::Failed(err) => {
                warn!("avatar {} failed to load: {err}", cfg.avatar_path);
                avatar.reported = true;
            }
            LoadState::NotLoaded | LoadState::Loading => {}
        }
    }
}

/// Moves the anchor to the player position of the latest frame.
pub fn follow_player(
    frame_loop: Res<FrameLoop>,
    cfg: Res<PlayerConfig>,
    mut query: Query<&mut Transform, With<PlayerAnchor>>,
) {
    let Some(state) = frame_loop.latest() else {
        return;
    };
    let Ok(mut transform) = query.single_mut() else {
        return;
    };
    transform.translation = player_translation(state.player, cfg.elevation);
}
