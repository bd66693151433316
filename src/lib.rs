#![warn(missing_docs)]
//! Interactive hex-tile viewer.
//!
//! A grid of hexagonal tiles on the ground plane can be hovered and clicked
//! through mesh picking. An orbit camera follows mouse drags, the wheel and
//! the arrow keys, and WASD drives a glTF avatar. Everything interactive is
//! owned by one [`frame::FrameLoop`] resource, ticked once per frame between
//! input collection and presentation (see [`ViewerSet`]).

pub mod camera;
pub mod controls;
pub mod debug;
pub mod frame;
pub mod grid;
pub mod input;
pub mod math;
pub mod picking;
pub mod player;
pub mod sim;

use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;

/// Application-wide state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Normal interaction.
    #[default]
    Running,
    /// Debug overlay and world inspector shown (Tab to toggle).
    Debugging,
}

/// Per-frame stages, chained in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerSet {
    /// Window input is drained into the router.
    Input,
    /// The frame loop ticks.
    Tick,
    /// Hover and click picks run against the new camera pose.
    Pick,
    /// Transforms and materials are updated for rendering.
    Present,
}

/// Every tunable of the viewer.
#[derive(Clone, Debug, Default)]
pub struct ViewerConfig {
    /// Tile layout and appearance.
    pub grid: grid::GridConfig,
    /// Projection and initial orbit.
    pub camera: camera::CameraConfig,
    /// Key and mouse mapping.
    pub controls: controls::ControlsConfig,
    /// Player speed and avatar.
    pub player: player::PlayerConfig,
    /// Falling body parameters.
    pub sim: sim::SimConfig,
}

/// Installs the whole viewer on top of `DefaultPlugins`.
pub struct ViewerPlugin(pub ViewerConfig);

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        let cfg = &self.0;
        app.register_type::<GameState>()
            .init_state::<GameState>()
            .insert_resource(ClearColor(Color::WHITE))
            .configure_sets(
                Update,
                (
                    ViewerSet::Input,
                    ViewerSet::Tick,
                    ViewerSet::Pick,
                    ViewerSet::Present,
                )
                    .chain(),
            )
            .add_plugins(grid::GridPlugin(cfg.grid.clone()))
            .add_plugins(camera::CameraPlugin(cfg.camera.clone()))
            .add_plugins(player::PlayerPlugin(cfg.player.clone()))
            .add_plugins(sim::SimPlugin(cfg.sim.clone()))
            // Reads the camera and player configs inserted above
            .add_plugins(frame::FramePlugin(cfg.controls.clone()))
            .add_plugins(input::InputPlugin)
            .add_plugins(picking::PickingPlugin)
            .add_plugins(debug::DebugPlugin)
            .add_systems(Startup, spawn_lights);
    }
}

fn spawn_lights(mut commands: Commands) {
    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });
    commands.spawn((
        Name::new("PointLight"),
        PointLight {
            intensity: 2_000_000.0,
            range: 100.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 12.0, 6.0),
    ));
}
