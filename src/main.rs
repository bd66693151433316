use bevy::app::AppExit;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use hex_orbit::{GameState, ViewerConfig, ViewerPlugin};

#[cfg(feature = "native")]
mod cli {
    use clap::{Parser, ValueEnum};
    use hex_orbit::ViewerConfig;
    use hex_orbit::grid::TileLayout;

    #[derive(ValueEnum, Clone, Copy, Debug)]
    pub enum LayoutArg {
        Example,
        Hexagon,
        Island,
    }

    /// Interactive hex-tile viewer
    #[derive(Parser, Clone, Debug)]
    #[command(name = "hex-orbit")]
    pub struct Cli {
        /// Tile layout
        #[arg(long, value_enum, default_value = "example")]
        pub layout: LayoutArg,

        /// Ring count for the hexagon and island layouts
        #[arg(long, default_value = "6")]
        pub radius: u32,

        /// Noise seed for the island layout
        #[arg(long, default_value = "7")]
        pub seed: u32,

        /// glTF avatar under assets/
        #[arg(long)]
        pub avatar: Option<String>,

        /// Pixels of travel after which a press no longer clicks
        #[arg(long)]
        pub drag_threshold: Option<f32>,

        /// Player speed in units per second
        #[arg(long)]
        pub speed: Option<f32>,
    }

    impl Cli {
        pub fn apply(self, cfg: &mut ViewerConfig) {
            cfg.grid.layout = match self.layout {
                LayoutArg::Example => TileLayout::Example,
                LayoutArg::Hexagon => TileLayout::Hexagon {
                    radius: self.radius,
                },
                LayoutArg::Island => TileLayout::Island {
                    radius: self.radius,
                    seed: self.seed,
                    threshold: -0.1,
                    scale: 4.0,
                },
            };
            if let Some(avatar) = self.avatar {
                cfg.player.avatar_path = avatar;
            }
            if let Some(px) = self.drag_threshold {
                cfg.controls.drag_threshold = Some(px);
            }
            if let Some(speed) = self.speed {
                cfg.player.speed = speed;
            }
        }
    }
}

fn main() {
    #[allow(unused_mut)]
    let mut cfg = ViewerConfig::default();
    #[cfg(feature = "native")]
    {
        use clap::Parser;
        cli::Cli::parse().apply(&mut cfg);
    }

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex Orbit".into(),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(ViewerPlugin(cfg))
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_debug)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Debugging)));

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.run();
}

fn toggle_debug(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let new_state = match state.get() {
            GameState::Running => GameState::Debugging,
            GameState::Debugging => GameState::Running,
        };
        info!("state -> {new_state:?}");
        next.set(new_state);
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
