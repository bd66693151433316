//! On-screen debug text, painted with egui while in [`GameState::Debugging`].

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::egui;
use hexx::Hex;

use crate::GameState;
use crate::camera::CameraConfig;
use crate::frame::{FrameLoop, FrameState};
use crate::grid::SelectedTile;

const HELP: [&str; 5] = [
    "WASD: move player",
    "Arrow left/right: orbit",
    "Left drag: pan, right drag: orbit, wheel: zoom",
    "Click: select tile",
    "Tab: toggle debug, Esc: quit",
];

/// Text lines for the overlay: control help followed by camera details.
pub fn debug_lines(
    state: &FrameState,
    angle: f32,
    cfg: &CameraConfig,
    aspect: f32,
    selected: Option<Hex>,
) -> Vec<String> {
    let pos = state.camera.position;
    let (yaw, pitch, roll) = state.camera.rotation.to_euler(EulerRot::YXZ);
    let mut lines: Vec<String> = HELP.iter().map(|s| s.to_string()).collect();
    lines.push(String::new());
    lines.push(format!("fov: {:.1}", cfg.fov_degrees));
    lines.push(format!("aspect: {aspect:.3}"));
    lines.push(format!("near: {}, far: {}", cfg.near, cfg.far));
    lines.push(format!("position: ({:.2}, {:.2}, {:.2})", pos.x, pos.y, pos.z));
    lines.push(format!(
        "rotation: ({:.2}, {:.2}, {:.2})",
        yaw.to_degrees(),
        pitch.to_degrees(),
        roll.to_degrees()
    ));
    lines.push(format!("orbit angle: {:.1}", angle.to_degrees()));
    lines.push(format!("player: ({:.2}, {:.2})", state.player.x, state.player.y));
    lines.push(match selected {
        Some(hex) => format!("selected: ({}, {})", hex.x, hex.y),
        None => "selected: none".to_string(),
    });
    lines.push(format!("frame: {}", state.frame));
    lines
}

/// Paints the debug text in the top-left corner.
pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            draw_debug_text.run_if(in_state(GameState::Debugging)),
        );
    }
}

fn draw_debug_text(
    mut egui_ctx: Query<&mut bevy_egui::EguiContext>,
    frame_loop: Res<FrameLoop>,
    cfg: Res<CameraConfig>,
    selected: Res<SelectedTile>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut ready: Local<bool>,
) {
    if !*ready {
        *ready = true;
        return;
    }
    let Some(state) = frame_loop.latest() else {
        return;
    };
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let aspect = windows
        .single()
        .map_or(1.0, |w| w.width() / w.height().max(1.0));
    let angle = frame_loop.controls().camera.angle();

    let painter = ctx.get_mut().layer_painter(egui::LayerId::background());
    for (i, line) in debug_lines(&state, angle, &cfg, aspect, selected.0).iter().enumerate() {
        painter.text(
            egui::pos2(12.0, 12.0 + i as f32 * 16.0),
            egui::Align2::LEFT_TOP,
            line,
            egui::FontId::monospace(13.0),
            egui::Color32::BLACK,
        );
    }
}
