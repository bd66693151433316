use bevy::picking::mesh_picking::ray_cast::MeshRayCast;
use bevy::prelude::*;

use crate::camera::CameraConfig;
use crate::frame::FrameLoop;
use crate::grid::{HexGrid, TileClicked};

/// Re-picks hover when the pointer moved this frame.
pub fn update_hover(
    mut frame_loop: ResMut<FrameLoop>,
    mut grid: ResMut<HexGrid>,
    cfg: Res<CameraConfig>,
    mut ray_cast: MeshRayCast,
) {
    let Some(sample) = frame_loop.controls_mut().take_hover_request() else {
        return;
    };
    let Some(state) = frame_loop.latest() else {
        return;
    };
    let hits = super::pick(sample, &state.camera, cfg.fov_y(), &mut ray_cast);
    let previous = grid.hovered().map(|t| t.hex());
    let hovered = super::apply_hover(&mut grid, &hits);
    if hovered != previous {
        debug!("hover {:?} -> {:?}", previous, hovered);
    }
}

/// Resolves a pending click to the nearest tile under the pointer.
pub fn route_clicks(
    mut frame_loop: ResMut<FrameLoop>,
    grid: Res<HexGrid>,
    cfg: Res<CameraConfig>,
    mut ray_cast: MeshRayCast,
    mut clicked: MessageWriter<TileClicked>,
) {
    let Some(sample) = frame_loop.controls_mut().take_click_request() else {
        return;
    };
    let Some(state) = frame_loop.latest() else {
        return;
    };
    let hits = super::pick(sample, &state.camera, cfg.fov_y(), &mut ray_cast);
    if let Some(hex) = hits.first().and_then(|hit| grid.on_click(hit.id)) {
        clicked.write(TileClicked { hex });
    }
}
