//! Screen-space picking: pointer → NDC → world ray → ordered scene hits.
//!
//! The ray cast itself is delegated to a [`SceneQuery`]; in the app that is
//! Bevy's mesh ray cast, in tests a fixed hit list.

mod scene;
mod systems;

use bevy::prelude::*;
use hexx::Hex;

use crate::ViewerSet;
use crate::camera::CameraPose;
use crate::grid::{HexGrid, RenderId};
use crate::input::PointerSample;

/// One ray intersection reported by a [`SceneQuery`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Render id of the intersected drawable.
    pub id: RenderId,
    /// Distance from the ray origin.
    pub distance: f32,
}

/// Ray-intersection primitive supplied by the renderer.
pub trait SceneQuery {
    /// All drawables hit by `ray`, in any order.
    fn intersect(&mut self, ray: Ray3d) -> Vec<Hit>;
}

/// Perspective parameters needed to shoot rays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
}

/// Maps a top-left-origin screen point to normalized device coordinates.
///
/// `x = 2·px/width − 1`, `y = −(2·py/height − 1)`: the screen Y axis points
/// down while NDC Y points up.
pub fn screen_to_normalized(point: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        2.0 * point.x / viewport.x - 1.0,
        -(2.0 * point.y / viewport.y - 1.0),
    )
}

/// World-space ray from the camera through an NDC point.
///
/// Returns `None` for degenerate directions (non-finite input).
pub fn pick_ray(ndc: Vec2, pose: &CameraPose, lens: Lens) -> Option<Ray3d> {
    let half_height = (lens.fov_y * 0.5).tan();
    let local = Vec3::new(ndc.x * half_height * lens.aspect, ndc.y * half_height, -1.0);
    let direction = Dir3::new(pose.rotation * local).ok()?;
    Some(Ray3d {
        origin: pose.position,
        direction,
    })
}

/// Hits under the pointer, nearest first.
///
/// The viewport inside `sample` is the one current when the pointer event
/// arrived, so resizes between events cannot skew the mapping.
pub fn pick(
    sample: PointerSample,
    pose: &CameraPose,
    fov_y: f32,
    scene: &mut impl SceneQuery,
) -> Vec<Hit> {
    let viewport = sample.viewport;
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec::new();
    }
    let ndc = screen_to_normalized(sample.position, viewport);
    let lens = Lens {
        fov_y,
        aspect: viewport.x / viewport.y,
    };
    let Some(ray) = pick_ray(ndc, pose, lens) else {
        return Vec::new();
    };
    let mut hits = scene.intersect(ray);
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Re-evaluates hover from a fresh pick: clears every tile, then hovers the
/// nearest hit when it is a tile. Farther hits never hover.
pub fn apply_hover(grid: &mut HexGrid, hits: &[Hit]) -> Option<Hex> {
    grid.unhover_all();
    let nearest = hits.first()?;
    grid.hover_over(nearest.id)
}

/// Hover and click resolution against Bevy meshes.
pub struct PickingPlugin;

impl Plugin for PickingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (systems::update_hover, systems::route_clicks)
                .chain()
                .in_set(ViewerSet::Pick),
        );
    }
}
