//! Hex tile grid: axial addressing, tile spawning, and hover/click state.
//!
//! [`HexGrid`] is a plain resource with no ECS dependencies; the systems in
//! this module spawn one face mesh per tile and bind the entity as its
//! [`RenderId`] so picking hits can be resolved back to tiles.

mod entities;
mod hex_grid;
mod layout;
mod systems;

pub use entities::{SelectedTile, TileClicked, TileFace, TileMaterials};
pub use hex_grid::{GridError, GridResult, HexGrid, RenderId, Tile, TileCallback, pointy_layout};
pub use layout::TileLayout;

use bevy::prelude::*;

use crate::ViewerSet;

/// Grid construction and tile appearance.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct GridConfig {
    /// Center-to-corner distance of a hex in world units.
    pub tile_size: f32,
    /// Face scale relative to `tile_size`; below 1.0 leaves gaps between tiles.
    pub tile_scale: f32,
    /// Which hexes exist.
    pub layout: TileLayout,
    /// Color of a tile at rest.
    pub idle_color: Color,
    /// Color of the tile under the pointer.
    pub hover_color: Color,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_size: 1.0,
            tile_scale: 0.94,
            layout: TileLayout::Example,
            idle_color: Color::srgb(0.35, 0.55, 0.4),
            hover_color: Color::srgb(0.95, 0.6, 0.15),
        }
    }
}

impl GridConfig {
    /// Builds the (unbound) grid described by this config.
    pub fn build_grid(&self) -> HexGrid {
        HexGrid::new(self.tile_size, self.layout.hexes())
    }
}

/// Builds the [`HexGrid`] resource and spawns its tile meshes.
pub struct GridPlugin(pub GridConfig);

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GridConfig>()
            .register_type::<TileFace>()
            .insert_resource(self.0.clone())
            .insert_resource(self.0.build_grid())
            .add_message::<TileClicked>()
            .init_resource::<SelectedTile>()
            .add_systems(Startup, systems::spawn_tiles)
            .add_systems(
                Update,
                (systems::track_clicks, systems::sync_hover_materials)
                    .in_set(ViewerSet::Present),
            );
    }
}
