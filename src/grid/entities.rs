use bevy::prelude::*;
use hexx::Hex;

/// Drawable face of a grid tile.
#[derive(Component, Reflect)]
pub struct TileFace {
    /// The tile coordinate this face renders.
    pub hex: Hex,
}

/// Shared materials for idle and hovered tiles.
#[derive(Resource)]
pub struct TileMaterials {
    /// Default tile surface.
    pub idle: Handle<StandardMaterial>,
    /// Surface of the tile under the pointer.
    pub hovered: Handle<StandardMaterial>,
}

/// Written when a click lands on a tile.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileClicked {
    /// Coordinate of the clicked tile.
    pub hex: Hex,
}

/// Most recently clicked tile, fed from [`TileClicked`] messages.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedTile(pub Option<Hex>);
