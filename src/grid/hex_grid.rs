use std::fmt;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use hexx::{Hex, HexLayout, HexOrientation};

/// Opaque handle the rendering side assigns to a tile's drawable.
///
/// The grid never generates these; it only stores them for reverse lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct RenderId(pub u64);

impl From<Entity> for RenderId {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

impl fmt::Display for RenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// Callback fired when a tile is clicked. Receives the tile's coordinate.
pub type TileCallback = Box<dyn Fn(Hex) + Send + Sync>;

/// Errors raised while binding render ids to tiles.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The render id already belongs to another tile.
    #[error("render id {id} is already bound to tile ({},{}), cannot bind it to ({},{})", .bound.x, .bound.y, .requested.x, .requested.y)]
    DuplicateBinding {
        /// The contested id.
        id: RenderId,
        /// Tile currently owning the id.
        bound: Hex,
        /// Tile the caller tried to bind.
        requested: Hex,
    },
    /// The tile already carries a different render id.
    #[error("tile ({},{}) already has render id {existing}", .hex.x, .hex.y)]
    AlreadyRegistered {
        /// The tile.
        hex: Hex,
        /// Its current id.
        existing: RenderId,
    },
    /// No tile exists at the coordinate.
    #[error("no tile at ({},{})", .0.x, .0.y)]
    UnknownTile(Hex),
}

/// Result alias for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Pointy-top layout centered on the world origin with hexes of `size`.
pub fn pointy_layout(size: f32) -> HexLayout {
    HexLayout {
        orientation: HexOrientation::Pointy,
        scale: Vec2::splat(size),
        ..default()
    }
}

/// One addressable hex cell.
pub struct Tile {
    hex: Hex,
    render_id: Option<RenderId>,
    hovered: bool,
    on_click: Option<TileCallback>,
}

impl Tile {
    fn new(hex: Hex) -> Self {
        Self {
            hex,
            render_id: None,
            hovered: false,
            on_click: None,
        }
    }

    /// Axial coordinate (`x = q`, `y = r`).
    pub fn hex(&self) -> Hex {
        self.hex
    }

    /// Render id bound to this tile, if any.
    pub fn render_id(&self) -> Option<RenderId> {
        self.render_id
    }

    /// Whether the pointer is currently over this tile.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether a click callback is installed.
    pub fn has_click_handler(&self) -> bool {
        self.on_click.is_some()
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("hex", &self.hex)
            .field("render_id", &self.render_id)
            .field("hovered", &self.hovered)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Static set of hex tiles with axial placement and render-id reverse lookup.
///
/// Tiles keep their construction order. At most one tile is hovered at a time,
/// and every bound render id maps to exactly one tile.
#[derive(Resource)]
pub struct HexGrid {
    size: f32,
    layout: HexLayout,
    tiles: Vec<Tile>,
    by_hex: HashMap<Hex, usize>,
    by_render_id: HashMap<RenderId, usize>,
    hovered: Option<usize>,
}

impl HexGrid {
    /// Builds a grid of tiles with the given hex size. Duplicate coordinates are dropped.
    pub fn new(size: f32, hexes: impl IntoIterator<Item = Hex>) -> Self {
        let mut tiles = Vec::new();
        let mut by_hex = HashMap::new();
        for hex in hexes {
            if by_hex.contains_key(&hex) {
                continue;
            }
            by_hex.insert(hex, tiles.len());
            tiles.push(Tile::new(hex));
        }
        Self {
            size,
            layout: pointy_layout(size),
            tiles,
            by_hex,
            by_render_id: HashMap::new(),
            hovered: None,
        }
    }

    // ── Layout ─────────────────────────────────────────────────────

    /// Hex size (center-to-corner distance) in world units.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// World-space 2D center of `hex` (x → world X, y → world Z).
    ///
    /// Pointy-top placement: `x = size·√3·(q + r/2)`, `y = size·1.5·r`.
    ///
    /// # Examples
    /// ```
    /// # use hex_orbit::grid::HexGrid;
    /// # use hexx::Hex;
    /// let grid = HexGrid::new(1.0, [Hex::ZERO, Hex::new(0, 2)]);
    /// let c = grid.center(Hex::new(0, 2));
    /// assert!((c.x - 3f32.sqrt()).abs() < 1e-5);
    /// assert!((c.y - 3.0).abs() < 1e-5);
    /// ```
    pub fn center(&self, hex: Hex) -> Vec2 {
        self.layout.hex_to_world_pos(hex)
    }

    /// Tile whose cell contains the world-space 2D point, if any.
    pub fn tile_at_world(&self, pos: Vec2) -> Option<&Tile> {
        self.tile_at(self.layout.world_pos_to_hex(pos))
    }

    // ── Tiles ──────────────────────────────────────────────────────

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// `true` when the grid has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in construction order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Tile at `hex`, if present.
    pub fn tile_at(&self, hex: Hex) -> Option<&Tile> {
        self.by_hex.get(&hex).map(|&i| &self.tiles[i])
    }

    /// Installs the click callback of the tile at `hex`. Returns `false` if absent.
    pub fn set_on_click(&mut self, hex: Hex, callback: TileCallback) -> bool {
        let Some(&i) = self.by_hex.get(&hex) else {
            return false;
        };
        self.tiles[i].on_click = Some(callback);
        true
    }

    // ── Render-id binding ──────────────────────────────────────────

    /// Binds `id` to the tile at `hex`, once.
    ///
    /// Re-binding the same pair is a no-op. Nothing changes on error.
    pub fn register_render_id(&mut self, hex: Hex, id: RenderId) -> GridResult<()> {
        let Some(&index) = self.by_hex.get(&hex) else {
            return Err(GridError::UnknownTile(hex));
        };
        if let Some(&owner) = self.by_render_id.get(&id) {
            if owner == index {
                return Ok(());
            }
            return Err(GridError::DuplicateBinding {
                id,
                bound: self.tiles[owner].hex,
                requested: hex,
            });
        }
        if let Some(existing) = self.tiles[index].render_id {
            return Err(GridError::AlreadyRegistered { hex, existing });
        }
        self.tiles[index].render_id = Some(id);
        self.by_render_id.insert(id, index);
        Ok(())
    }

    /// Tile bound to `id`, if any.
    pub fn lookup_by_render_id(&self, id: RenderId) -> Option<&Tile> {
        self.by_render_id.get(&id).map(|&i| &self.tiles[i])
    }

    // ── Hover / click ──────────────────────────────────────────────

    /// Marks the tile bound to `id` as hovered, clearing any previous hover.
    ///
    /// Returns the hovered coordinate; unknown ids leave the grid untouched.
    pub fn hover_over(&mut self, id: RenderId) -> Option<Hex> {
        let &index = self.by_render_id.get(&id)?;
        if let Some(prev) = self.hovered.take() {
            self.tiles[prev].hovered = false;
        }
        self.tiles[index].hovered = true;
        self.hovered = Some(index);
        Some(self.tiles[index].hex)
    }

    /// Clears the hover flag on every tile.
    pub fn unhover_all(&mut self) {
        for tile in &mut self.tiles {
            tile.hovered = false;
        }
        self.hovered = None;
    }

    /// The hovered tile, if any.
    pub fn hovered(&self) -> Option<&Tile> {
        self.hovered.map(|i| &self.tiles[i])
    }

    /// Fires the click callback of the tile bound to `id`.
    ///
    /// Returns the clicked coordinate, or `None` when `id` is not a tile.
    pub fn on_click(&self, id: RenderId) -> Option<Hex> {
        let tile = self.lookup_by_render_id(id)?;
        if let Some(callback) = &tile.on_click {
            callback(tile.hex);
        }
        Some(tile.hex)
    }
}
