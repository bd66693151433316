use bevy::prelude::*;
use hexx::{Hex, shapes};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::hex_grid::pointy_layout;

/// Hand-placed demo board: a center flower with a short path leading east.
const EXAMPLE_TILES: [(i32, i32); 12] = [
    (0, 0),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (2, 0),
    (3, -1),
    (4, -1),
    (4, -2),
    (5, -2),
];

/// Which hexes a grid is built from.
#[derive(Clone, Debug, Reflect)]
pub enum TileLayout {
    /// Fixed demo board.
    Example,
    /// Every hex within `radius` rings of the origin.
    Hexagon {
        /// Ring count around the origin.
        radius: u32,
    },
    /// Noise-carved island: hexes within `radius` whose noise exceeds `threshold`.
    Island {
        /// Ring count around the origin.
        radius: u32,
        /// Seed for the noise generator.
        seed: u32,
        /// Cut-off in `[-1, 1]`; higher keeps fewer tiles.
        threshold: f64,
        /// Spatial divisor for noise sampling (in hex units).
        scale: f64,
    },
}

impl TileLayout {
    /// Coordinates in this layout, in a stable order. The origin is always included.
    pub fn hexes(&self) -> Vec<Hex> {
        match *self {
            Self::Example => EXAMPLE_TILES.iter().map(|&(q, r)| Hex::new(q, r)).collect(),
            Self::Hexagon { radius } => shapes::hexagon(Hex::ZERO, radius).collect(),
            Self::Island {
                radius,
                seed,
                threshold,
                scale,
            } => {
                let fbm: Fbm<Perlin> = Fbm::new(seed).set_octaves(3);
                let unit = pointy_layout(1.0);
                shapes::hexagon(Hex::ZERO, radius)
                    .filter(|&hex| {
                        if hex == Hex::ZERO {
                            return true;
                        }
                        let pos = unit.hex_to_world_pos(hex);
                        let n = fbm.get([pos.x as f64 / scale, pos.y as f64 / scale]);
                        // Fade towards the rim so the island stays compact
                        let falloff = hex.ulength() as f64 / (radius.max(1) as f64 + 1.0);
                        n - falloff * 0.5 > threshold
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_board_has_unique_tiles() {
        let hexes = TileLayout::Example.hexes();
        let mut dedup = hexes.clone();
        dedup.sort_by_key(|h| (h.x, h.y));
        dedup.dedup();
        assert_eq!(dedup.len(), hexes.len());
        assert!(hexes.contains(&Hex::ZERO));
    }

    #[test]
    fn hexagon_count_matches_ring_formula() {
        // 1 + 3·n·(n+1)
        let hexes = TileLayout::Hexagon { radius: 3 }.hexes();
        assert_eq!(hexes.len(), 37);
    }

    #[test]
    fn island_is_deterministic_and_bounded() {
        let layout = TileLayout::Island {
            radius: 6,
            seed: 7,
            threshold: -0.2,
            scale: 4.0,
        };
        let a = layout.hexes();
        let b = layout.hexes();
        assert_eq!(a, b);
        assert!(a.contains(&Hex::ZERO));
        assert!(a.len() <= TileLayout::Hexagon { radius: 6 }.hexes().len());
        assert!(a.iter().all(|h| h.ulength() <= 6));
    }
}
