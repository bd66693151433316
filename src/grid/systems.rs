use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use hexx::{Hex, PlaneMeshBuilder};

use super::GridConfig;
use super::entities::{SelectedTile, TileClicked, TileFace, TileMaterials};
use super::hex_grid::{HexGrid, RenderId, pointy_layout};

// ── Startup ─────────────────────────────────────────────────────────

/// Spawns one face mesh per tile and binds each entity as the tile's render id.
pub fn spawn_tiles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut grid: ResMut<HexGrid>,
    cfg: Res<GridConfig>,
) {
    let idle = materials.add(StandardMaterial {
        base_color: cfg.idle_color,
        perceptual_roughness: 0.9,
        ..default()
    });
    let hovered = materials.add(StandardMaterial {
        base_color: cfg.hover_color,
        emissive: cfg.hover_color.to_linear() * 0.5,
        ..default()
    });

    // Unit-size pointy-top face, scaled per tile to the grid's hex size
    let unit_layout = pointy_layout(1.0);
    let hex_mesh_info = PlaneMeshBuilder::new(&unit_layout).build();
    let hex_mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, hex_mesh_info.vertices)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, hex_mesh_info.normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, hex_mesh_info.uvs)
    .with_inserted_indices(Indices::U16(hex_mesh_info.indices));
    let hex_mesh_handle = meshes.add(hex_mesh);

    let grid_entity = commands
        .spawn((
            Name::new("HexGrid"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let face_scale = grid.size() * cfg.tile_scale;
    let hexes: Vec<Hex> = grid.tiles().map(|t| t.hex()).collect();
    for hex in hexes {
        let center_2d = grid.center(hex);
        let entity = commands
            .spawn((
                TileFace { hex },
                Name::new(format!("Tile({},{})", hex.x, hex.y)),
                Mesh3d(hex_mesh_handle.clone()),
                MeshMaterial3d(idle.clone()),
                Transform::from_xyz(center_2d.x, 0.0, center_2d.y)
                    .with_scale(Vec3::new(face_scale, 1.0, face_scale)),
            ))
            .id();
        commands.entity(grid_entity).add_child(entity);

        if let Err(err) = grid.register_render_id(hex, RenderId::from(entity)) {
            error!("tile face not pickable: {err}");
        }
    }

    info!("spawned {} tiles (hex size {})", grid.len(), grid.size());
    commands.insert_resource(TileMaterials { idle, hovered });
}

// ── Update ──────────────────────────────────────────────────────────

/// Logs each clicked tile and remembers the latest one.
pub fn track_clicks(mut clicked: MessageReader<TileClicked>, mut selected: ResMut<SelectedTile>) {
    for ev in clicked.read() {
        info!("clicked tile ({}, {})", ev.hex.x, ev.hex.y);
        selected.0 = Some(ev.hex);
    }
}

/// Swaps tile materials to reflect the grid's hover flags.
pub fn sync_hover_materials(
    grid: Res<HexGrid>,
    tile_materials: Option<Res<TileMaterials>>,
    mut faces: Query<(&TileFace, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    if !grid.is_changed() {
        return;
    }
    let Some(tile_materials) = tile_materials else {
        return;
    };
    for (face, mut material) in &mut faces {
        let hovered = grid.tile_at(face.hex).is_some_and(|t| t.is_hovered());
        let wanted = if hovered {
            &tile_materials.hovered
        } else {
            &tile_materials.idle
        };
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_update_selection() {
        let mut app = App::new();
        app.add_message::<TileClicked>()
            .init_resource::<SelectedTile>()
            .add_systems(Update, track_clicks);

        app.update();
        assert_eq!(app.world().resource::<SelectedTile>().0, None);

        app.world_mut().write_message(TileClicked { hex: Hex::new(1, 0) });
        app.world_mut().write_message(TileClicked { hex: Hex::new(2, -1) });
        app.update();
        assert_eq!(
            app.world().resource::<SelectedTile>().0,
            Some(Hex::new(2, -1))
        );
    }
}
