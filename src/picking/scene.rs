use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use bevy::prelude::*;

use super::{Hit, SceneQuery};
use crate::grid::RenderId;

impl SceneQuery for MeshRayCast<'_, '_> {
    fn intersect(&mut self, ray: Ray3d) -> Vec<Hit> {
        // Occlusion needs every hit along the ray, not only the first
        let settings = MeshRayCastSettings::default().never_early_exit();
        self.cast_ray(ray, &settings)
            .iter()
            .map(|(entity, hit)| Hit {
                id: RenderId::from(*entity),
                distance: hit.distance,
            })
            .collect()
    }
}
