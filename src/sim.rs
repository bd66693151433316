//! A single falling sphere stepped at a fixed rate, plus its ground plane.

use bevy::prelude::*;

use crate::ViewerSet;
use crate::frame::Simulation;

/// Parameters of the falling body.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct SimConfig {
    /// Constant acceleration in world units per second squared.
    pub gravity: Vec3,
    /// Physics step in seconds.
    pub fixed_step: f32,
    /// Most steps taken per frame; backlog beyond that is dropped.
    pub max_substeps: u32,
    /// Sphere radius; the sphere rests on the ground at this height.
    pub ball_radius: f32,
    /// Initial sphere center.
    pub spawn: Vec3,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -0.1, 0.0),
            fixed_step: 1.0 / 60.0,
            max_substeps: 10,
            ball_radius: 1.0,
            spawn: Vec3::new(0.0, 3.0, 0.0),
        }
    }
}

/// Sphere under gravity above a ground plane at `y = 0`.
#[derive(Resource, Clone, Debug)]
pub struct FallingBody {
    position: Vec3,
    velocity: Vec3,
    gravity: Vec3,
    radius: f32,
    fixed_step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FallingBody {
    /// Body at rest at the configured spawn point.
    pub fn new(cfg: &SimConfig) -> Self {
        Self {
            position: cfg.spawn,
            velocity: Vec3::ZERO,
            gravity: cfg.gravity,
            radius: cfg.ball_radius,
            fixed_step: cfg.fixed_step.max(f32::EPSILON),
            max_substeps: cfg.max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Sphere center.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Sphere radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Whether the sphere is lying on the ground.
    pub fn is_grounded(&self) -> bool {
        self.position.y <= self.radius
    }

    fn step(&mut self, dt: f32) {
        self.velocity += self.gravity * dt;
        self.position += self.velocity * dt;
        if self.position.y < self.radius {
            self.position.y = self.radius;
            self.velocity.y = self.velocity.y.max(0.0);
        }
    }
}

impl Simulation for FallingBody {
    fn advance(&mut self, elapsed: f32) {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return;
        }
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.fixed_step && steps < self.max_substeps {
            self.step(self.fixed_step);
            self.accumulator -= self.fixed_step;
            steps += 1;
        }
        if steps == self.max_substeps {
            self.accumulator %= self.fixed_step;
        }
    }
}

/// Marks the rendered sphere.
#[derive(Component, Reflect)]
pub struct Ball;

/// Registers the body and copies its pose to the ball mesh.
///
/// The body is stepped by the frame loop, not here.
pub struct SimPlugin(pub SimConfig);

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SimConfig>()
            .register_type::<Ball>()
            .insert_resource(self.0.clone())
            .insert_resource(FallingBody::new(&self.0))
            .add_systems(Startup, spawn_bodies)
            .add_systems(Update, sync_ball.in_set(ViewerSet::Present));
    }
}

fn spawn_bodies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    body: Res<FallingBody>,
) {
    commands.spawn((
        Name::new("Ball"),
        Ball,
        Mesh3d(meshes.add(Sphere::new(body.radius()).mesh().uv(32, 32))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 1.0, 0.0),
            unlit: true,
            ..default()
        })),
        Transform::from_translation(body.position()),
    ));

    // Sits just below the tiles so their faces win the depth test
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(3.0, 3.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0xf5, 0xf5, 0xdc),
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.01, 0.0),
    ));
}

fn sync_ball(body: Res<FallingBody>, mut query: Query<&mut Transform, With<Ball>>) {
    if !body.is_changed() {
        return;
    }
    for mut transform in &mut query {
        transform.translation = body.position();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> FallingBody {
        FallingBody::new(&SimConfig {
            gravity: Vec3::new(0.0, -10.0, 0.0),
            fixed_step: 0.1,
            max_substeps: 5,
            ball_radius: 1.0,
            spawn: Vec3::new(2.0, 3.0, 0.0),
        })
    }

    #[test]
    fn falls_in_fixed_steps() {
        let mut b = body();
        b.advance(0.05);
        assert_eq!(b.position(), Vec3::new(2.0, 3.0, 0.0));
        b.advance(0.06);
        // One step: v = -1, y = 3 - 0.1
        assert!((b.position().y - 2.9).abs() < 1e-5);
        assert!((b.velocity().y + 1.0).abs() < 1e-5);
        assert_eq!(b.position().x, 2.0);
    }

    #[test]
    fn rests_on_ground() {
        let mut b = body();
        for _ in 0..100 {
            b.advance(0.1);
        }
        assert!(b.is_grounded());
        assert_eq!(b.position().y, b.radius());
        assert_eq!(b.velocity().y, 0.0);
    }

    #[test]
    fn substeps_are_capped() {
        let mut b = body();
        b.advance(10.0);
        // At most five steps of 0.1 s ran
        let mut reference = body();
        for _ in 0..5 {
            reference.advance(0.1);
        }
        assert!((b.position().y - reference.position().y).abs() < 1e-4);
    }

    #[test]
    fn ignores_non_positive_and_non_finite_elapsed() {
        let mut b = body();
        b.advance(-1.0);
        b.advance(f32::NAN);
        b.advance(0.0);
        assert_eq!(b.position(), Vec3::new(2.0, 3.0, 0.0));
    }
}
