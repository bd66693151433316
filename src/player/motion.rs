use bevy::prelude::*;

use crate::math;

/// Ground-plane axis a movement key drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionAxis {
    /// Left (-1) / right (+1).
    X,
    /// Back (-1) / forward (+1).
    Y,
}

/// Velocity-intent integrator for the player.
///
/// Key handlers assign each velocity component directly to -1, 0 or +1; the
/// last write per axis wins, so releasing either of two opposite keys stops
/// that axis even if the other is still held.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerMotion {
    position: Vec2,
    velocity: Vec2,
    speed: f32,
}

impl PlayerMotion {
    /// Player at rest at `position`, moving `speed` units per second when driven.
    pub fn new(position: Vec2, speed: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            speed,
        }
    }

    /// Ground-plane position (x → world X, y → world -Z).
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity intent, each component in {-1, 0, +1}.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Units per second at full intent.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Sets one axis of the intent; the value collapses to its sign.
    pub fn set_axis(&mut self, axis: MotionAxis, value: f32) {
        let value = math::unit_sign(value);
        match axis {
            MotionAxis::X => self.velocity.x = value,
            MotionAxis::Y => self.velocity.y = value,
        }
    }

    /// Integrates `position += velocity · speed · elapsed`.
    pub fn advance(&mut self, elapsed: f32) {
        self.position += self.velocity * self.speed * elapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_scales_by_speed_and_time() {
        let mut motion = PlayerMotion::new(Vec2::ZERO, 2.0);
        motion.set_axis(MotionAxis::X, 1.0);
        motion.advance(0.5);
        assert_eq!(motion.position(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn axis_values_collapse_to_unit() {
        let mut motion = PlayerMotion::new(Vec2::ZERO, 1.0);
        motion.set_axis(MotionAxis::X, 7.0);
        motion.set_axis(MotionAxis::Y, -0.3);
        assert_eq!(motion.velocity(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn last_writer_wins_per_axis() {
        let mut motion = PlayerMotion::new(Vec2::ZERO, 1.0);
        motion.set_axis(MotionAxis::X, -1.0);
        motion.set_axis(MotionAxis::X, 1.0);
        assert_eq!(motion.velocity().x, 1.0);
        motion.set_axis(MotionAxis::X, 0.0);
        assert_eq!(motion.velocity().x, 0.0);
    }

    #[test]
    fn resting_player_does_not_move() {
        let mut motion = PlayerMotion::new(Vec2::new(3.0, -1.0), 5.0);
        motion.advance(10.0);
        assert_eq!(motion.position(), Vec2::new(3.0, -1.0));
    }
}
