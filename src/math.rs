//! Angle and input-sanity helpers shared by the camera and input code.
//!
//! Nothing here touches the ECS.

use std::f32::consts::TAU;

use bevy::prelude::Vec2;

/// Wraps an angle in radians into `[0, 2π)`.
///
/// # Examples
/// ```
/// # use hex_orbit::math::wrap_angle;
/// assert_eq!(wrap_angle(-std::f32::consts::PI), std::f32::consts::PI);
/// ```
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// `true` when both components are finite (not NaN or infinite).
pub fn is_finite_vec2(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Clamps `value` to +1, 0 or -1 by sign.
pub fn unit_sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
