//! Steering primitive shared by the flight and landing state machines.
//!
//! Velocity is never set directly: it is blended toward the desired
//! velocity each tick, which yields exponential-decay convergence.

use glam::{DVec2, DVec3};

use seeker_core::constants::*;
use seeker_core::types::{Orientation, Position, Velocity};

/// Planar velocity toward `target`, scaled to `STEER_SPEED` and eased inside
/// `ARRIVAL_SLOWDOWN_RADIUS` so the agent settles instead of orbiting.
pub fn planar_velocity(position: &Position, target: &Position) -> DVec2 {
    let delta = target.horizontal() - position.horizontal();
    let distance = delta.length();
    if distance < 1e-6 {
        return DVec2::ZERO;
    }
    let ease = (distance / ARRIVAL_SLOWDOWN_RADIUS).min(1.0);
    delta / distance * STEER_SPEED * ease
}

/// Altitude error clamped to the maximum vertical rate.
pub fn vertical_velocity(position: &Position, target_altitude: f64) -> f64 {
    (target_altitude - position.z).clamp(-MAX_VERTICAL_RATE, MAX_VERTICAL_RATE)
}

/// Desired 3D velocity toward a target point.
pub fn desired_velocity(position: &Position, target: &Position) -> DVec3 {
    planar_velocity(position, target).extend(vertical_velocity(position, target.z))
}

/// Blend the current velocity toward `desired` and align orientation with it.
pub fn apply(velocity: &mut Velocity, orientation: &mut Orientation, desired: DVec3, dt: f64) {
    let blend = (VELOCITY_SMOOTHING * dt).min(1.0);
    *velocity = Velocity::from_vec(velocity.to_vec().lerp(desired, blend));
    align_orientation(orientation, velocity, dt);
}

/// Steer toward a target point with the shared primitive.
pub fn steer_towards(
    position: &Position,
    velocity: &mut Velocity,
    orientation: &mut Orientation,
    target: &Position,
    dt: f64,
) {
    apply(velocity, orientation, desired_velocity(position, target), dt);
}

/// Smoothed rotation toward the horizontal velocity direction.
pub fn align_orientation(orientation: &mut Orientation, velocity: &Velocity, dt: f64) {
    if velocity.horizontal_speed() < YAW_MIN_SPEED {
        return;
    }
    let target_yaw = velocity.y.atan2(velocity.x);
    let error = wrap_angle(target_yaw - orientation.yaw);
    let blend = (YAW_SMOOTHING * dt).min(1.0);
    orientation.yaw = wrap_angle(orientation.yaw + error * blend);
}

/// Wrap an angle into (-π, π].
pub fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}
