//! Repulsive velocity terms applied during pre-hover and descent.
//!
//! Neighbour positions are those committed on the previous tick, so the
//! result does not depend on the order in which agents are updated.

use glam::DVec2;

use seeker_core::config::LandingConfig;
use seeker_core::types::Position;

/// Sum of neighbour and keep-out repulsion for one landing agent.
pub fn separation_velocity(
    position: &Position,
    neighbours: &[Position],
    target: &Position,
    config: &LandingConfig,
) -> DVec2 {
    let mut push = DVec2::ZERO;
    for neighbour in neighbours {
        push += repel(
            position.horizontal(),
            neighbour.horizontal(),
            config.separation_distance,
            config.separation_gain,
        );
    }
    push + keep_out_velocity(position, target, config)
}

/// Repulsion away from the keep-out cylinder around the target.
pub fn keep_out_velocity(position: &Position, target: &Position, config: &LandingConfig) -> DVec2 {
    repel(
        position.horizontal(),
        target.horizontal(),
        config.keep_out_radius,
        config.separation_gain,
    )
}

/// Proportional push away from `from` while closer than `radius`.
fn repel(at: DVec2, from: DVec2, radius: f64, gain: f64) -> DVec2 {
    let offset = at - from;
    let distance = offset.length();
    if distance >= radius {
        return DVec2::ZERO;
    }
    // Coincident points have no direction; push along +x.
    let direction = if distance > 1e-6 {
        offset / distance
    } else {
        DVec2::X
    };
    direction * (radius - distance) * gain
}
