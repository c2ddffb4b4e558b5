//! Ground collision and settling
//!
//! The ball only ever meets one surface: a flat ground at a fixed height.
//! Contact clamps the ball to the ground and reflects its vertical velocity
//! with damping. Slow rebounds settle the ball instead of bouncing it.

use glam::Vec2;

use crate::config::BallConfig;

/// Outcome of one ground check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundContact {
    /// Ball is above the ground, nothing changed
    Airborne,
    /// Ball hit the ground and rebounded
    Bounced {
        /// Downward speed at impact
        impact_speed: f32,
        /// Upward speed after damping
        rebound_speed: f32,
    },
    /// Ball hit the ground and the rebound was too slow to continue; velocity is zero
    Settled { impact_speed: f32 },
}

impl GroundContact {
    pub fn touched_ground(&self) -> bool {
        !matches!(self, GroundContact::Airborne)
    }
}

/// Whether a rebound is too slow to keep the ball moving.
///
/// Two conditions stop the ball:
/// - the rebound is under the settle threshold (boundary per config)
/// - the rebound cannot outlast one tick of gravity, so the next tick would
///   put the ball straight back into the ground (resting contact)
#[inline]
pub fn rebound_settles(rebound_speed: f32, config: &BallConfig) -> bool {
    config
        .settle_boundary
        .settles(rebound_speed, config.settle_threshold)
        || rebound_speed <= config.gravity_per_tick()
}

/// Resolve ground contact after integration.
///
/// Horizontal velocity is untouched (no friction).
pub fn resolve_ground(pos: &mut Vec2, vel: &mut Vec2, config: &BallConfig) -> GroundContact {
    if pos.y > config.ground_level {
        return GroundContact::Airborne;
    }

    pos.y = config.ground_level;
    let impact_speed = vel.y.abs();
    vel.y = -vel.y * config.damping_factor;
    let rebound_speed = vel.y.abs();

    if rebound_settles(rebound_speed, config) {
        *vel = Vec2::ZERO;
        return GroundContact::Settled { impact_speed };
    }

    GroundContact::Bounced {
        impact_speed,
        rebound_speed,
    }
}
