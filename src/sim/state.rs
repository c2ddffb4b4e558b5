//! The ball entity and its Moving/Stopped state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::FrameAnimator;
use super::collision::{GroundContact, resolve_ground};
use super::integrate::integrate;
use crate::config::{BallConfig, ConfigError};

/// Whether the ball is being simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallState {
    /// Gravity, ground collision and animation all run
    #[default]
    Moving,
    /// At rest on the ground; frozen until kicked
    Stopped,
}

/// Read-only view used by the render adapter
pub trait SpriteView {
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;
    fn current_frame(&self) -> usize;
}

/// Copy of everything a reader outside the tick needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
    pub frame: usize,
}

impl SpriteView for BallSnapshot {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn current_frame(&self) -> usize {
        self.frame
    }
}

/// A bouncing, animated ball
#[derive(Debug, Clone)]
pub struct Ball {
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    state: BallState,
    /// Ordered sprite frame identifiers; fixed at construction
    frame_ids: Vec<String>,
    animator: FrameAnimator,
    config: BallConfig,
}

impl Ball {
    /// Build a ball at the configured start position, at rest and `Moving`.
    ///
    /// Fails if the config is invalid or `frame_ids` is empty.
    pub fn new<S: Into<String>>(
        config: BallConfig,
        frame_ids: impl IntoIterator<Item = S>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let frame_ids: Vec<String> = frame_ids.into_iter().map(Into::into).collect();
        if frame_ids.is_empty() {
            return Err(ConfigError::NoFrames);
        }

        log::info!(
            "Ball created at ({:.3}, {:.3}) with {} frames",
            config.start_position.x,
            config.start_position.y,
            frame_ids.len()
        );

        Ok(Self {
            pos: config.start_position,
            vel: Vec2::ZERO,
            radius: config.radius,
            state: BallState::Moving,
            animator: FrameAnimator::new(frame_ids.len(), config.frame_cadence),
            frame_ids,
            config,
        })
    }

    /// Integrate gravity and resolve ground contact. No-op while stopped.
    pub fn update_physics(&mut self) -> GroundContact {
        if self.state == BallState::Stopped {
            return GroundContact::Airborne;
        }

        integrate(
            &mut self.pos,
            &mut self.vel,
            self.config.gravity,
            self.config.dt,
        );
        let contact = resolve_ground(&mut self.pos, &mut self.vel, &self.config);

        match contact {
            GroundContact::Bounced {
                impact_speed,
                rebound_speed,
            } => {
                log::debug!("Bounce: impact {impact_speed:.4} -> rebound {rebound_speed:.4}");
            }
            GroundContact::Settled { impact_speed } => {
                self.state = BallState::Stopped;
                log::info!(
                    "Ball settled at x={:.3} (impact {impact_speed:.4})",
                    self.pos.x
                );
            }
            GroundContact::Airborne => {}
        }

        contact
    }

    /// Count one animation tick. Frozen while stopped.
    ///
    /// Returns the new frame index when the sprite advanced.
    pub fn update_animation_frame(&mut self) -> Option<usize> {
        if self.state == BallState::Stopped {
            return None;
        }
        let advanced = self.animator.advance();
        if let Some(frame) = advanced {
            log::trace!("Sprite frame -> {frame}");
        }
        advanced
    }

    /// Kick: set velocity exactly and force `Moving`, whatever the current state
    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        if self.state == BallState::Stopped {
            log::info!("Ball kicked from rest with velocity ({vx:.3}, {vy:.3})");
        }
        self.vel = Vec2::new(vx, vy);
        self.state = BallState::Moving;
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn state(&self) -> BallState {
        self.state
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn current_frame(&self) -> usize {
        self.animator.current_frame()
    }

    pub fn frame_counter(&self) -> u32 {
        self.animator.frame_counter()
    }

    pub fn num_frames(&self) -> usize {
        self.animator.num_frames()
    }

    /// Identifier of the sprite frame currently shown
    pub fn current_frame_id(&self) -> &str {
        &self.frame_ids[self.animator.current_frame()]
    }

    pub fn config(&self) -> &BallConfig {
        &self.config
    }

    pub fn ground_level(&self) -> f32 {
        self.config.ground_level
    }

    pub fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            pos: self.pos,
            vel: self.vel,
            radius: self.radius,
            state: self.state,
            frame: self.animator.current_frame(),
        }
    }
}

impl SpriteView for Ball {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn current_frame(&self) -> usize {
        self.animator.current_frame()
    }
}
