//! Bouncing Ball - an animated sprite ball that falls, bounces and settles
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, ground collision, state, animation)
//! - `config`: Validated, JSON-loadable tuning
//! - `renderer`: WebGPU textured-disc render adapter

pub mod config;
pub mod renderer;
pub mod sim;

pub use config::{BallConfig, ConfigError, SettleBoundary};
pub use sim::{Ball, BallSnapshot, BallState, Scene, SpriteView};

/// Design-default tuning constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 12.0;
    /// The y-coordinate the ball can never fall below
    pub const GROUND_LEVEL: f32 = -0.28;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.05;
    pub const BALL_START_X: f32 = 0.0;
    pub const BALL_START_Y: f32 = 0.9;
    /// Fraction of vertical speed kept after a ground bounce
    pub const DAMPING_FACTOR: f32 = 0.7;
    /// Rebound speed below which the ball stops (units/s)
    pub const SETTLE_THRESHOLD: f32 = 0.01;

    /// Physics ticks per sprite frame (~6 Hz animation at 60 Hz physics)
    pub const FRAME_CADENCE_TICKS: u32 = 10;

    /// Ticks a stopped ball rests before an idle-mode kick (1 second)
    pub const IDLE_KICK_DELAY_TICKS: u32 = 60;
    /// Idle-mode kick ranges
    pub const IDLE_KICK_MAX_VX: f32 = 0.6;
    pub const IDLE_KICK_MIN_VY: f32 = 2.5;
    pub const IDLE_KICK_MAX_VY: f32 = 5.0;

    /// Disc tessellation for the render adapter
    pub const DISC_SEGMENTS: u32 = 200;
}
