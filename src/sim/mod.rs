//! Deterministic simulation module
//!
//! All ball behavior lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod integrate;
pub mod state;
pub mod tick;

pub use animation::FrameAnimator;
pub use collision::{GroundContact, rebound_settles, resolve_ground};
pub use integrate::integrate;
pub use state::{Ball, BallSnapshot, BallState, SpriteView};
pub use tick::{BallEvent, Scene, TickInput, tick};
