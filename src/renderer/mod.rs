//! WebGPU render adapter
//!
//! Draws the ball as a textured disc. Reads simulation state only through
//! [`crate::sim::SpriteView`]; nothing here feeds back into the simulation.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{BallRenderer, FrameImage, RenderError, projection, validate_frames};
