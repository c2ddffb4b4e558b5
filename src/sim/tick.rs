//! Fixed timestep simulation tick
//!
//! One tick is: apply any kick, advance physics, then advance animation.
//! Animation runs after physics so a ball that settles this tick does not
//! also advance its sprite.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::GroundContact;
use super::state::{Ball, BallSnapshot, BallState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Velocity to assign before the tick runs
    pub kick: Option<Vec2>,
    /// Idle/demo mode - the scene kicks a resting ball on its own
    pub idle_mode: bool,
}

/// Things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallEvent {
    Kicked { vel: Vec2 },
    Bounced { impact_speed: f32, rebound_speed: f32 },
    Settled { pos: Vec2 },
    FrameAdvanced { frame: usize },
}

/// Advance the ball by one fixed timestep
pub fn tick(ball: &mut Ball, input: &TickInput) -> Vec<BallEvent> {
    let mut events = Vec::new();

    if let Some(vel) = input.kick {
        ball.set_velocity(vel.x, vel.y);
        events.push(BallEvent::Kicked { vel });
    }

    match ball.update_physics() {
        GroundContact::Bounced {
            impact_speed,
            rebound_speed,
        } => events.push(BallEvent::Bounced {
            impact_speed,
            rebound_speed,
        }),
        GroundContact::Settled { .. } => events.push(BallEvent::Settled {
            pos: ball.position(),
        }),
        GroundContact::Airborne => {}
    }

    if let Some(frame) = ball.update_animation_frame() {
        events.push(BallEvent::FrameAdvanced { frame });
    }

    events
}

/// Owns a ball and drives it from variable frame times
#[derive(Debug, Clone)]
pub struct Scene {
    ball: Ball,
    rng: Pcg32,
    accumulator: f32,
    /// Kick received by `advance` that no tick has applied yet
    pending_kick: Option<Vec2>,
    /// Ticks run since the scene started
    time_ticks: u64,
    /// Consecutive ticks the ball has spent stopped
    rest_ticks: u32,
}

impl Scene {
    pub fn new(ball: Ball, seed: u64) -> Self {
        Self {
            ball,
            rng: Pcg32::seed_from_u64(seed),
            accumulator: 0.0,
            pending_kick: None,
            time_ticks: 0,
            rest_ticks: 0,
        }
    }

    /// Run a single fixed tick
    pub fn step(&mut self, input: &TickInput) -> Vec<BallEvent> {
        let mut input = input.clone();
        if input.idle_mode && input.kick.is_none() && self.rest_ticks >= IDLE_KICK_DELAY_TICKS {
            input.kick = Some(self.idle_kick());
        }

        let events = tick(&mut self.ball, &input);
        self.time_ticks += 1;
        self.rest_ticks = match self.ball.state() {
            BallState::Stopped => self.rest_ticks.saturating_add(1),
            BallState::Moving => 0,
        };
        events
    }

    /// Accumulate wall-clock time and run however many fixed ticks fit.
    ///
    /// A kick is held until a tick applies it, so frames shorter than one
    /// tick never lose it. Non-finite frame times count as zero.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput) -> Vec<BallEvent> {
        let dt = self.ball.config().dt;
        if frame_dt.is_finite() {
            self.accumulator += frame_dt.max(0.0);
        } else {
            log::warn!("Ignoring non-finite frame time {frame_dt}");
        }
        if input.kick.is_some() {
            self.pending_kick = input.kick;
        }

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= dt && substeps < MAX_SUBSTEPS {
            let step_input = TickInput {
                kick: self.pending_kick.take(),
                idle_mode: input.idle_mode,
            };
            events.extend(self.step(&step_input));
            self.accumulator -= dt;
            substeps += 1;
        }

        if self.accumulator >= dt {
            log::warn!(
                "Dropping {:.3}s of simulation time after {MAX_SUBSTEPS} substeps",
                self.accumulator
            );
            self.accumulator %= dt;
        }

        events
    }

    /// Random upward kick for idle mode
    fn idle_kick(&mut self) -> Vec2 {
        let vx = self.rng.random_range(-IDLE_KICK_MAX_VX..=IDLE_KICK_MAX_VX);
        let vy = self.rng.random_range(IDLE_KICK_MIN_VY..=IDLE_KICK_MAX_VY);
        Vec2::new(vx, vy)
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn snapshot(&self) -> BallSnapshot {
        self.ball.snapshot()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.ball.config().dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BallConfig;

    fn ball() -> Ball {
        Ball::new(BallConfig::default(), ["a", "b", "c"]).expect("valid ball")
    }

    #[test]
    fn test_tick_reports_bounce_and_settle() {
        let mut ball = ball();
        let input = TickInput::default();
        let mut bounces = 0;
        let mut settled = false;
        for _ in 0..1000 {
            for event in tick(&mut ball, &input) {
                match event {
                    BallEvent::Bounced { .. } => bounces += 1,
                    BallEvent::Settled { pos } => {
                        settled = true;
                        assert_eq!(pos.y, ball.ground_level());
                    }
                    _ => {}
                }
            }
            if settled {
                break;
            }
        }
        assert!(settled);
        assert!(bounces >= 2);
    }

    #[test]
    fn test_settle_tick_does_not_animate() {
        let mut ball = ball();
        let input = TickInput::default();
        loop {
            let events = tick(&mut ball, &input);
            if events.iter().any(|e| matches!(e, BallEvent::Settled { .. })) {
                assert!(
                    !events
                        .iter()
                        .any(|e| matches!(e, BallEvent::FrameAdvanced { .. }))
                );
                break;
            }
        }
    }

    #[test]
    fn test_kick_applies_before_physics() {
        let mut ball = ball();
        let input = TickInput {
            kick: Some(Vec2::new(0.5, 3.0)),
            ..Default::default()
        };
        let events = tick(&mut ball, &input);
        assert_eq!(events[0], BallEvent::Kicked { vel: Vec2::new(0.5, 3.0) });
        // Gravity has already acted on the kicked velocity
        assert!(ball.velocity().y < 3.0);
        assert_eq!(ball.velocity().x, 0.5);
    }

    #[test]
    fn test_advance_runs_fixed_ticks() {
        let mut scene = Scene::new(ball(), 1);
        let dt = scene.ball().config().dt;
        scene.advance(dt * 3.5, &TickInput::default());
        assert_eq!(scene.time_ticks(), 3);
        assert!((scene.alpha() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut scene = Scene::new(ball(), 1);
        scene.advance(10.0, &TickInput::default());
        assert_eq!(scene.time_ticks(), MAX_SUBSTEPS as u64);
        assert!(scene.alpha() < 1.0);
    }

    #[test]
    fn test_advance_applies_kick_once() {
        let mut scene = Scene::new(ball(), 1);
        let dt = scene.ball().config().dt;
        let input = TickInput {
            kick: Some(Vec2::new(0.0, 1.0)),
            ..Default::default()
        };
        let events = scene.advance(dt * 4.0, &input);
        let kicks = events
            .iter()
            .filter(|e| matches!(e, BallEvent::Kicked { .. }))
            .count();
        assert_eq!(kicks, 1);
    }

    #[test]
    fn test_kick_survives_frames_shorter_than_a_tick() {
        let mut scene = Scene::new(ball(), 1);
        for _ in 0..400 {
            scene.step(&TickInput::default());
        }
        assert_eq!(scene.ball().state(), BallState::Stopped);

        let dt = scene.ball().config().dt;
        let kick = TickInput {
            kick: Some(Vec2::new(0.0, 3.0)),
            ..Default::default()
        };
        let events = scene.advance(dt * 0.5, &kick);
        assert!(events.is_empty());

        let mut kicked = 0;
        for _ in 0..10 {
            kicked += scene
                .advance(dt * 0.5, &TickInput::default())
                .iter()
                .filter(|e| matches!(e, BallEvent::Kicked { .. }))
                .count();
        }
        assert_eq!(kicked, 1);
        assert_eq!(scene.ball().state(), BallState::Moving);
        assert!(scene.ball().position().y > scene.ball().ground_level());
    }

    #[test]
    fn test_non_finite_frame_time_is_ignored() {
        let mut scene = Scene::new(ball(), 1);
        let dt = scene.ball().config().dt;
        for bad in [f32::INFINITY, f32::NAN, f32::NEG_INFINITY] {
            assert!(scene.advance(bad, &TickInput::default()).is_empty());
        }
        assert_eq!(scene.time_ticks(), 0);
        assert_eq!(scene.alpha(), 0.0);

        for _ in 0..100 {
            scene.advance(dt, &TickInput::default());
        }
        assert!(scene.time_ticks() >= 99);
        assert!(scene.alpha().is_finite());
    }

    #[test]
    fn test_idle_mode_kicks_resting_ball() {
        let mut scene = Scene::new(ball(), 42);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut kicked = false;
        let mut was_stopped = false;
        for _ in 0..2000 {
            was_stopped |= scene.ball().state() == BallState::Stopped;
            let events = scene.step(&idle);
            if let Some(BallEvent::Kicked { vel }) = events.first() {
                assert!(was_stopped);
                assert!(vel.y >= IDLE_KICK_MIN_VY && vel.y <= IDLE_KICK_MAX_VY);
                kicked = true;
                break;
            }
        }
        assert!(kicked);
        assert_eq!(scene.ball().state(), BallState::Moving);
    }

    #[test]
    fn test_idle_kicks_are_deterministic() {
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut a = Scene::new(ball(), 7);
        let mut b = Scene::new(ball(), 7);
        for _ in 0..1500 {
            assert_eq!(a.step(&idle), b.step(&idle));
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_no_idle_kick_without_idle_mode() {
        let mut scene = Scene::new(ball(), 42);
        for _ in 0..2000 {
            scene.step(&TickInput::default());
        }
        assert_eq!(scene.ball().state(), BallState::Stopped);
    }
}
