//! Bouncing Ball entry point
//!
//! Runs the ball simulation headless at a fixed timestep and logs what it
//! does. Windowing and GPU output are left to the embedding scene; the
//! library's `renderer` module is the drawing side.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, Result};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(author, version, about = "Simulate a bouncing sprite ball", long_about = None)]
struct Args {
    /// JSON tuning file (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the effective config as JSON and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
    /// Number of fixed ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Seed for idle-mode kicks
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Kick the ball again whenever it has rested for a second
    #[arg(long)]
    idle: bool,
    /// Initial kick as `vx,vy`
    #[arg(long, value_parser = parse_kick, allow_hyphen_values = true)]
    kick: Option<glam::Vec2>,
    /// Number of sprite frames
    #[arg(long, default_value_t = 4)]
    frames: usize,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_kick(s: &str) -> Result<glam::Vec2, String> {
    let (vx, vy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `vx,vy`, got `{s}`"))?;
    let vx: f32 = vx.trim().parse().map_err(|e| format!("bad vx: {e}"))?;
    let vy: f32 = vy.trim().parse().map_err(|e| format!("bad vy: {e}"))?;
    if !(vx.is_finite() && vy.is_finite()) {
        return Err("kick velocity must be finite".to_string());
    }
    Ok(glam::Vec2::new(vx, vy))
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    use bouncing_ball::sim::{BallEvent, TickInput};
    use bouncing_ball::{Ball, BallConfig, Scene};

    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BallConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BallConfig::default(),
    };

    if let Some(path) = &args.write_config {
        std::fs::write(path, config.to_json())
            .with_context(|| format!("writing config {}", path.display()))?;
        log::info!("Wrote config to {}", path.display());
        return Ok(());
    }

    let frame_ids = (0..args.frames).map(|i| format!("ball_{i}.png"));
    let ball = Ball::new(config, frame_ids).context("creating ball")?;
    let mut scene = Scene::new(ball, args.seed);
    log::info!(
        "Bouncing Ball starting: {} ticks, seed {}, idle {}",
        args.ticks,
        args.seed,
        args.idle
    );

    let mut input = TickInput {
        kick: args.kick,
        idle_mode: args.idle,
    };
    for _ in 0..args.ticks {
        let events = scene.step(&input);
        input.kick = None;

        for event in events {
            match event {
                BallEvent::Kicked { vel } => {
                    log::info!("[{}] kicked ({:.3}, {:.3})", scene.time_ticks(), vel.x, vel.y)
                }
                BallEvent::Bounced {
                    impact_speed,
                    rebound_speed,
                } => log::info!(
                    "[{}] bounce {impact_speed:.4} -> {rebound_speed:.4}",
                    scene.time_ticks()
                ),
                BallEvent::Settled { pos } => {
                    log::info!("[{}] settled at ({:.3}, {:.3})", scene.time_ticks(), pos.x, pos.y)
                }
                BallEvent::FrameAdvanced { frame } => {
                    log::debug!("[{}] frame {frame}", scene.time_ticks())
                }
            }
        }
    }

    let snapshot = serde_json::to_string(&scene.snapshot()).context("serializing snapshot")?;
    println!("{snapshot}");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser embeds the library directly; there is no wasm binary entry point
}
