//! Tilt Box headless runner
//!
//! Stands in for a display's render loop: builds a simulation from a scenario
//! file or a generated row, runs a fixed number of ticks, and reports the
//! result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tilt_box::config::Bounds;
use tilt_box::consts::*;
use tilt_box::render::InstanceBuffer;
use tilt_box::{CollisionModel, Scenario, Simulation, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "tilt-box", about = "Run the particle box headless")]
struct Args {
    /// Scenario JSON (config + particles); a row layout is generated when absent
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Config JSON used for generated layouts
    #[arg(short, long, conflicts_with = "scenario")]
    config: Option<PathBuf>,

    /// Particles in a generated layout
    #[arg(short = 'n', long, default_value_t = 2)]
    count: usize,

    /// Radius of generated particles
    #[arg(short, long, default_value_t = PARTICLE_RADIUS)]
    radius: f32,

    /// Container width override
    #[arg(long)]
    width: Option<f32>,

    /// Container height override
    #[arg(long)]
    height: Option<f32>,

    /// Collision response: impulse or momentum
    #[arg(long)]
    model: Option<String>,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Seed for scattered start velocities
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Upper bound of scattered start velocity components
    #[arg(long, default_value_t = INITIAL_SPEED)]
    initial_speed: f32,

    /// Print final particle states as JSON
    #[arg(long)]
    dump: bool,
}

fn build_scenario(args: &Args) -> Result<Scenario> {
    let mut scenario = match (&args.scenario, &args.config) {
        (Some(path), _) => Scenario::load(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        (None, config) => {
            let config = match config {
                Some(path) => SimulationConfig::load(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => SimulationConfig::default(),
            };
            Scenario::row(config, args.count, args.radius)
                .with_scatter(args.seed, args.initial_speed)
        }
    };

    if args.width.is_some() || args.height.is_some() {
        let current = scenario.config.bounds;
        scenario.config.bounds = Bounds::new(
            args.width.unwrap_or(current.width),
            args.height.unwrap_or(current.height),
        );
    }
    if let Some(model) = &args.model {
        scenario.config.collision_model = CollisionModel::from_str(model)
            .with_context(|| format!("unknown collision model {model:?}"))?;
    }

    Ok(scenario)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Tilt Box (headless) starting...");

    let scenario = build_scenario(&args)?;
    let mut sim = Simulation::from_scenario(&scenario).context("invalid scenario")?;
    sim.request_motion_permission();

    let mut frame = InstanceBuffer::with_capacity(sim.particles().len());
    let mut peak_contacts = 0;
    for _ in 0..args.ticks {
        sim.tick(&mut frame);
        let contacts = frame
            .instances()
            .iter()
            .filter(|i| i.color == tilt_box::render::colors::COLLIDING)
            .count();
        peak_contacts = peak_contacts.max(contacts);
    }

    log::info!(
        "Ran {} ticks: total speed {:.3}, momentum ({:.3}, {:.3}), peak colliding {}",
        sim.time_ticks(),
        sim.total_speed(),
        sim.total_momentum().x,
        sim.total_momentum().y,
        peak_contacts
    );

    if args.dump {
        println!("{}", serde_json::to_string_pretty(sim.particles())?);
    } else {
        for p in sim.particles() {
            println!(
                "particle {:>3}: pos ({:8.2}, {:8.2})  vel ({:6.2}, {:6.2})",
                p.id, p.pos.x, p.pos.y, p.vel.x, p.vel.y
            );
        }
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `Simulation::tick` from requestAnimationFrame
}
