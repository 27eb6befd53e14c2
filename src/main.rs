//! Ricochet headless demo.
//!
//! Builds a small scene, fires a rocket at a shielded dummy and lobs a
//! cooking grenade at a crate, then steps the simulation and logs every
//! impact, explosion and destruction as it happens.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --seconds 4 --multiplayer
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use glam::{Quat, Vec3};
use std::path::PathBuf;

use ricochet::components::collider::{Collider, LayerMask, layers};
use ricochet::components::destructible::{ImpactParams, Launch};
use ricochet::components::health::Health;
use ricochet::components::locomotion::CharacterLocomotion;
use ricochet::components::physicsbody::PhysicsBody;
use ricochet::components::shield::Shield;
use ricochet::components::transform::Transform;
use ricochet::events::destructed::DestructedEvent;
use ricochet::events::explosion::ExplosionEvent;
use ricochet::events::impact::ImpactEvent;
use ricochet::resources::network::NetworkObjectPool;
use ricochet::resources::prefabs::PrefabLibrary;
use ricochet::resources::simconfig::SimConfig;
use ricochet::simulation::Simulation;
use ricochet::systems::grenade::start_cooking;
use ricochet::systems::pool::prewarm;

const FRAME_DT: f32 = 1.0 / 60.0;

/// Ricochet destructible projectile demo
#[derive(Parser)]
#[command(version, about = "Headless demo of destructible projectiles, grenades and explosions.")]
struct Cli {
    /// INI configuration file. Defaults are used if it does not exist.
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Prefab library in JSON.
    #[arg(long, value_name = "PATH", default_value = "assets/prefabs.json")]
    prefabs: PathBuf,

    /// Simulated seconds to run.
    #[arg(long, default_value_t = 5.0)]
    seconds: f32,

    /// Queue despawns for replication instead of only pooling locally.
    #[arg(long)]
    multiplayer: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = SimConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        log::warn!("Using default configuration: {}", e);
    }
    if cli.multiplayer {
        config.multiplayer = true;
    }

    let prefabs = match PrefabLibrary::load(&cli.prefabs) {
        Ok(prefabs) => prefabs,
        Err(e) => {
            log::error!("Failed to load prefabs from {:?}: {}", cli.prefabs, e);
            std::process::exit(1);
        }
    };

    let mut sim = Simulation::new(config, prefabs);
    register_observers(&mut sim.world);
    if let Err(e) = run_demo(&mut sim, cli.seconds) {
        log::error!("Demo aborted: {}", e);
        std::process::exit(1);
    }
}

fn register_observers(world: &mut World) {
    world.add_observer(|trigger: On<ImpactEvent>| {
        let ev = trigger.event();
        log::info!(
            "impact {:?} -> {:?}: damage {:.1} at {:?}{}",
            ev.source,
            ev.target,
            ev.damage,
            ev.point,
            if ev.explosion { " (blast)" } else { "" }
        );
    });
    world.add_observer(|trigger: On<ExplosionEvent>| {
        let ev = trigger.event();
        log::info!(
            "explosion {:?} radius {:.1} hit {} object(s)",
            ev.entity,
            ev.radius,
            ev.hits.len()
        );
    });
    world.add_observer(|trigger: On<DestructedEvent>| {
        let ev = trigger.event();
        log::info!(
            "destructed {:?} at {:?}, spawned {}",
            ev.entity,
            ev.point,
            ev.spawned.len()
        );
    });
}

fn run_demo(sim: &mut Simulation, seconds: f32) -> Result<(), ricochet::error::SimError> {
    prewarm(&mut sim.world, "rocket", 4)?;

    let shooter = sim
        .world
        .spawn((
            Transform::IDENTITY,
            Collider::new(0.5).with_layer(layers::CHARACTER),
            CharacterLocomotion::default(),
            Health::new(100.0),
        ))
        .id();
    let dummy = sim
        .world
        .spawn((
            Transform::from_translation(Vec3::new(0.0, 1.0, 12.0)),
            Collider::new(0.6),
            Shield::new(25.0),
            Health::new(100.0),
        ))
        .id();
    let crate_box = sim
        .world
        .spawn((
            Transform::from_translation(Vec3::new(2.0, 0.5, 6.0)),
            Collider::new(0.5),
            PhysicsBody::new(20.0),
        ))
        .id();

    let muzzle = Vec3::new(0.0, 1.0, 0.8);
    sim.fire(
        "rocket",
        muzzle,
        Quat::IDENTITY,
        Launch {
            velocity: Vec3::new(0.0, 0.0, 30.0),
            torque: Vec3::ZERO,
            originator: Some(shooter),
        },
        ImpactParams {
            damage: 40.0,
            impact_force: 2.0,
            impact_force_frames: 3,
            impact_layers: LayerMask::DEFAULT_OVERLAP,
            impact_state_name: Some("burning".into()),
            impact_state_disable_timer: 1.5,
            surface_impact: Some("scorch".into()),
        },
    )?;

    let grenade = sim.fire(
        "frag",
        muzzle,
        Quat::IDENTITY,
        Launch {
            velocity: Vec3::new(1.0, 4.0, 3.0),
            torque: Vec3::new(3.0, 0.0, 0.0),
            originator: Some(shooter),
        },
        ImpactParams {
            damage: 60.0,
            impact_force: 1.0,
            ..ImpactParams::default()
        },
    )?;
    start_cooking(&mut sim.world, grenade, Some(shooter))?;

    let frames = (seconds.max(0.0) / FRAME_DT).ceil() as u32;
    for _ in 0..frames {
        sim.step(FRAME_DT);
    }

    log::info!("after {:.1}s:", seconds);
    for (label, e) in [("dummy", dummy), ("shooter", shooter)] {
        if let Some(health) = sim.world.get::<Health>(e) {
            log::info!(
                "  {} health {:.1}{}",
                label,
                health.value,
                if health.is_alive() { "" } else { " (down)" }
            );
        }
    }
    if let Some(body) = sim.world.get::<PhysicsBody>(crate_box) {
        log::info!("crate accumulated force {:?}", body.total_force());
    }
    let despawns = sim.world.resource_mut::<NetworkObjectPool>().drain();
    if !despawns.is_empty() {
        log::info!("{} despawn(s) queued for replication", despawns.len());
    }
    Ok(())
}
