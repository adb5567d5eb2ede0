//! Stagehand headless demo.
//!
//! Builds the debug scene on headless collaborators and drives it with a
//! scripted pointer:
//!
//! 1. hover the first item of `test-menu`, then click its second item
//! 2. grab the menu by its background and drag it across the window
//! 3. drop it, which re-aligns the items under the new container position
//! 4. press the dump hotkeys (F1 registry, F2 event bus, F6 menus)
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 60 --dump
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use stagehand::resources::backend::InputBridge;
use stagehand::resources::config::CoreConfig;
use stagehand::resources::headless::{HeadlessAssets, HeadlessInput, HeadlessRender};
use stagehand::resources::input::Key;
use stagehand::scene::{self, SceneLog, FONTS};
use stagehand::systems::{eventbus, menu, registry};

/// Stagehand headless debug scene
#[derive(Parser)]
#[command(version, about = "Runs the stagehand debug scene on headless collaborators")]
struct Cli {
    /// INI configuration file (menu layout and window size).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of frames to run.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Print the registry, event bus and menu dumps as JSON on exit.
    #[arg(long)]
    dump: bool,
}

fn headless_assets() -> HeadlessAssets {
    FONTS.iter().fold(
        HeadlessAssets::new()
            .with_texture("box", 50.0, 70.0)
            .with_texture("cursor", 32.0, 32.0),
        |assets, font| assets.with_font(*font),
    )
}

/// Scripted pointer input for `frame`.
fn script(world: &mut World, frame: u32) {
    let mut bridge = world.resource_mut::<InputBridge>();
    let Some(input) = bridge.backend_mut::<HeadlessInput>() else {
        return;
    };
    match frame {
        // hover "Attack"
        2 => input.move_to(560.0, 310.0),
        // click "Use"; the container is under the pointer too but the
        // item click wins
        4 => input.move_to(555.0, 345.0),
        5 => input.press(),
        6 => input.release(),
        // grab the background below the items
        10 => input.move_to(640.0, 580.0),
        11 => input.press(),
        12..=30 => {
            let step = (frame - 11) as f32;
            input.move_to(640.0 + step * 5.0, 580.0 + step * 2.0);
        }
        31 => input.release(),
        40 => input.press_key(Key::F1),
        41 => input.press_key(Key::F2),
        42 => input.press_key(Key::F6),
        _ => {}
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match cli.config {
        Some(path) => CoreConfig::with_path(path),
        None => CoreConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}, using defaults", e);
    }

    let mut world = World::new();
    scene::install(
        &mut world,
        config,
        HeadlessRender::new(),
        HeadlessInput::new(),
        headless_assets(),
    )?;
    scene::setup_debug_scene(&mut world)?;

    let mut update = scene::update_schedule();
    update.initialize(&mut world)?;

    for frame in 0..cli.frames {
        script(&mut world, frame);
        update.run(&mut world);
        world.clear_trackers();
    }

    for line in &world.resource::<SceneLog>().0 {
        info!("scene: {}", line);
    }
    info!(
        "{} frames, {} managed entities, menus: {:?}",
        cli.frames,
        registry::debug(&world).instances.len(),
        menu::menu_names(&world)
    );

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&registry::debug(&world))?);
        println!("{}", serde_json::to_string_pretty(&eventbus::debug(&world))?);
        println!("{}", serde_json::to_string_pretty(&menu::debug(&world))?);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
