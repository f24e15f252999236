#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a move script against a tile-push level.

mod board;
mod level;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tilepush_core::{Command, Event};
use tilepush_world::{apply, query, World};

use crate::level::Level;

#[derive(Debug, Parser)]
#[command(name = "tilepush", about = "Replays moves on a tile-push puzzle level")]
struct CliArgs {
    /// Path to the TOML level description.
    #[arg(short, long)]
    level: PathBuf,
    /// Moves to replay: w, a, s and d step up, left, down and right.
    #[arg(short, long, default_value = "")]
    moves: String,
    /// Print the board after every step instead of only at the end.
    #[arg(long)]
    each_step: bool,
}

/// Entry point for the tile-push command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let level = Level::from_path(&args.level)?;
    let steps = script::parse(&args.moves)?;

    let mut world = World::new();
    let mut events = Vec::new();
    for command in level.setup_commands() {
        apply(&mut world, command, &mut events).context("failed to set up level")?;
    }
    log_events(&events);
    tracing::info!(
        width = query::width(&world),
        height = query::height(&world),
        steps = steps.len(),
        "level loaded"
    );

    for (index, step) in steps.into_iter().enumerate() {
        events.clear();
        let player = query::first(&world, level.player)
            .with_context(|| format!("no {} sprite left to move", level.player))?;
        let (dx, dy) = step.delta();
        apply(
            &mut world,
            Command::MoveSprite {
                sprite: player.id,
                dx,
                dy,
            },
            &mut events,
        )
        .with_context(|| format!("step {index} failed"))?;
        apply(&mut world, Command::ResetPendingDeltas, &mut events)?;
        log_events(&events);

        if args.each_step {
            println!("{}", board::render(&world));
        }
    }

    if !args.each_step {
        print!("{}", board::render(&world));
    }
    Ok(())
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::MoveRejected { sprite, dx, dy } => {
                tracing::info!(sprite = sprite.get(), dx, dy, "move rejected");
            }
            other => tracing::debug!(event = ?other, "world event"),
        }
    }
}
