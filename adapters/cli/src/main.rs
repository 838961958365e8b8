#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Tower Inferno run.

mod config;
mod console;
mod scores;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tower_inferno_core::{CellCoord, GameState};
use tower_inferno_rendering::{palette, FrameInput, Presentation, RenderingBackend, Scene};
use tower_inferno_session::Session;
use tracing::{info, warn};

use config::TowerOrder;
use console::ConsoleBackend;

/// Command-line arguments accepted by the Tower Inferno binary.
#[derive(Debug, Parser)]
#[command(name = "tower-inferno", about = "Plays a headless Tower Inferno run")]
struct CliArgs {
    /// TOML file with economy, wave and level settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the wave seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 7_200)]
    frames: u64,
    /// Simulated milliseconds per frame.
    #[arg(long = "dt-ms", default_value_t = 16)]
    dt_ms: u64,
    /// Tower to build before the first wave, as `kind:column,row`. Repeatable.
    #[arg(long = "tower", value_parser = config::parse_tower_order)]
    towers: Vec<TowerOrder>,
    /// Tower to upgrade once after the builds, as `column,row`. Repeatable.
    #[arg(long = "upgrade", value_parser = config::parse_cell)]
    upgrades: Vec<CellCoord>,
    /// Prints a status line every N frames; zero disables progress output.
    #[arg(long, default_value_t = 600)]
    report_every: u64,
    /// Prints the final board as text.
    #[arg(long)]
    show_board: bool,
    /// JSON score file the final score is appended to when the run ends.
    #[arg(long)]
    scores: Option<PathBuf>,
}

/// Entry point for the Tower Inferno command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = config::load(args.config.as_deref(), args.seed)?;
    let mut session = Session::new(config).context("invalid level layout")?;
    let scene = session.scene().context("failed to capture the opening scene")?;
    let script = build_script(&scene, &args.towers, &args.upgrades);
    let banner = session.welcome_banner();
    let presentation = Presentation::new(banner, palette::BACKGROUND, scene);

    let stdout = io::stdout();
    let backend = ConsoleBackend::new(stdout.lock(), args.frames, Duration::from_millis(args.dt_ms))
        .with_reports(args.report_every)
        .with_board(args.show_board)
        .with_script(script);

    backend.run(presentation, |dt, input, scene| {
        play_frame(&mut session, dt, input, scene)
    })?;

    match session.final_score() {
        Some(score) => {
            info!(score, "run finished");
            if let Some(path) = &args.scores {
                let board = scores::append(path, score)?;
                println!("High scores:");
                for (rank, score) in board.scores().iter().take(10).enumerate() {
                    println!("{:>3}. {score}", rank + 1);
                }
            }
        }
        None => info!(
            wave = session.wave(),
            lives = session.lives(),
            "frame budget exhausted before the run ended"
        ),
    }

    Ok(())
}

/// Starts the run on the first frame, then issues one build or upgrade per frame.
fn build_script(scene: &Scene, towers: &[TowerOrder], upgrades: &[CellCoord]) -> Vec<FrameInput> {
    let grid = &scene.tile_grid;
    let start = FrameInput {
        state_request: Some(GameState::Playing),
        ..FrameInput::default()
    };
    let builds = towers.iter().map(|order| FrameInput {
        cursor_world_space: Some(grid.cell_center(order.cell)),
        place: Some(order.kind),
        ..FrameInput::default()
    });
    let upgrades = upgrades.iter().map(|cell| FrameInput {
        cursor_world_space: Some(grid.cell_center(*cell)),
        upgrade_action: true,
        ..FrameInput::default()
    });

    std::iter::once(start).chain(builds).chain(upgrades).collect()
}

fn play_frame(session: &mut Session, dt: Duration, input: FrameInput, scene: &mut Scene) {
    if let Some(state) = input.state_request {
        session.set_state(state);
    }

    if let Some(cell) = input
        .cursor_world_space
        .and_then(|position| scene.tile_grid.cell_at(position))
    {
        if let Some(kind) = input.place {
            if !session.place_tower(cell, kind) {
                warn!(?kind, column = cell.column(), row = cell.row(), "tower not built");
            }
        }
        if input.upgrade_action && !session.upgrade_tower(cell) {
            warn!(column = cell.column(), row = cell.row(), "tower not upgraded");
        }
        if input.sell_action && !session.sell_tower(cell) {
            warn!(column = cell.column(), row = cell.row(), "tower not sold");
        }
    }

    session.update(dt);
    match session.scene() {
        Ok(next) => *scene = next,
        Err(error) => warn!(%error, "scene capture failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_inferno_core::{GameConfig, TowerKind};

    #[test]
    fn script_starts_the_run_before_building() {
        let session = Session::new(GameConfig::default()).expect("default level");
        let scene = session.scene().expect("scene");
        let towers = [TowerOrder {
            kind: TowerKind::Ice,
            cell: CellCoord::new(2, 3),
        }];

        let script = build_script(&scene, &towers, &[CellCoord::new(2, 3)]);

        assert_eq!(script.len(), 3);
        assert_eq!(script[0].state_request, Some(GameState::Playing));
        assert_eq!(script[1].place, Some(TowerKind::Ice));
        let cursor = script[1].cursor_world_space.expect("cursor");
        assert_eq!(scene.tile_grid.cell_at(cursor), Some(CellCoord::new(2, 3)));
        assert!(script[2].upgrade_action);
    }

    #[test]
    fn scripted_frames_drive_the_session() {
        let mut session = Session::new(GameConfig::default()).expect("default level");
        let mut scene = session.scene().expect("scene");
        let towers = [TowerOrder {
            kind: TowerKind::Basic,
            cell: CellCoord::new(2, 3),
        }];

        for input in build_script(&scene.clone(), &towers, &[]) {
            play_frame(&mut session, Duration::from_millis(16), input, &mut scene);
        }

        assert_eq!(scene.hud.state, GameState::Playing);
        assert_eq!(scene.towers.len(), 1);
        assert_eq!(scene.hud.gold, 0);
    }

    #[test]
    fn arguments_parse_repeated_towers() {
        let args = CliArgs::try_parse_from([
            "tower-inferno",
            "--tower",
            "fire:1,1",
            "--tower",
            "ice:2,2",
            "--upgrade",
            "1,1",
            "--frames",
            "10",
        ])
        .expect("arguments parse");

        assert_eq!(args.towers.len(), 2);
        assert_eq!(args.upgrades, vec![CellCoord::new(1, 1)]);
        assert_eq!(args.frames, 10);
        assert_eq!(args.dt_ms, 16);
    }
}
