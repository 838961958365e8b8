use std::{collections::VecDeque, io::Write, time::Duration};

use anyhow::{Context, Result as AnyResult};
use tower_inferno_core::{Axis, GameState, PathShape, TileKind, TowerKind};
use tower_inferno_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

/// Headless backend that steps a fixed number of frames and prints progress.
#[derive(Debug)]
pub(crate) struct ConsoleBackend<W: Write> {
    writer: W,
    frames: u64,
    frame_dt: Duration,
    report_every: u64,
    show_board: bool,
    script: VecDeque<FrameInput>,
}

impl<W: Write> ConsoleBackend<W> {
    pub(crate) fn new(writer: W, frames: u64, frame_dt: Duration) -> Self {
        Self {
            writer,
            frames,
            frame_dt,
            report_every: 0,
            show_board: false,
            script: VecDeque::new(),
        }
    }

    /// Prints a status line every `frames` frames; zero disables reports.
    pub(crate) fn with_reports(mut self, frames: u64) -> Self {
        self.report_every = frames;
        self
    }

    pub(crate) fn with_board(mut self, show_board: bool) -> Self {
        self.show_board = show_board;
        self
    }

    /// Inputs replayed one per frame, starting with the first frame.
    pub(crate) fn with_script(mut self, script: impl IntoIterator<Item = FrameInput>) -> Self {
        self.script = script.into_iter().collect();
        self
    }
}

impl<W: Write> RenderingBackend for ConsoleBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene),
    {
        writeln!(self.writer, "{}", presentation.window_title).context("console closed")?;
        let mut scene = presentation.scene;

        for frame in 1..=self.frames {
            let input = self.script.pop_front().unwrap_or_default();
            update_scene(self.frame_dt, input, &mut scene);

            if self.report_every > 0 && frame % self.report_every == 0 {
                writeln!(self.writer, "{}", status_line(frame, &scene))
                    .context("console closed")?;
            }

            if scene.hud.state == GameState::GameOver {
                writeln!(self.writer, "{}", status_line(frame, &scene))
                    .context("console closed")?;
                break;
            }
        }

        if self.show_board {
            write!(self.writer, "{}", render_board(&scene)).context("console closed")?;
        }
        self.writer.flush().context("console closed")
    }
}

/// One-line summary of the heads-up display.
pub(crate) fn status_line(frame: u64, scene: &Scene) -> String {
    let hud = &scene.hud;
    let mut line = format!(
        "frame {frame:>6} | {:?} | wave {} | gold {} | lives {} | kills {} | score {} | enemies {} | towers {}",
        hud.state,
        hud.wave,
        hud.gold,
        hud.lives,
        hud.kills,
        hud.score,
        scene.enemies.len(),
        scene.towers.len(),
    );
    if let Some(score) = hud.final_score {
        line.push_str(&format!(" | final score {score}"));
    }
    line
}

/// Draws the board as text, one character per tile.
///
/// Enemies are drawn over tiles as `*`; towers show their kind initial, in
/// upper case once upgraded.
pub(crate) fn render_board(scene: &Scene) -> String {
    let columns = scene.tile_grid.columns as usize;
    let rows = scene.tile_grid.rows as usize;
    let mut cells = vec![' '; columns * rows];

    for tile in &scene.tiles {
        let index = tile.cell.row() as usize * columns + tile.cell.column() as usize;
        if let Some(slot) = cells.get_mut(index) {
            *slot = tile_glyph(tile.kind);
        }
    }

    for tower in &scene.towers {
        let index = tower.cell.row() as usize * columns + tower.cell.column() as usize;
        if let Some(slot) = cells.get_mut(index) {
            *slot = tower_glyph(tower.kind, tower.level);
        }
    }

    for enemy in &scene.enemies {
        if let Some(cell) = scene.tile_grid.cell_at(enemy.position) {
            let index = cell.row() as usize * columns + cell.column() as usize;
            if let Some(slot) = cells.get_mut(index) {
                *slot = '*';
            }
        }
    }

    let mut board = String::with_capacity((columns + 1) * rows);
    for row in cells.chunks(columns.max(1)) {
        board.extend(row);
        board.push('\n');
    }
    board
}

fn tile_glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Ground => '.',
        TileKind::Path(PathShape::Straight(Axis::Horizontal)) => '-',
        TileKind::Path(PathShape::Straight(Axis::Vertical)) => '|',
        TileKind::Path(PathShape::Corner(_)) => '+',
    }
}

fn tower_glyph(kind: TowerKind, level: u32) -> char {
    let glyph = match kind {
        TowerKind::Basic => 'h',
        TowerKind::Fire => 'f',
        TowerKind::Ice => 'i',
    };
    if level > 1 {
        glyph.to_ascii_uppercase()
    } else {
        glyph
    }
}
