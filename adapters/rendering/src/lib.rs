#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tower Inferno adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use tower_inferno_core::{
    CellCoord, EnemyId, EnemyKind, EnemySnapshot, GameState, TileKind, TowerId, TowerKind,
    TowerSnapshot, WorldPoint,
};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fixed colors used by every backend so scenes look alike across adapters.
pub mod palette {
    use super::Color;

    /// Clear color behind the board.
    pub const BACKGROUND: Color = Color::from_rgb_u8(18, 18, 24);
    /// Buildable ground tiles.
    pub const GROUND: Color = Color::from_rgb_u8(52, 94, 44);
    /// Tiles that belong to the enemy path.
    pub const PATH: Color = Color::from_rgb_u8(150, 118, 74);
    /// Grid line color.
    pub const GRID_LINES: Color = Color::from_rgb_u8(34, 60, 30);
    /// Tint applied over burning enemies.
    pub const BURN_TINT: Color = Color::from_rgb_u8(255, 120, 20);
    /// Tint applied over frozen enemies.
    pub const FREEZE_TINT: Color = Color::from_rgb_u8(140, 200, 255);
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in world units.
    pub cursor_world_space: Option<Vec2>,
    /// Tower kind the player asked to place under the cursor on this frame.
    pub place: Option<TowerKind>,
    /// Whether the player asked to upgrade the tower under the cursor.
    pub upgrade_action: bool,
    /// Whether the player asked to sell the tower under the cursor.
    pub sell_action: bool,
    /// Game state transition requested by the player on this frame.
    pub state_request: Option<GameState>,
}

/// Describes the square tile grid the board is drawn on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl TileGridPresentation {
    /// Creates a new tile grid descriptor.
    ///
    /// Returns an error when `tile_length` is not a positive finite number.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        line_color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            line_color,
        })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Centre of the provided cell in world units.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            (cell.column() as f32 + 0.5) * self.tile_length,
            (cell.row() as f32 + 0.5) * self.tile_length,
        )
    }

    /// Resolves the cell under a world-space position.
    ///
    /// Returns `None` when the position lies outside the grid.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        if position.x >= self.width() || position.y >= self.height() {
            return None;
        }

        let column = (position.x / self.tile_length).floor() as u32;
        let row = (position.y / self.tile_length).floor() as u32;
        Some(CellCoord::new(column, row))
    }
}

/// Single grid tile with its classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneTile {
    /// Grid location of the tile.
    pub cell: CellCoord,
    /// Whether the tile is ground or part of the path, and its shape.
    pub kind: TileKind,
}

impl SceneTile {
    /// Creates a new tile descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: TileKind) -> Self {
        Self { cell, kind }
    }

    /// Fill color for the tile.
    #[must_use]
    pub const fn color(&self) -> Color {
        match self.kind {
            TileKind::Ground => palette::GROUND,
            TileKind::Path(_) => palette::PATH,
        }
    }
}

/// Enemy rendered as a filled circle with a health bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Centre of the enemy in world units.
    pub position: Vec2,
    /// Remaining health as a fraction of maximum health.
    pub health_ratio: f32,
    /// Whether a burn effect is active.
    pub burning: bool,
    /// Whether a freeze effect is active.
    pub frozen: bool,
}

impl SceneEnemy {
    /// Builds a scene enemy from a world snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &EnemySnapshot) -> Self {
        Self {
            id: snapshot.id,
            kind: snapshot.kind,
            position: to_vec2(snapshot.position),
            health_ratio: snapshot.health_ratio(),
            burning: snapshot.burning,
            frozen: snapshot.frozen,
        }
    }

    /// Body color, tinted by active status effects.
    #[must_use]
    pub fn color(&self) -> Color {
        let base = match self.kind {
            EnemyKind::Basic => Color::from_rgb_u8(200, 40, 40),
            EnemyKind::Fast => Color::from_rgb_u8(230, 200, 40),
            EnemyKind::Tank => Color::from_rgb_u8(90, 90, 110),
            EnemyKind::Flying => Color::from_rgb_u8(160, 80, 200),
            EnemyKind::Boss => Color::from_rgb_u8(120, 10, 10),
        };

        if self.burning {
            palette::BURN_TINT
        } else if self.frozen {
            palette::FREEZE_TINT.lighten(0.2)
        } else {
            base
        }
    }
}

/// Immutable snapshot describing a tower placed within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTower {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Centre of the tower in world units.
    pub position: Vec2,
    /// Current upgrade level.
    pub level: u32,
    /// Attack range in world units, used for the range overlay.
    pub range: f32,
}

impl SceneTower {
    /// Builds a scene tower from a world snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &TowerSnapshot) -> Self {
        Self {
            id: snapshot.id,
            kind: snapshot.kind,
            cell: snapshot.cell,
            position: to_vec2(snapshot.position),
            level: snapshot.level,
            range: snapshot.stats.range,
        }
    }

    /// Body color. Higher levels are drawn lighter.
    #[must_use]
    pub fn color(&self) -> Color {
        let base = match self.kind {
            TowerKind::Basic => Color::from_rgb_u8(70, 110, 200),
            TowerKind::Fire => Color::from_rgb_u8(220, 80, 20),
            TowerKind::Ice => Color::from_rgb_u8(60, 190, 220),
        };
        base.lighten(0.1 * self.level.saturating_sub(1) as f32)
    }
}

/// World-space line segment describing an active tower targeting beam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTargetLine {
    /// Identifier of the tower emitting the beam.
    pub tower: TowerId,
    /// Identifier of the enemy being tracked by the tower.
    pub enemy: EnemyId,
    /// Start of the beam.
    pub from: Vec2,
    /// End of the beam.
    pub to: Vec2,
}

impl TowerTargetLine {
    /// Creates a new tower targeting beam descriptor.
    #[must_use]
    pub fn new(tower: TowerId, enemy: EnemyId, from: Vec2, to: Vec2) -> Self {
        Self {
            tower,
            enemy,
            from,
            to,
        }
    }
}

/// Economy counters and run state shown alongside the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Gold available to the player.
    pub gold: u32,
    /// Lives remaining.
    pub lives: u32,
    /// Most recently started wave.
    pub wave: u32,
    /// Enemies killed during the run.
    pub kills: u32,
    /// Points earned from kills so far.
    pub score: u32,
    /// Current game state.
    pub state: GameState,
    /// Score recorded when the run ended.
    pub final_score: Option<u32>,
}

/// Scene description combining the tile grid and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that composes the play area.
    pub tile_grid: TileGridPresentation,
    /// Every tile of the grid in row-major order.
    pub tiles: Vec<SceneTile>,
    /// Live enemies ordered by identifier.
    pub enemies: Vec<SceneEnemy>,
    /// Towers ordered by identifier.
    pub towers: Vec<SceneTower>,
    /// Targeting beams of towers that fired on the last frame.
    pub tower_targets: Vec<TowerTargetLine>,
    /// Counters drawn on the heads-up display.
    pub hud: Hud,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        tile_grid: TileGridPresentation,
        tiles: Vec<SceneTile>,
        enemies: Vec<SceneEnemy>,
        towers: Vec<SceneTower>,
        tower_targets: Vec<TowerTargetLine>,
        hud: Hud,
    ) -> Self {
        Self {
            tile_grid,
            tiles,
            enemies,
            towers,
            tower_targets,
            hud,
        }
    }

    /// Returns the tower drawn at the provided cell, if any.
    #[must_use]
    pub fn tower_at(&self, cell: CellCoord) -> Option<&SceneTower> {
        self.towers.iter().find(|tower| tower.cell == cell)
    }
}

fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window or printed as a header.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tower Inferno scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and replaces the scene before
    /// it is rendered, allowing adapters to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene);
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tile length must be positive and finite to produce a drawable grid.
    InvalidTileLength {
        /// Provided tile length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(
                    f,
                    "tile_length must be positive and finite (received {tile_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_inferno_core::{Axis, PathShape};

    fn grid() -> TileGridPresentation {
        TileGridPresentation::new(6, 4, 32.0, palette::GRID_LINES).expect("valid grid")
    }

    #[test]
    fn tile_grid_creation_rejects_non_positive_tile_length_without_panicking() {
        let error = TileGridPresentation::new(10, 5, 0.0, palette::GRID_LINES)
            .expect_err("zero tile_length must be rejected");
        assert_eq!(error, RenderingError::InvalidTileLength { tile_length: 0.0 });

        assert!(TileGridPresentation::new(10, 5, f32::NAN, palette::GRID_LINES).is_err());
    }

    #[test]
    fn cell_at_resolves_positions_inside_the_grid() {
        let grid = grid();

        assert_eq!(grid.cell_at(Vec2::new(0.0, 0.0)), Some(CellCoord::new(0, 0)));
        assert_eq!(grid.cell_at(Vec2::new(70.0, 40.0)), Some(CellCoord::new(2, 1)));
        assert_eq!(grid.cell_at(Vec2::new(191.9, 127.9)), Some(CellCoord::new(5, 3)));
    }

    #[test]
    fn cell_at_rejects_positions_outside_the_grid() {
        let grid = grid();

        assert!(grid.cell_at(Vec2::new(-1.0, 10.0)).is_none());
        assert!(grid.cell_at(Vec2::new(10.0, 128.0)).is_none());
        assert!(grid.cell_at(Vec2::new(192.0, 10.0)).is_none());
    }

    #[test]
    fn cell_center_round_trips_through_cell_at() {
        let grid = grid();
        let cell = CellCoord::new(4, 2);

        assert_eq!(grid.cell_center(cell), Vec2::new(144.0, 80.0));
        assert_eq!(grid.cell_at(grid.cell_center(cell)), Some(cell));
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::from_rgb_u8(0, 0, 0).lighten(0.5);
        assert!((color.red - 0.5).abs() < f32::EPSILON);
        assert!((color.alpha - 1.0).abs() < f32::EPSILON);

        let saturated = Color::from_rgb_u8(10, 20, 30).lighten(4.0);
        for channel in [saturated.red, saturated.green, saturated.blue] {
            assert!((channel - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn upgraded_towers_are_drawn_lighter() {
        let tower = SceneTower {
            id: TowerId::new(0),
            kind: TowerKind::Fire,
            cell: CellCoord::new(1, 1),
            position: Vec2::new(48.0, 48.0),
            level: 1,
            range: 80.0,
        };
        let upgraded = SceneTower { level: 3, ..tower };

        assert!(upgraded.color().green > tower.color().green);
    }

    #[test]
    fn status_effects_tint_enemies() {
        let enemy = SceneEnemy {
            id: EnemyId::new(0),
            kind: EnemyKind::Tank,
            position: Vec2::ZERO,
            health_ratio: 1.0,
            burning: false,
            frozen: false,
        };

        assert_eq!(
            SceneEnemy {
                burning: true,
                ..enemy
            }
            .color(),
            palette::BURN_TINT
        );
        assert_ne!(
            SceneEnemy {
                frozen: true,
                ..enemy
            }
            .color(),
            enemy.color()
        );
    }

    #[test]
    fn path_tiles_use_the_path_color() {
        let tile = SceneTile::new(
            CellCoord::new(0, 0),
            TileKind::Path(PathShape::Straight(Axis::Horizontal)),
        );
        assert_eq!(tile.color(), palette::PATH);
        assert_eq!(
            SceneTile::new(CellCoord::new(0, 1), TileKind::Ground).color(),
            palette::GROUND
        );
    }

    #[test]
    fn scene_lookup_finds_towers_by_cell() {
        let tower = SceneTower {
            id: TowerId::new(3),
            kind: TowerKind::Ice,
            cell: CellCoord::new(2, 2),
            position: Vec2::new(80.0, 80.0),
            level: 1,
            range: 120.0,
        };
        let hud = Hud {
            gold: 100,
            lives: 10,
            wave: 0,
            kills: 0,
            score: 0,
            state: GameState::Menu,
            final_score: None,
        };
        let scene = Scene::new(grid(), Vec::new(), Vec::new(), vec![tower], Vec::new(), hud);

        assert_eq!(scene.tower_at(CellCoord::new(2, 2)), Some(&tower));
        assert!(scene.tower_at(CellCoord::new(0, 0)).is_none());
    }
}
