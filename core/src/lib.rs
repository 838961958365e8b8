#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tower Inferno engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod balance;
mod config;

pub use balance::{
    sell_refund, EffectKind, EnemyKind, StatGrowth, TowerKind, TowerStats, BASIC_GROWTH,
    FIRE_GROWTH, ICE_GROWTH, SELL_REFUND_PERCENT,
};
pub use config::{EconomyConfig, GameConfig, LevelConfig, SpawnPattern, WaveConfig};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tower Inferno.";

/// Describes the overall state of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Title menu; the simulation is idle.
    Menu,
    /// Active run where waves spawn and towers attack.
    Playing,
    /// Terminal state reached once every life has been lost.
    GameOver,
    /// Score listing; the simulation is idle.
    Scores,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests that the world transition to the provided state.
    SetGameState {
        /// State the world should activate.
        state: GameState,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Announces that a new wave begins spawning.
    BeginWave {
        /// One-based number of the wave.
        wave: u32,
        /// Number of enemies the wave will spawn.
        quota: u32,
    },
    /// Requests that a new enemy enters the path.
    SpawnEnemy {
        /// Kind of enemy to create.
        kind: EnemyKind,
    },
    /// Requests that a tower attacks the provided enemy.
    FireTower {
        /// Tower performing the attack.
        tower: TowerId,
        /// Primary target of the attack.
        target: EnemyId,
    },
    /// Requests placement of a tower on the provided cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell the tower occupies.
        cell: CellCoord,
    },
    /// Requests that an existing tower gains one level.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests that an existing tower is sold for a partial refund.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the run entered a new state.
    GameStateChanged {
        /// State that became active.
        state: GameState,
    },
    /// Confirms that a wave started.
    WaveStarted {
        /// One-based number of the wave.
        wave: u32,
        /// Number of enemies the wave will spawn.
        quota: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy that spawned.
        kind: EnemyKind,
        /// World-space position of the first waypoint.
        position: WorldPoint,
        /// Health the enemy spawned with.
        health: f32,
    },
    /// Reports that an enemy died and its bounty was credited.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Kind of the enemy that died.
        kind: EnemyKind,
        /// Gold credited for the kill.
        bounty: u32,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyEscaped {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the escape was debited.
        lives_remaining: u32,
    },
    /// Confirms that a tower attacked an enemy.
    TowerFired {
        /// Tower that attacked.
        tower: TowerId,
        /// Primary target of the attack.
        target: EnemyId,
        /// Damage dealt to the primary target.
        damage: f32,
    },
    /// Reports that an attack request was rejected.
    FireRejected {
        /// Tower named in the request.
        tower: TowerId,
        /// Target named in the request.
        target: EnemyId,
        /// Specific reason the attack failed.
        reason: FireError,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Gold debited for the placement.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower gained a level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached by the tower.
        level: u32,
        /// Gold debited for the upgrade.
        cost: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted for upgrade.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Cell freed by the sale.
        cell: CellCoord,
        /// Gold credited for the sale.
        refund: u32,
    },
    /// Reports that a sale request was rejected.
    TowerSaleRejected {
        /// Identifier of the tower targeted for sale.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SaleError,
    },
    /// Announces the end of the run.
    GameOver {
        /// Score recorded for the run.
        final_score: u32,
    },
}

/// Cardinal directions on the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Vertical,
            Self::East | Self::West => Axis::Horizontal,
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Direction of a single orthogonal step from `self` to `other`.
    ///
    /// Returns `None` unless the cells are orthogonal neighbours.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        let column_diff = self.column.abs_diff(other.column);
        let row_diff = self.row.abs_diff(other.row);

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if other.column > self.column {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if other.row > self.row {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Moves toward `target` by at most `max_distance`, never overshooting it.
    #[must_use]
    pub fn step_towards(self, target: WorldPoint, max_distance: f32) -> WorldPoint {
        let distance = self.distance(target);
        if max_distance <= 0.0 {
            return self;
        }
        if distance <= max_distance || distance <= f32::EPSILON {
            return target;
        }

        let ratio = max_distance / distance;
        WorldPoint::new(
            self.x + (target.x - self.x) * ratio,
            self.y + (target.y - self.y) * ratio,
        )
    }
}

/// Axis along which a straight path tile runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Runs west to east.
    Horizontal,
    /// Runs north to south.
    Vertical,
}

/// Corner path tile named after the two sides it connects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    /// Connects the northern and eastern neighbours.
    NorthEast,
    /// Connects the northern and western neighbours.
    NorthWest,
    /// Connects the southern and eastern neighbours.
    SouthEast,
    /// Connects the southern and western neighbours.
    SouthWest,
}

impl Corner {
    /// Resolves the corner joining two perpendicular sides.
    ///
    /// Returns `None` when both sides share an axis.
    #[must_use]
    pub fn joining(first: Direction, second: Direction) -> Option<Self> {
        let (vertical, horizontal) = match (first.axis(), second.axis()) {
            (Axis::Vertical, Axis::Horizontal) => (first, second),
            (Axis::Horizontal, Axis::Vertical) => (second, first),
            _ => return None,
        };

        match (vertical, horizontal) {
            (Direction::North, Direction::East) => Some(Self::NorthEast),
            (Direction::North, Direction::West) => Some(Self::NorthWest),
            (Direction::South, Direction::East) => Some(Self::SouthEast),
            (Direction::South, Direction::West) => Some(Self::SouthWest),
            _ => None,
        }
    }
}

/// Shape of a path tile, used by renderers to pick straight or corner art.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathShape {
    /// Straight segment.
    Straight(Axis),
    /// Ninety-degree turn.
    Corner(Corner),
}

/// Classification of a single grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Buildable ground.
    Ground,
    /// Tile belonging to the enemy path.
    Path(PathShape),
}

impl TileKind {
    /// Reports whether towers may be placed on the tile.
    #[must_use]
    pub const fn is_buildable(&self) -> bool {
        matches!(self, Self::Ground)
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Current world-space position.
    pub position: WorldPoint,
    /// Remaining health.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
    /// Whether a burn effect is active.
    pub burning: bool,
    /// Whether a freeze effect is active.
    pub frozen: bool,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of the spawn health.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// World-space centre of the occupied cell.
    pub position: WorldPoint,
    /// Current level, starting at one.
    pub level: u32,
    /// Stats derived for the current level.
    pub stats: TowerStats,
    /// Whether the attack cooldown has elapsed.
    pub ready: bool,
    /// Cumulative gold spent on placement and upgrades.
    pub invested: u32,
}

/// Read-only snapshot describing all towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for the provided tower.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no towers were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Target selected for a tower during a simulation tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that will attack.
    pub tower: TowerId,
    /// Enemy selected as the primary target.
    pub enemy: EnemyId,
    /// Distance between tower and enemy in world units.
    pub distance: f32,
}

impl TowerTarget {
    /// Command that makes the tower attack its selected enemy.
    #[must_use]
    pub const fn fire_command(&self) -> Command {
        Command::FireTower {
            tower: self.tower,
            target: self.enemy,
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell belongs to the enemy path.
    #[error("cell belongs to the enemy path")]
    PathTile,
    /// Another tower already occupies the cell.
    #[error("cell is already occupied by a tower")]
    Occupied,
    /// The player cannot afford the tower.
    #[error("not enough gold")]
    InsufficientGold,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    #[error("tower does not exist")]
    MissingTower,
    /// The tower already reached its maximum level.
    #[error("tower is already at its maximum level")]
    MaxLevel,
    /// The player cannot afford the upgrade.
    #[error("not enough gold")]
    InsufficientGold,
}

/// Reasons a tower sale request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum SaleError {
    /// No tower with the provided identifier exists.
    #[error("tower does not exist")]
    MissingTower,
}

/// Reasons an attack request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum FireError {
    /// No tower with the provided identifier exists.
    #[error("tower does not exist")]
    MissingTower,
    /// The target is dead, escaped, or never existed.
    #[error("target is no longer on the board")]
    MissingTarget,
    /// The tower's cooldown has not elapsed yet.
    #[error("tower is cooling down")]
    CoolingDown,
}
