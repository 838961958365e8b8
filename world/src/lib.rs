#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tower Inferno.

mod enemies;
mod ledger;
mod level;
mod towers;

use std::time::Duration;

use tower_inferno_core::{
    sell_refund, CellCoord, Command, EffectKind, EnemyId, Event, FireError, GameConfig,
    GameState, PlacementError, SaleError, TowerId, TowerKind, UpgradeError, WaveConfig,
    WELCOME_BANNER,
};
use tracing::{debug, info};

use enemies::{Enemy, EnemyRoster};
use ledger::Ledger;
use towers::{TowerRegistry, TowerState};

pub use level::{Level, LevelError, Path, MAX_TILES};

/// Represents the authoritative Tower Inferno world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    level: Level,
    state: GameState,
    wave: u32,
    enemies: EnemyRoster,
    towers: TowerRegistry,
    ledger: Ledger,
    final_score: Option<u32>,
    elapsed: Duration,
}

impl World {
    /// Creates a world on the built-in level with default balance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_level(GameConfig::default(), Level::classic())
    }

    /// Creates a world from a run configuration.
    ///
    /// The configured level layout is validated; the built-in level is used
    /// when the configuration names none.
    pub fn from_config(config: GameConfig) -> Result<Self, LevelError> {
        let level = match &config.level {
            Some(layout) => Level::from_config(layout)?,
            None => Level::classic(),
        };
        Ok(Self::with_level(config, level))
    }

    /// Creates a world that plays `level` with the provided configuration.
    #[must_use]
    pub fn with_level(config: GameConfig, level: Level) -> Self {
        let ledger = Ledger::new(&config.economy);
        Self {
            banner: WELCOME_BANNER,
            config,
            level,
            state: GameState::Menu,
            wave: 0,
            enemies: EnemyRoster::new(),
            towers: TowerRegistry::new(),
            ledger,
            final_score: None,
            elapsed: Duration::ZERO,
        }
    }

    fn waves(&self) -> &WaveConfig {
        &self.config.waves
    }

    fn reset_run(&mut self) {
        self.wave = 0;
        self.enemies.clear();
        self.towers.clear();
        self.ledger = Ledger::new(&self.config.economy);
        self.final_score = None;
        self.elapsed = Duration::ZERO;
    }

    fn change_state(&mut self, state: GameState, out_events: &mut Vec<Event>) {
        if self.state == state {
            return;
        }

        if state == GameState::GameOver {
            self.finish_run(out_events);
            return;
        }

        if state == GameState::Playing && self.final_score.is_some() {
            self.reset_run();
        }
        self.state = state;
        out_events.push(Event::GameStateChanged { state });
    }

    fn finish_run(&mut self, out_events: &mut Vec<Event>) {
        if self.state == GameState::GameOver {
            return;
        }

        let final_score = self.ledger.score();
        self.state = GameState::GameOver;
        self.final_score = Some(final_score);
        info!(
            final_score,
            wave = self.wave,
            kills = self.ledger.kills(),
            "game over"
        );
        out_events.push(Event::GameStateChanged {
            state: GameState::GameOver,
        });
        out_events.push(Event::GameOver { final_score });
    }

    fn credit_kill(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(removed) = self.enemies.remove(enemy) else {
            return;
        };
        let bounty = removed.bounty;
        self.ledger.record_kill(bounty, removed.score_value);
        debug!(
            enemy = enemy.get(),
            kind = ?removed.kind,
            bounty,
            score = removed.score_value,
            "enemy killed"
        );
        out_events.push(Event::EnemyKilled {
            enemy,
            kind: removed.kind,
            bounty,
        });
    }

    fn advance_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        for tower in self.towers.iter_mut() {
            tower.advance(dt);
        }

        let burned: Vec<EnemyId> = self
            .enemies
            .iter_mut()
            .filter_map(|enemy| enemy.tick_effects(dt).then_some(enemy.id))
            .collect();
        for enemy in burned {
            self.credit_kill(enemy, out_events);
        }

        let path = self.level.path();
        let mut escaped = Vec::new();
        for enemy in self.enemies.iter_mut() {
            enemy.advance(path, dt);
            if enemy.has_reached_end() {
                escaped.push(enemy.id);
            }
        }

        for enemy in escaped {
            if self.enemies.remove(enemy).is_none() {
                continue;
            }
            let lives_remaining = self.ledger.remove_life();
            debug!(enemy = enemy.get(), lives_remaining, "enemy escaped");
            out_events.push(Event::EnemyEscaped {
                enemy,
                lives_remaining,
            });
            if lives_remaining == 0 {
                self.finish_run(out_events);
                break;
            }
        }
    }

    fn fire(&mut self, tower: TowerId, target: EnemyId) -> Result<(f32, bool), FireError> {
        let Some(state) = self.towers.get_mut(tower) else {
            return Err(FireError::MissingTower);
        };
        if !state.can_attack() {
            return Err(FireError::CoolingDown);
        }
        let Some(center) = self
            .enemies
            .get(target)
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.position)
        else {
            return Err(FireError::MissingTarget);
        };

        state.attack();
        let stats = state.stats;

        let killed = self
            .enemies
            .get_mut(target)
            .map_or(false, |enemy| enemy.take_damage(stats.damage));

        if stats.effect != EffectKind::None {
            let duration = stats.effect_duration();
            for enemy in self.enemies.iter_mut() {
                if enemy.is_alive() && enemy.position.distance(center) <= stats.area_radius {
                    enemy.apply_effect(stats.effect, stats.effect_power, duration);
                }
            }
        }

        Ok((stats.damage, killed))
    }

    fn place(&mut self, kind: TowerKind, cell: CellCoord) -> Result<(TowerId, u32), PlacementError> {
        let Some(tile) = self.level.tile(cell) else {
            return Err(PlacementError::OutOfBounds);
        };
        if !tile.is_buildable() {
            return Err(PlacementError::PathTile);
        }
        if self.towers.at(cell).is_some() {
            return Err(PlacementError::Occupied);
        }
        let cost = kind.cost();
        if !self.ledger.can_afford(cost) {
            return Err(PlacementError::InsufficientGold);
        }

        self.ledger.remove_gold(cost);
        let id = self.towers.allocate_id();
        let position = self.level.cell_center(cell);
        self.towers.insert(TowerState::new(id, kind, cell, position));
        Ok((id, cost))
    }

    fn upgrade(&mut self, tower: TowerId) -> Result<(u32, u32), UpgradeError> {
        let Some(state) = self.towers.get_mut(tower) else {
            return Err(UpgradeError::MissingTower);
        };
        let cost = state.kind.upgrade_cost();
        if !self.ledger.can_afford(cost) {
            return Err(UpgradeError::InsufficientGold);
        }
        if !state.upgrade() {
            return Err(UpgradeError::MaxLevel);
        }

        self.ledger.remove_gold(cost);
        state.invested = state.invested.saturating_add(cost);
        Ok((state.level, cost))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetGameState { state } => world.change_state(state, out_events),
        Command::Tick { dt } => {
            if world.state == GameState::Playing {
                world.advance_clock(dt, out_events);
            }
        }
        Command::BeginWave { wave, quota } => {
            if world.state != GameState::Playing {
                return;
            }
            world.wave = wave;
            info!(wave, quota, "wave started");
            out_events.push(Event::WaveStarted { wave, quota });
        }
        Command::SpawnEnemy { kind } => {
            if world.state != GameState::Playing {
                return;
            }
            let id = world.enemies.allocate_id();
            let wave = world.wave.max(1);
            let enemy = Enemy::spawn(id, kind, world.level.path(), world.waves(), wave);
            let position = enemy.position;
            let health = enemy.snapshot().health;
            world.enemies.insert(enemy);
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind,
                position,
                health,
            });
        }
        Command::FireTower { tower, target } => {
            if world.state != GameState::Playing {
                return;
            }
            match world.fire(tower, target) {
                Ok((damage, killed)) => {
                    out_events.push(Event::TowerFired {
                        tower,
                        target,
                        damage,
                    });
                    if killed {
                        world.credit_kill(target, out_events);
                    }
                }
                Err(reason) => out_events.push(Event::FireRejected {
                    tower,
                    target,
                    reason,
                }),
            }
        }
        Command::PlaceTower { kind, cell } => match world.place(kind, cell) {
            Ok((tower, cost)) => {
                debug!(
                    tower = tower.get(),
                    ?kind,
                    column = cell.column(),
                    row = cell.row(),
                    cost,
                    "tower placed"
                );
                out_events.push(Event::TowerPlaced {
                    tower,
                    kind,
                    cell,
                    cost,
                });
            }
            Err(reason) => {
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            }
        },
        Command::UpgradeTower { tower } => match world.upgrade(tower) {
            Ok((level, cost)) => {
                debug!(tower = tower.get(), level, cost, "tower upgraded");
                out_events.push(Event::TowerUpgraded { tower, level, cost });
            }
            Err(reason) => out_events.push(Event::TowerUpgradeRejected { tower, reason }),
        },
        Command::SellTower { tower } => match world.towers.remove(tower) {
            Some(state) => {
                let refund = sell_refund(state.invested);
                world.ledger.add_gold(refund);
                debug!(tower = tower.get(), refund, "tower sold");
                out_events.push(Event::TowerSold {
                    tower,
                    cell: state.cell,
                    refund,
                });
            }
            None => out_events.push(Event::TowerSaleRejected {
                tower,
                reason: SaleError::MissingTower,
            }),
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Level, World};
    use tower_inferno_core::{CellCoord, EnemyView, GameConfig, GameState, TowerId, TowerView};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the level layout.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Current state of the run.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Number of the most recently started wave, zero before the first.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Gold available to the player.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.ledger.gold()
    }

    /// Lives left before the run ends.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.ledger.lives()
    }

    /// Enemies killed during the run.
    #[must_use]
    pub fn kills(world: &World) -> u32 {
        world.ledger.kills()
    }

    /// Points earned from kills so far in the run.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.ledger.score()
    }

    /// Score recorded when the run ended.
    #[must_use]
    pub fn final_score(world: &World) -> Option<u32> {
        world.final_score
    }

    /// Simulated time played during the run.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Number of enemies currently on the board.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Tower occupying the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.at(cell)
    }

    /// Captures a read-only view of the enemies on the board.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }
}
