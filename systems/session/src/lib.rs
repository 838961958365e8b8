#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven orchestration of the world and its systems.
//!
//! A [`Session`] owns the authoritative world together with every pure
//! system and runs them in a fixed order once per frame: spawning, enemy
//! movement and the terminal check, then targeting and firing. Player actions
//! go through the builder system and report whether the world accepted them.

use std::time::Duration;

use tower_inferno_core::{
    CellCoord, Command, Event, GameConfig, GameState, TowerKind, TowerTarget, WaveConfig,
};
use tower_inferno_rendering::{
    palette, Hud, RenderingError, Scene, SceneEnemy, SceneTile, SceneTower,
    TileGridPresentation, TowerTargetLine,
};
use tower_inferno_system_builder::{Builder, BuilderAction, BuilderInput};
use tower_inferno_system_spawning::{BoardStatus, WaveScheduler};
use tower_inferno_system_tower_targeting::TowerTargeting;
use tower_inferno_world::{self as world, query, Level, LevelError, World};
use tracing::{debug, info};

/// A single run of the game together with the systems that drive it.
#[derive(Debug)]
pub struct Session {
    world: World,
    scheduler: WaveScheduler,
    targeting: TowerTargeting,
    builder: Builder,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    frame_events: Vec<Event>,
    builder_backlog: Vec<Event>,
    beams: Vec<TowerTargetLine>,
}

impl Session {
    /// Creates a session from a run configuration.
    ///
    /// Fails when the configured level layout is invalid.
    pub fn new(config: GameConfig) -> Result<Self, LevelError> {
        let waves = config.waves;
        let world = World::from_config(config)?;
        Ok(Self::from_world(world, waves))
    }

    /// Creates a session that plays `level` with the provided configuration.
    #[must_use]
    pub fn with_level(config: GameConfig, level: Level) -> Self {
        let waves = config.waves;
        Self::from_world(World::with_level(config, level), waves)
    }

    fn from_world(world: World, waves: WaveConfig) -> Self {
        Self {
            world,
            scheduler: WaveScheduler::new(waves),
            targeting: TowerTargeting::new(),
            builder: Builder::new(),
            targets: Vec::new(),
            commands: Vec::new(),
            frame_events: Vec::new(),
            builder_backlog: Vec::new(),
            beams: Vec::new(),
        }
    }

    /// Advances the run by `dt`.
    ///
    /// Nothing happens unless the game is being played. Events produced by
    /// the frame are available through [`Session::frame_events`] until the
    /// next call.
    pub fn update(&mut self, dt: Duration) {
        self.frame_events.clear();
        self.beams.clear();

        if self.state() != GameState::Playing {
            return;
        }

        let board = self.board();
        self.scheduler
            .handle(dt, GameState::Playing, board, &mut self.commands);
        self.flush_commands();

        self.dispatch(Command::Tick { dt });

        let state = self.state();
        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting
            .handle(state, &towers, &enemies, &mut self.targets);
        self.commands
            .extend(self.targets.iter().map(TowerTarget::fire_command));

        for target in &self.targets {
            let tower = towers.get(target.tower);
            let enemy = enemies.iter().find(|enemy| enemy.id == target.enemy);
            if let (Some(tower), Some(enemy)) = (tower, enemy) {
                self.beams.push(TowerTargetLine::new(
                    target.tower,
                    target.enemy,
                    SceneTower::from_snapshot(tower).position,
                    SceneEnemy::from_snapshot(enemy).position,
                ));
            }
        }
        self.flush_commands();
    }

    /// Requests a game state transition.
    ///
    /// Entering [`GameState::Playing`] after a finished run starts a new one.
    pub fn set_state(&mut self, state: GameState) {
        let previous = self.state();
        if previous == GameState::GameOver && state == GameState::Playing {
            info!("starting a new run");
        }
        self.dispatch(Command::SetGameState { state });
        if self.state() != previous {
            debug!(?previous, current = ?self.state(), "game state changed");
        }
    }

    /// Places a tower of `kind` on `cell`.
    ///
    /// Returns `false` when the game is not being played or the world
    /// rejected the placement.
    pub fn place_tower(&mut self, cell: CellCoord, kind: TowerKind) -> bool {
        self.act(BuilderInput::new(cell, BuilderAction::Place(kind)), |event| {
            matches!(event, Event::TowerPlaced { .. })
        })
    }

    /// Upgrades the tower on `cell` by one level.
    pub fn upgrade_tower(&mut self, cell: CellCoord) -> bool {
        self.act(BuilderInput::new(cell, BuilderAction::Upgrade), |event| {
            matches!(event, Event::TowerUpgraded { .. })
        })
    }

    /// Sells the tower on `cell`, refunding part of what was spent on it.
    pub fn sell_tower(&mut self, cell: CellCoord) -> bool {
        self.act(BuilderInput::new(cell, BuilderAction::Sell), |event| {
            matches!(event, Event::TowerSold { .. })
        })
    }

    fn act<F>(&mut self, input: BuilderInput, accepted: F) -> bool
    where
        F: Fn(&Event) -> bool,
    {
        let backlog = std::mem::take(&mut self.builder_backlog);
        let world = &self.world;
        self.builder.handle(
            &backlog,
            input,
            |cell| query::tower_at(world, cell),
            &mut self.commands,
        );

        let first_event = self.frame_events.len();
        self.flush_commands();
        self.frame_events[first_event..].iter().any(accepted)
    }

    fn flush_commands(&mut self) {
        let mut commands = std::mem::take(&mut self.commands);
        for command in commands.drain(..) {
            self.dispatch(command);
        }
        self.commands = commands;
    }

    fn dispatch(&mut self, command: Command) {
        let first_event = self.frame_events.len();
        world::apply(&mut self.world, command, &mut self.frame_events);

        for event in &self.frame_events[first_event..] {
            match event {
                Event::GameStateChanged { .. } => self.builder_backlog.push(event.clone()),
                Event::GameOver { .. } => {
                    let board = self.board();
                    self.scheduler
                        .handle(Duration::ZERO, GameState::GameOver, board, &mut Vec::new());
                }
                _ => {}
            }
        }
    }

    fn board(&self) -> BoardStatus {
        BoardStatus {
            wave: query::wave(&self.world),
            live_enemies: query::live_enemy_count(&self.world),
        }
    }

    /// Events produced since the start of the last [`Session::update`].
    #[must_use]
    pub fn frame_events(&self) -> &[Event] {
        &self.frame_events
    }

    /// Greeting shown when the game opens.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Read-only access to the world for richer queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> GameState {
        query::game_state(&self.world)
    }

    /// Gold available to the player.
    #[must_use]
    pub fn gold(&self) -> u32 {
        query::gold(&self.world)
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(&self) -> u32 {
        query::lives(&self.world)
    }

    /// Most recently started wave.
    #[must_use]
    pub fn wave(&self) -> u32 {
        query::wave(&self.world)
    }

    /// Points earned from kills in the current run.
    #[must_use]
    pub fn score(&self) -> u32 {
        query::score(&self.world)
    }

    /// Score recorded when the last run ended.
    #[must_use]
    pub fn final_score(&self) -> Option<u32> {
        query::final_score(&self.world)
    }

    /// Captures the current run as a scene for rendering backends.
    pub fn scene(&self) -> Result<Scene, RenderingError> {
        let level = query::level(&self.world);
        let tile_grid = TileGridPresentation::new(
            level.columns(),
            level.rows(),
            level.tile_length(),
            palette::GRID_LINES,
        )?;
        let tiles = level
            .tiles()
            .map(|(cell, kind)| SceneTile::new(cell, kind))
            .collect();
        let enemies = query::enemy_view(&self.world)
            .iter()
            .map(SceneEnemy::from_snapshot)
            .collect();
        let towers = query::tower_view(&self.world)
            .iter()
            .map(SceneTower::from_snapshot)
            .collect();
        let hud = Hud {
            gold: self.gold(),
            lives: self.lives(),
            wave: self.wave(),
            kills: query::kills(&self.world),
            score: self.score(),
            state: self.state(),
            final_score: self.final_score(),
        };

        Ok(Scene::new(
            tile_grid,
            tiles,
            enemies,
            towers,
            self.beams.clone(),
            hud,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_inferno_core::EconomyConfig;

    fn playing(gold: u32) -> Session {
        let config = GameConfig {
            economy: EconomyConfig {
                starting_gold: gold,
                starting_lives: 10,
            },
            ..GameConfig::default()
        };
        let mut session = Session::with_level(config, Level::classic());
        session.set_state(GameState::Playing);
        session
    }

    #[test]
    fn actions_are_refused_outside_of_play() {
        let mut session = Session::with_level(GameConfig::default(), Level::classic());

        assert!(!session.place_tower(CellCoord::new(0, 1), TowerKind::Basic));
        assert_eq!(session.gold(), 100);
        assert!(query::tower_view(session.world()).is_empty());
    }

    #[test]
    fn placement_reports_world_verdict() {
        let mut session = playing(250);

        assert!(session.place_tower(CellCoord::new(0, 1), TowerKind::Basic));
        assert!(!session.place_tower(CellCoord::new(0, 1), TowerKind::Basic));
        assert!(!session.place_tower(CellCoord::new(0, 0), TowerKind::Basic));
        assert_eq!(session.gold(), 150);
    }

    #[test]
    fn upgrade_and_sell_resolve_the_hovered_tower() {
        let mut session = playing(300);
        let cell = CellCoord::new(3, 3);

        assert!(!session.upgrade_tower(cell));
        assert!(session.place_tower(cell, TowerKind::Basic));
        assert!(session.upgrade_tower(cell));
        assert_eq!(session.gold(), 150);

        assert!(session.sell_tower(cell));
        assert_eq!(session.gold(), 225);
        assert!(!session.sell_tower(cell));
    }

    #[test]
    fn builder_notices_game_over_between_actions() {
        let mut session = playing(500);
        session.set_state(GameState::GameOver);

        assert!(!session.place_tower(CellCoord::new(3, 3), TowerKind::Basic));
        assert_eq!(session.final_score(), Some(0));
        assert_eq!(session.gold(), 500);
    }

    #[test]
    fn update_is_inert_in_menus() {
        let mut session = Session::with_level(GameConfig::default(), Level::classic());
        session.update(Duration::from_secs(5));

        assert!(session.frame_events().is_empty());
        assert_eq!(session.wave(), 0);
    }

    #[test]
    fn scene_mirrors_the_board() {
        let mut session = playing(200);
        assert!(session.place_tower(CellCoord::new(1, 1), TowerKind::Basic));
        let scene = session.scene().expect("classic level renders");
        let level = Level::classic();

        assert_eq!(
            scene.tiles.len(),
            (level.columns() * level.rows()) as usize
        );
        assert_eq!(scene.towers.len(), 1);
        assert_eq!(scene.hud.gold, 100);
        assert_eq!(scene.hud.score, 0);
        assert_eq!(scene.hud.state, GameState::Playing);
        assert!(scene.tower_at(CellCoord::new(1, 1)).is_some());
    }
}
