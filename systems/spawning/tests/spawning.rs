use std::time::Duration;

use tower_inferno_core::{Command, EnemyKind, GameConfig, GameState, SpawnPattern, WaveConfig};
use tower_inferno_system_spawning::{BoardStatus, WaveScheduler};
use tower_inferno_world::{self as world, query, World};

fn fixed_wave(quota: u32, interval_secs: f32) -> WaveConfig {
    WaveConfig {
        base_quota: quota,
        quota_per_wave: 0,
        base_spawn_interval: interval_secs,
        spawn_interval_decrement: 0.0,
        min_spawn_interval: 0.0,
        ..WaveConfig::default()
    }
}

fn empty_board(wave: u32) -> BoardStatus {
    BoardStatus {
        wave,
        live_enemies: 0,
    }
}

fn spawn_count(commands: &[Command]) -> usize {
    commands
        .iter()
        .filter(|command| matches!(command, Command::SpawnEnemy { .. }))
        .count()
}

#[test]
fn first_wave_spawns_exactly_its_quota_in_ten_seconds() {
    let mut scheduler = WaveScheduler::new(fixed_wave(5, 2.0));
    let mut commands = Vec::new();

    for second in 0..10 {
        let board = BoardStatus {
            wave: 1,
            live_enemies: spawn_count(&commands),
        };
        let board = if second == 0 { empty_board(0) } else { board };
        scheduler.handle(
            Duration::from_secs(1),
            GameState::Playing,
            board,
            &mut commands,
        );
    }

    assert_eq!(commands[0], Command::BeginWave { wave: 1, quota: 5 });
    assert_eq!(spawn_count(&commands), 5);
    assert!(!scheduler.is_spawning());
}

#[test]
fn large_steps_emit_several_spawns_but_never_exceed_the_quota() {
    let mut scheduler = WaveScheduler::new(fixed_wave(3, 0.5));
    let mut commands = Vec::new();

    scheduler.handle(
        Duration::from_secs(10),
        GameState::Playing,
        empty_board(0),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![
            Command::BeginWave { wave: 1, quota: 3 },
            Command::SpawnEnemy {
                kind: EnemyKind::Fast
            },
            Command::SpawnEnemy {
                kind: EnemyKind::Basic
            },
            Command::SpawnEnemy {
                kind: EnemyKind::Basic
            },
        ]
    );
}

#[test]
fn next_wave_waits_for_an_empty_board() {
    let mut scheduler = WaveScheduler::new(fixed_wave(1, 1.0));
    let mut commands = Vec::new();

    scheduler.handle(
        Duration::from_secs(1),
        GameState::Playing,
        empty_board(0),
        &mut commands,
    );
    assert_eq!(spawn_count(&commands), 1);
    commands.clear();

    let crowded = BoardStatus {
        wave: 1,
        live_enemies: 1,
    };
    for _ in 0..5 {
        scheduler.handle(
            Duration::from_secs(1),
            GameState::Playing,
            crowded,
            &mut commands,
        );
    }
    assert!(commands.is_empty());

    scheduler.handle(
        Duration::from_secs(1),
        GameState::Playing,
        empty_board(1),
        &mut commands,
    );
    assert_eq!(commands[0], Command::BeginWave { wave: 2, quota: 1 });
}

#[test]
fn menus_pause_and_game_over_resets_the_wave() {
    let mut scheduler = WaveScheduler::new(fixed_wave(4, 1.0));
    let mut commands = Vec::new();

    scheduler.handle(
        Duration::from_millis(500),
        GameState::Playing,
        empty_board(0),
        &mut commands,
    );
    assert!(scheduler.is_spawning());

    scheduler.handle(
        Duration::from_secs(30),
        GameState::Menu,
        empty_board(1),
        &mut commands,
    );
    assert_eq!(spawn_count(&commands), 0);
    assert!(scheduler.is_spawning());

    scheduler.handle(
        Duration::from_millis(500),
        GameState::Playing,
        empty_board(1),
        &mut commands,
    );
    assert_eq!(spawn_count(&commands), 1);

    scheduler.handle(
        Duration::ZERO,
        GameState::GameOver,
        empty_board(1),
        &mut commands,
    );
    assert!(!scheduler.is_spawning());
}

#[test]
fn tiered_pattern_replays_identically_for_the_same_seed() {
    let config = WaveConfig {
        pattern: SpawnPattern::Tiered,
        seed: 0xdead_beef,
        ..fixed_wave(40, 0.1)
    };

    let first = replay(config, 12);
    let second = replay(config, 12);

    assert_eq!(first, second);
    assert_eq!(spawn_count(&first), 40);
    assert!(first
        .iter()
        .any(|command| *command == Command::SpawnEnemy { kind: EnemyKind::Fast }));
}

fn replay(config: WaveConfig, previous_wave: u32) -> Vec<Command> {
    let mut scheduler = WaveScheduler::new(config);
    let mut commands = Vec::new();
    for _ in 0..60 {
        scheduler.handle(
            Duration::from_millis(100),
            GameState::Playing,
            BoardStatus {
                wave: previous_wave,
                live_enemies: 0,
            },
            &mut commands,
        );
        if !scheduler.is_spawning() {
            break;
        }
    }
    commands
}

#[test]
fn scheduled_waves_populate_the_world() {
    let config = GameConfig {
        waves: fixed_wave(5, 2.0),
        ..GameConfig::default()
    };
    let mut world = World::with_level(config.clone(), world::Level::classic());
    let mut scheduler = WaveScheduler::new(config.waves);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetGameState {
            state: GameState::Playing,
        },
        &mut events,
    );

    let mut spawned = 0;
    for _ in 0..10 {
        let mut commands = Vec::new();
        scheduler.handle(
            Duration::from_secs(1),
            query::game_state(&world),
            BoardStatus {
                wave: query::wave(&world),
                live_enemies: query::live_enemy_count(&world),
            },
            &mut commands,
        );
        spawned += spawn_count(&commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    assert_eq!(query::wave(&world), 1);
    assert_eq!(spawned, 5);
    assert_eq!(query::live_enemy_count(&world), 5);
}
