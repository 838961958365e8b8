use std::time::Duration;

use tower_inferno_core::{
    CellCoord, Command, EconomyConfig, EnemyId, EnemyKind, GameConfig, GameState, TowerId,
    TowerKind, TowerTarget,
};
use tower_inferno_system_tower_targeting::TowerTargeting;
use tower_inferno_world::{self as world, query, Level, World};

#[test]
fn replay_assigns_identical_targets_across_runs() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        first.iter().any(|targets| !targets.is_empty()),
        "expected at least one frame with targets"
    );
}

#[test]
fn replayed_targets_stay_within_range_of_ready_towers() {
    let mut world = World::with_level(rich_config(), Level::classic());
    let mut targeting = TowerTargeting::new();
    let mut targets = Vec::new();

    for command in scripted_commands() {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);

        let towers = query::tower_view(&world);
        let enemies = query::enemy_view(&world);
        targeting.handle(query::game_state(&world), &towers, &enemies, &mut targets);

        for target in &targets {
            let tower = towers.get(target.tower).expect("targeting tower exists");
            let enemy = enemies
                .iter()
                .find(|enemy| enemy.id == target.enemy)
                .expect("targeted enemy exists");

            assert!(tower.ready);
            assert!(target.distance <= tower.stats.range);
            assert!((tower.position.distance(enemy.position) - target.distance).abs() < 1e-3);
        }
    }
}

#[test]
fn first_spawned_enemy_is_preferred_when_enemies_overlap() {
    let mut world = World::with_level(rich_config(), Level::classic());
    let mut targeting = TowerTargeting::new();
    let mut targets = Vec::new();
    for command in [
        Command::SetGameState {
            state: GameState::Playing,
        },
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: CellCoord::new(0, 1),
        },
        Command::SpawnEnemy {
            kind: EnemyKind::Tank,
        },
        Command::SpawnEnemy {
            kind: EnemyKind::Tank,
        },
    ] {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
    }

    targeting.handle(
        query::game_state(&world),
        &query::tower_view(&world),
        &query::enemy_view(&world),
        &mut targets,
    );

    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].tower, TowerId::new(0));
    assert_eq!(targets[0].enemy, EnemyId::new(0));
}

fn rich_config() -> GameConfig {
    GameConfig {
        economy: EconomyConfig {
            starting_gold: 1_000,
            starting_lives: 10,
        },
        ..GameConfig::default()
    }
}

fn replay(commands: Vec<Command>) -> Vec<Vec<TowerTarget>> {
    let mut world = World::with_level(rich_config(), Level::classic());
    let mut targeting = TowerTargeting::new();
    let mut current_targets = Vec::new();
    let mut assignments = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);

        targeting.handle(
            query::game_state(&world),
            &query::tower_view(&world),
            &query::enemy_view(&world),
            &mut current_targets,
        );
        assignments.push(current_targets.clone());
    }

    assignments
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::SetGameState {
            state: GameState::Playing,
        },
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: CellCoord::new(2, 1),
        },
        Command::PlaceTower {
            kind: TowerKind::Ice,
            cell: CellCoord::new(6, 1),
        },
        Command::SpawnEnemy {
            kind: EnemyKind::Basic,
        },
    ];

    for frame in 0..30 {
        if frame % 5 == 0 {
            commands.push(Command::SpawnEnemy {
                kind: EnemyKind::Fast,
            });
        }
        commands.push(Command::Tick {
            dt: Duration::from_millis(100),
        });
    }

    commands
}
