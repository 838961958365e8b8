use std::time::Duration;

use tower_inferno_core::{CellCoord, EconomyConfig, Event, GameConfig, GameState, TowerKind};
use tower_inferno_session::Session;
use tower_inferno_world::{query, Level};

const FRAME: Duration = Duration::from_millis(100);

fn session_with_gold(gold: u32) -> Session {
    let config = GameConfig {
        economy: EconomyConfig {
            starting_gold: gold,
            starting_lives: 10,
        },
        ..GameConfig::default()
    };
    Session::with_level(config, Level::classic())
}

fn run_until_game_over(session: &mut Session, max_frames: usize) -> Vec<Event> {
    let mut log = Vec::new();
    for _ in 0..max_frames {
        session.update(FRAME);
        log.extend_from_slice(session.frame_events());
        if session.state() == GameState::GameOver {
            break;
        }
    }
    log
}

#[test]
fn undefended_run_ends_without_score() {
    let mut session = session_with_gold(100);
    session.set_state(GameState::Playing);

    let log = run_until_game_over(&mut session, 3_000);

    assert_eq!(session.state(), GameState::GameOver);
    assert_eq!(session.lives(), 0);
    assert_eq!(session.gold(), 100);
    assert_eq!(session.final_score(), Some(0));
    let escapes = log
        .iter()
        .filter(|event| matches!(event, Event::EnemyEscaped { .. }))
        .count();
    assert_eq!(escapes, 10);
    assert_eq!(
        log.iter()
            .filter(|event| matches!(event, Event::GameOver { .. }))
            .count(),
        1
    );

    session.update(FRAME);
    assert!(session.frame_events().is_empty());
}

#[test]
fn restarting_after_game_over_begins_from_the_first_wave() {
    let mut session = session_with_gold(100);
    session.set_state(GameState::Playing);
    let _ = run_until_game_over(&mut session, 3_000);
    assert!(session.wave() >= 2);

    session.set_state(GameState::Playing);
    assert_eq!(session.gold(), 100);
    assert_eq!(session.lives(), 10);
    assert_eq!(session.final_score(), None);

    session.update(FRAME);
    let quota = GameConfig::default().waves.quota(1);
    assert!(session
        .frame_events()
        .contains(&Event::WaveStarted { wave: 1, quota }));
    assert_eq!(quota, 7);
    assert!(session.place_tower(CellCoord::new(2, 2), TowerKind::Basic));
}

#[test]
fn defended_route_kills_enemies_and_pays_bounties() {
    let mut session = session_with_gold(1_400);
    session.set_state(GameState::Playing);
    for column in 0..10 {
        assert!(session.place_tower(CellCoord::new(column, 1), TowerKind::Basic));
    }
    for row in 2..6 {
        assert!(session.place_tower(CellCoord::new(9, row), TowerKind::Basic));
    }
    assert_eq!(session.gold(), 0);

    let mut fired = false;
    let mut beams = false;
    for _ in 0..150 {
        session.update(FRAME);
        fired |= session
            .frame_events()
            .iter()
            .any(|event| matches!(event, Event::TowerFired { .. }));
        beams |= !session.scene().expect("scene").tower_targets.is_empty();
    }

    assert!(fired);
    assert!(beams);
    assert!(query::kills(session.world()) > 0);
    assert!(session.gold() > 0);
    assert!(session.score() >= 10 * query::kills(session.world()));
    assert_eq!(
        session.scene().expect("scene").hud.score,
        session.score()
    );
}

#[test]
fn identical_inputs_replay_identically() {
    let script = |session: &mut Session| {
        session.set_state(GameState::Playing);
        let _ = session.place_tower(CellCoord::new(4, 1), TowerKind::Fire);
        let mut log = Vec::new();
        for frame in 0..400 {
            if frame == 120 {
                let _ = session.upgrade_tower(CellCoord::new(4, 1));
            }
            session.update(FRAME);
            log.extend_from_slice(session.frame_events());
        }
        log
    };

    let first = script(&mut session_with_gold(300));
    let second = script(&mut session_with_gold(300));

    assert_eq!(first, second);
}

#[test]
fn pausing_in_the_menu_freezes_the_board() {
    let mut session = session_with_gold(100);
    session.set_state(GameState::Playing);
    for _ in 0..30 {
        session.update(FRAME);
    }
    let before = query::enemy_view(session.world()).into_vec();

    session.set_state(GameState::Menu);
    for _ in 0..30 {
        session.update(FRAME);
    }

    assert_eq!(query::enemy_view(session.world()).into_vec(), before);
}
