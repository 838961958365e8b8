#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler responsible for starting waves and emitting enemy spawn commands.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tower_inferno_core::{Command, EnemyKind, GameState, SpawnPattern, WaveConfig};

/// Board information the scheduler needs each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardStatus {
    /// Number of the most recently started wave, zero before the first.
    pub wave: u32,
    /// Enemies currently on the board.
    pub live_enemies: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Spawning {
        wave: u32,
        quota: u32,
        spawned: u32,
        interval: Duration,
        accumulator: Duration,
    },
}

/// Pure system that paces waves and chooses the kind of every spawned enemy.
#[derive(Debug)]
pub struct WaveScheduler {
    config: WaveConfig,
    phase: Phase,
    rng: ChaCha8Rng,
}

impl WaveScheduler {
    /// Creates an idle scheduler using the supplied wave configuration.
    #[must_use]
    pub fn new(config: WaveConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Reports whether a wave is still spawning enemies.
    #[must_use]
    pub fn is_spawning(&self) -> bool {
        matches!(self.phase, Phase::Spawning { .. })
    }

    /// Advances the scheduler by `dt` and emits wave and spawn commands.
    ///
    /// A new wave starts once the board is empty and no wave is spawning.
    /// The frame that starts a wave already counts toward its first spawn.
    pub fn handle(
        &mut self,
        dt: Duration,
        state: GameState,
        board: BoardStatus,
        out: &mut Vec<Command>,
    ) {
        match state {
            GameState::Playing => {}
            GameState::GameOver => {
                self.phase = Phase::Idle;
                return;
            }
            GameState::Menu | GameState::Scores => return,
        }

        if self.phase == Phase::Idle {
            if board.live_enemies > 0 {
                return;
            }
            let wave = board.wave.saturating_add(1);
            let quota = self.config.quota(wave);
            out.push(Command::BeginWave { wave, quota });
            self.phase = Phase::Spawning {
                wave,
                quota,
                spawned: 0,
                interval: self.config.spawn_interval(wave),
                accumulator: Duration::ZERO,
            };
        }

        let Phase::Spawning {
            wave,
            quota,
            mut spawned,
            interval,
            mut accumulator,
        } = self.phase
        else {
            return;
        };

        accumulator = accumulator.saturating_add(dt);
        while spawned < quota && (interval.is_zero() || accumulator >= interval) {
            accumulator = accumulator.saturating_sub(interval);
            let kind = self.choose_kind(wave, spawned);
            out.push(Command::SpawnEnemy { kind });
            spawned += 1;
        }

        self.phase = if spawned >= quota {
            Phase::Idle
        } else {
            Phase::Spawning {
                wave,
                quota,
                spawned,
                interval,
                accumulator,
            }
        };
    }

    fn choose_kind(&mut self, wave: u32, spawned: u32) -> EnemyKind {
        match self.config.pattern {
            SpawnPattern::Cycle => {
                if spawned % 3 == 0 {
                    EnemyKind::Fast
                } else {
                    EnemyKind::Basic
                }
            }
            SpawnPattern::Tiered => tiered_kind(wave, &mut self.rng),
        }
    }
}

/// Picks an enemy kind from the wave-gated table.
fn tiered_kind<R: Rng>(wave: u32, rng: &mut R) -> EnemyKind {
    match wave {
        0..=2 => EnemyKind::Basic,
        3..=5 => {
            if rng.gen_range(0..4) == 0 {
                EnemyKind::Fast
            } else {
                EnemyKind::Basic
            }
        }
        6..=9 => match rng.gen_range(0..10) {
            0..=1 => EnemyKind::Tank,
            2..=4 => EnemyKind::Fast,
            _ => EnemyKind::Basic,
        },
        _ => {
            let roll = rng.gen_range(0..100);
            if wave % 10 == 0 {
                EnemyKind::Boss
            } else if roll < 10 {
                EnemyKind::Tank
            } else if roll < 30 {
                EnemyKind::Fast
            } else if roll < 40 && wave > 15 {
                EnemyKind::Flying
            } else {
                EnemyKind::Basic
            }
        }
    }
}
