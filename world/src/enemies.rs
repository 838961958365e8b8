//! Enemy state, movement along the path and status effects.

use std::{collections::BTreeMap, time::Duration};

use tower_inferno_core::{EffectKind, EnemyId, EnemyKind, EnemySnapshot, WaveConfig, WorldPoint};

use crate::level::Path;

/// Distance at which an enemy counts as having reached its target waypoint.
pub(crate) const ARRIVAL_THRESHOLD: f32 = 4.0;

const MAX_FREEZE_POWER: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq)]
struct StatusEffect {
    power: f32,
    remaining: Duration,
}

impl StatusEffect {
    fn refreshed(current: Option<Self>, power: f32, duration: Duration) -> Self {
        match current {
            Some(effect) => Self {
                power: effect.power.max(power),
                remaining: effect.remaining.max(duration),
            },
            None => Self {
                power,
                remaining: duration,
            },
        }
    }

    /// Consumes up to `dt` of the remaining time, returning the portion used.
    fn consume(&mut self, dt: Duration) -> Duration {
        let used = self.remaining.min(dt);
        self.remaining -= used;
        used
    }

    fn expired(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Live enemy walking the path.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: WorldPoint,
    pub(crate) bounty: u32,
    pub(crate) score_value: u32,
    health: f32,
    max_health: f32,
    speed: f32,
    waypoint: usize,
    finished: bool,
    burn: Option<StatusEffect>,
    freeze: Option<StatusEffect>,
}

impl Enemy {
    /// Places a new enemy on the first waypoint of `path` with the stats of `wave`.
    pub(crate) fn spawn(
        id: EnemyId,
        kind: EnemyKind,
        path: &Path,
        waves: &WaveConfig,
        wave: u32,
    ) -> Self {
        let health = kind.base_health() * waves.health_multiplier(wave);
        Self {
            id,
            kind,
            position: path.start(),
            bounty: waves.scaled_reward(kind.bounty(), wave),
            score_value: waves.scaled_reward(kind.score_value(), wave),
            health,
            max_health: health,
            speed: kind.speed() * waves.speed_multiplier(wave),
            waypoint: 0,
            finished: path.len() < 2,
            burn: None,
            freeze: None,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub(crate) fn has_reached_end(&self) -> bool {
        self.finished
    }

    /// Subtracts `amount` from the enemy's health, clamping at zero.
    ///
    /// Returns `true` only for the hit that brings a live enemy to zero.
    pub(crate) fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        !self.is_alive()
    }

    pub(crate) fn apply_effect(&mut self, effect: EffectKind, power: f32, duration: Duration) {
        if duration.is_zero() || power <= 0.0 {
            return;
        }
        match effect {
            EffectKind::None => {}
            EffectKind::Burn => {
                self.burn = Some(StatusEffect::refreshed(self.burn, power, duration));
            }
            EffectKind::Freeze => {
                self.freeze = Some(StatusEffect::refreshed(self.freeze, power, duration));
            }
        }
    }

    /// Runs status effects for `dt`, returning `true` when burning killed the enemy.
    pub(crate) fn tick_effects(&mut self, dt: Duration) -> bool {
        let mut killed = false;

        if let Some(burn) = self.burn.as_mut() {
            let burned = burn.consume(dt);
            let power = burn.power;
            let expired = burn.expired();
            killed = self.take_damage(power * burned.as_secs_f32());
            if expired {
                self.burn = None;
            }
        }

        if let Some(freeze) = self.freeze.as_mut() {
            let _ = freeze.consume(dt);
            if freeze.expired() {
                self.freeze = None;
            }
        }

        killed
    }

    fn speed(&self) -> f32 {
        let slow = self
            .freeze
            .map_or(0.0, |freeze| freeze.power.clamp(0.0, MAX_FREEZE_POWER));
        self.speed * (1.0 - slow)
    }

    /// Moves toward the next waypoint, stopping for this tick once it is reached.
    pub(crate) fn advance(&mut self, path: &Path, dt: Duration) {
        if self.finished {
            return;
        }

        let Some(target) = path.waypoint(self.waypoint + 1) else {
            self.finished = true;
            return;
        };

        self.position = self
            .position
            .step_towards(target, self.speed() * dt.as_secs_f32());

        if self.position.distance(target) < ARRIVAL_THRESHOLD {
            self.waypoint += 1;
            if self.waypoint >= path.len().saturating_sub(1) {
                self.finished = true;
            }
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            burning: self.burn.is_some(),
            frozen: self.freeze.is_some(),
        }
    }
}

/// Arena storing live enemies under stable identifiers.
#[derive(Debug)]
pub(crate) struct EnemyRoster {
    entries: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyRoster {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, enemy: Enemy) {
        let _ = self.entries.insert(enemy.id, enemy);
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
