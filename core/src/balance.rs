//! Balance tables for towers and enemies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Percentage of the cumulative investment refunded when a tower is sold.
pub const SELL_REFUND_PERCENT: u32 = 50;

/// Status effect applied to enemies hit by a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Plain damage without a lingering effect.
    None,
    /// Deals `effect_power` damage per second while active.
    Burn,
    /// Scales movement speed by `1 - effect_power` while active.
    Freeze,
}

/// Per-level multiplicative growth applied to tower stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatGrowth {
    /// Damage gained per level as a fraction of the base value.
    pub damage: f32,
    /// Attack speed gained per level as a fraction of the base value.
    pub attack_speed: f32,
    /// Range gained per level as a fraction of the base value.
    pub range: f32,
    /// Area radius gained per level as a fraction of the base value.
    pub area_radius: f32,
    /// Effect duration gained per level as a fraction of the base value.
    pub effect_duration: f32,
    /// Effect power gained per level as a fraction of the base value.
    pub effect_power: f32,
}

/// Growth applied to harpoon towers.
pub const BASIC_GROWTH: StatGrowth = StatGrowth {
    damage: 0.2,
    attack_speed: 0.1,
    range: 0.05,
    area_radius: 0.0,
    effect_duration: 0.0,
    effect_power: 0.0,
};

/// Growth applied to fire towers.
pub const FIRE_GROWTH: StatGrowth = StatGrowth {
    damage: 0.2,
    attack_speed: 0.1,
    range: 0.05,
    area_radius: 0.1,
    effect_duration: 0.1,
    effect_power: 0.1,
};

/// Growth applied to ice towers.
pub const ICE_GROWTH: StatGrowth = StatGrowth {
    damage: 0.2,
    attack_speed: 0.1,
    range: 0.05,
    area_radius: 0.1,
    effect_duration: 0.1,
    effect_power: 0.1,
};

/// Combat statistics for a tower at a given level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Damage dealt to the primary target per attack.
    pub damage: f32,
    /// Attacks per second.
    pub attack_speed: f32,
    /// Maximum targeting distance in world units.
    pub range: f32,
    /// Radius around the primary target that receives the status effect.
    pub area_radius: f32,
    /// Status effect applied by the tower.
    pub effect: EffectKind,
    /// Seconds the status effect lasts.
    pub effect_duration: f32,
    /// Strength of the status effect.
    pub effect_power: f32,
}

impl TowerStats {
    /// Derives the stats for `level` by applying `growth` once per level above one.
    #[must_use]
    pub fn at_level(&self, level: u32, growth: &StatGrowth) -> Self {
        let steps = level.saturating_sub(1) as f32;
        let grow = |base: f32, rate: f32| base * (1.0 + steps * rate);

        Self {
            damage: grow(self.damage, growth.damage),
            attack_speed: grow(self.attack_speed, growth.attack_speed),
            range: grow(self.range, growth.range),
            area_radius: grow(self.area_radius, growth.area_radius),
            effect: self.effect,
            effect_duration: grow(self.effect_duration, growth.effect_duration),
            effect_power: grow(self.effect_power, growth.effect_power),
        }
    }

    /// Minimum time between two attacks.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        if self.attack_speed <= 0.0 {
            return Duration::MAX;
        }
        Duration::try_from_secs_f32(1.0 / self.attack_speed).unwrap_or(Duration::MAX)
    }

    /// Duration of the status effect.
    #[must_use]
    pub fn effect_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.effect_duration.max(0.0)).unwrap_or(Duration::ZERO)
    }
}

/// Enumerates the supported tower archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerKind {
    /// Single-target harpoon tower.
    Basic,
    /// Tower that sets enemies around its target on fire.
    Fire,
    /// Tower that slows enemies around its target.
    Ice,
}

impl TowerKind {
    /// Every tower kind in menu order.
    pub const ALL: [TowerKind; 3] = [TowerKind::Basic, TowerKind::Fire, TowerKind::Ice];

    /// Display name of the tower.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Basic => "Harpoon Tower",
            Self::Fire => "Fire Tower",
            Self::Ice => "Ice Tower",
        }
    }

    /// Gold required to place the tower.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        match self {
            Self::Basic => 100,
            Self::Fire => 150,
            Self::Ice => 200,
        }
    }

    /// Gold required for each upgrade step.
    #[must_use]
    pub const fn upgrade_cost(&self) -> u32 {
        match self {
            Self::Basic => 50,
            Self::Fire => 75,
            Self::Ice => 100,
        }
    }

    /// Highest level the tower can reach.
    #[must_use]
    pub const fn max_level(&self) -> u32 {
        5
    }

    /// Per-level growth applied on upgrade.
    #[must_use]
    pub const fn growth(&self) -> StatGrowth {
        match self {
            Self::Basic => BASIC_GROWTH,
            Self::Fire => FIRE_GROWTH,
            Self::Ice => ICE_GROWTH,
        }
    }

    /// Level-one stats.
    #[must_use]
    pub const fn base_stats(&self) -> TowerStats {
        match self {
            Self::Basic => TowerStats {
                damage: 10.0,
                attack_speed: 1.0,
                range: 100.0,
                area_radius: 0.0,
                effect: EffectKind::None,
                effect_duration: 0.0,
                effect_power: 0.0,
            },
            Self::Fire => TowerStats {
                damage: 5.0,
                attack_speed: 2.0,
                range: 80.0,
                area_radius: 40.0,
                effect: EffectKind::Burn,
                effect_duration: 3.0,
                effect_power: 5.0,
            },
            Self::Ice => TowerStats {
                damage: 3.0,
                attack_speed: 0.5,
                range: 120.0,
                area_radius: 60.0,
                effect: EffectKind::Freeze,
                effect_duration: 5.0,
                effect_power: 0.5,
            },
        }
    }

    /// Stats for the provided level.
    #[must_use]
    pub fn stats_at(&self, level: u32) -> TowerStats {
        self.base_stats().at_level(level, &self.growth())
    }
}

/// Gold refunded when selling a tower that absorbed `invested` gold.
#[must_use]
pub const fn sell_refund(invested: u32) -> u32 {
    invested / 100 * SELL_REFUND_PERCENT + invested % 100 * SELL_REFUND_PERCENT / 100
}

/// Enumerates the enemy archetypes that travel the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Baseline walker.
    Basic,
    /// Fragile runner.
    Fast,
    /// Slow, heavily armoured walker.
    Tank,
    /// Airborne enemy following the same path.
    Flying,
    /// Rare enemy with large health and bounty.
    Boss,
}

impl EnemyKind {
    /// Every enemy kind from weakest to strongest.
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Flying,
        EnemyKind::Boss,
    ];

    /// Health of a first-wave enemy.
    #[must_use]
    pub const fn base_health(&self) -> f32 {
        match self {
            Self::Basic => 100.0,
            Self::Fast => 50.0,
            Self::Tank => 400.0,
            Self::Flying => 75.0,
            Self::Boss => 2000.0,
        }
    }

    /// Movement speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        match self {
            Self::Basic => 100.0,
            Self::Fast => 200.0,
            Self::Tank => 60.0,
            Self::Flying => 120.0,
            Self::Boss => 80.0,
        }
    }

    /// Gold credited when the enemy is killed.
    #[must_use]
    pub const fn bounty(&self) -> u32 {
        match self {
            Self::Basic => 10,
            Self::Fast => 15,
            Self::Tank => 30,
            Self::Flying => 20,
            Self::Boss => 100,
        }
    }

    /// Points added to the run score when the enemy is killed.
    #[must_use]
    pub const fn score_value(&self) -> u32 {
        match self {
            Self::Basic => 10,
            Self::Fast => 15,
            Self::Tank => 30,
            Self::Flying => 20,
            Self::Boss => 100,
        }
    }
}
