//! Runtime configuration for a run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::CellCoord;

/// Tunable parameters describing a complete run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Starting resources.
    pub economy: EconomyConfig,
    /// Wave pacing and difficulty growth.
    pub waves: WaveConfig,
    /// Custom level layout; the built-in route is used when absent.
    pub level: Option<LevelConfig>,
}

/// Starting resources granted to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Gold available when the run starts.
    pub starting_gold: u32,
    /// Lives available when the run starts.
    pub starting_lives: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_gold: 100,
            starting_lives: 10,
        }
    }
}

/// Rule used to choose the kind of each spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnPattern {
    /// Every third spawn is a fast enemy, the rest are basic.
    Cycle,
    /// Wave-gated random table introducing stronger tiers as waves progress.
    Tiered,
}

/// Wave pacing and difficulty growth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Quota before the per-wave increment is applied.
    pub base_quota: u32,
    /// Additional enemies spawned per wave number.
    pub quota_per_wave: u32,
    /// Spawn interval in seconds before the per-wave decrement is applied.
    pub base_spawn_interval: f32,
    /// Seconds removed from the spawn interval per wave number.
    pub spawn_interval_decrement: f32,
    /// Lower bound of the spawn interval in seconds.
    pub min_spawn_interval: f32,
    /// Fraction of base health added to enemies per wave after the first.
    pub health_growth_per_wave: f32,
    /// Fraction of base speed added to enemies per wave after the first.
    pub speed_growth_per_wave: f32,
    /// Fraction of base bounty and score value added per wave after the first.
    pub reward_growth_per_wave: f32,
    /// Rule used to pick enemy kinds.
    pub pattern: SpawnPattern,
    /// Seed for the tiered pattern's generator.
    pub seed: u64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            base_quota: 5,
            quota_per_wave: 2,
            base_spawn_interval: 2.0,
            spawn_interval_decrement: 0.1,
            min_spawn_interval: 0.5,
            health_growth_per_wave: 0.2,
            speed_growth_per_wave: 0.05,
            reward_growth_per_wave: 0.1,
            pattern: SpawnPattern::Cycle,
            seed: 0x5eed_cafe,
        }
    }
}

impl WaveConfig {
    /// Number of enemies spawned during `wave`.
    #[must_use]
    pub fn quota(&self, wave: u32) -> u32 {
        self.base_quota
            .saturating_add(wave.saturating_mul(self.quota_per_wave))
    }

    /// Delay between two spawns during `wave`.
    #[must_use]
    pub fn spawn_interval(&self, wave: u32) -> Duration {
        let seconds = (self.base_spawn_interval - wave as f32 * self.spawn_interval_decrement)
            .max(self.min_spawn_interval)
            .max(0.0);
        Duration::try_from_secs_f32(seconds).unwrap_or(Duration::ZERO)
    }

    /// Multiplier applied to enemy base health during `wave`.
    #[must_use]
    pub fn health_multiplier(&self, wave: u32) -> f32 {
        growth(wave, self.health_growth_per_wave)
    }

    /// Multiplier applied to enemy base speed during `wave`.
    #[must_use]
    pub fn speed_multiplier(&self, wave: u32) -> f32 {
        growth(wave, self.speed_growth_per_wave)
    }

    /// Bounty or score value of an enemy killed during `wave`, rounded down.
    #[must_use]
    pub fn scaled_reward(&self, base: u32, wave: u32) -> u32 {
        let scaled = base as f32 * growth(wave, self.reward_growth_per_wave);
        // `as` saturates; the offset absorbs f32 error on whole products.
        (scaled + 1e-3).floor() as u32
    }
}

fn growth(wave: u32, rate: f32) -> f32 {
    (1.0 + wave.saturating_sub(1) as f32 * rate).max(0.0)
}

/// Custom level layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in world units.
    pub tile_length: f32,
    /// Ordered cells enemies walk through, from entry to exit.
    pub path: Vec<CellCoord>,
}

#[cfg(test)]
mod tests {
    use super::{GameConfig, SpawnPattern, WaveConfig};
    use std::time::Duration;

    #[test]
    fn quota_grows_with_wave_number() {
        let waves = WaveConfig::default();
        assert_eq!(waves.quota(1), 7);
        assert_eq!(waves.quota(4), 13);
    }

    #[test]
    fn spawn_interval_respects_floor() {
        let waves = WaveConfig::default();
        assert!(waves.spawn_interval(1) > Duration::from_millis(1_890));
        assert!(waves.spawn_interval(1) < Duration::from_millis(1_910));
        assert_eq!(waves.spawn_interval(40), Duration::from_millis(500));
    }

    #[test]
    fn first_wave_keeps_base_health() {
        let waves = WaveConfig::default();
        assert_eq!(waves.health_multiplier(1), 1.0);
        assert!((waves.health_multiplier(6) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn speed_and_rewards_grow_from_the_second_wave() {
        let waves = WaveConfig::default();
        assert_eq!(waves.speed_multiplier(1), 1.0);
        assert!((waves.speed_multiplier(6) - 1.25).abs() < 1e-6);

        assert_eq!(waves.scaled_reward(10, 1), 10);
        assert_eq!(waves.scaled_reward(10, 6), 15);
        assert_eq!(waves.scaled_reward(15, 2), 16);
        assert_eq!(waves.scaled_reward(100, 11), 200);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            [economy]
            starting_gold = 450

            [waves]
            pattern = "tiered"
            seed = 9
            "#,
        )
        .expect("parse config");

        assert_eq!(config.economy.starting_gold, 450);
        assert_eq!(config.economy.starting_lives, 10);
        assert_eq!(config.waves.pattern, SpawnPattern::Tiered);
        assert_eq!(config.waves.seed, 9);
        assert_eq!(config.waves.base_quota, 5);
        assert_eq!(config.waves.reward_growth_per_wave, 0.1);
        assert!(config.level.is_none());
    }
}
