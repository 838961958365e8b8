//! Gold, lives, kill and score bookkeeping.

use tower_inferno_core::EconomyConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ledger {
    gold: u32,
    lives: u32,
    kills: u32,
    score: u32,
}

impl Ledger {
    pub(crate) fn new(economy: &EconomyConfig) -> Self {
        Self {
            gold: economy.starting_gold,
            lives: economy.starting_lives,
            kills: 0,
            score: 0,
        }
    }

    pub(crate) fn gold(&self) -> u32 {
        self.gold
    }

    pub(crate) fn lives(&self) -> u32 {
        self.lives
    }

    pub(crate) fn kills(&self) -> u32 {
        self.kills
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn can_afford(&self, cost: u32) -> bool {
        self.gold >= cost
    }

    pub(crate) fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Debits gold, clamping at zero. Callers check `can_afford` first.
    pub(crate) fn remove_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_sub(amount);
    }

    /// Debits one life and returns the lives left.
    pub(crate) fn remove_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Credits a kill: gold for the bounty, points for the score.
    pub(crate) fn record_kill(&mut self, bounty: u32, score_value: u32) {
        self.kills = self.kills.saturating_add(1);
        self.score = self.score.saturating_add(score_value);
        self.add_gold(bounty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(gold: u32, lives: u32) -> Ledger {
        Ledger::new(&EconomyConfig {
            starting_gold: gold,
            starting_lives: lives,
        })
    }

    #[test]
    fn spending_clamps_at_zero() {
        let mut ledger = ledger(30, 1);
        assert!(!ledger.can_afford(50));
        ledger.remove_gold(50);
        assert_eq!(ledger.gold(), 0);
    }

    #[test]
    fn lives_clamp_at_zero() {
        let mut ledger = ledger(0, 1);
        assert_eq!(ledger.remove_life(), 0);
        assert_eq!(ledger.remove_life(), 0);
        assert_eq!(ledger.lives(), 0);
    }

    #[test]
    fn kills_credit_bounty_and_score() {
        let mut ledger = ledger(100, 10);
        ledger.record_kill(15, 30);
        assert_eq!(ledger.gold(), 115);
        assert_eq!(ledger.kills(), 1);
        assert_eq!(ledger.score(), 30);
    }

    #[test]
    fn gold_movements_leave_the_score_alone() {
        let mut ledger = ledger(100, 10);
        ledger.record_kill(10, 10);
        ledger.add_gold(500);
        ledger.remove_gold(200);
        assert_eq!(ledger.score(), 10);
    }
}
