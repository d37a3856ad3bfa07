use serde::{Deserialize, Serialize};

/// Points awarded for picking up a coin.
pub const COIN_SCORE: u32 = 10;
/// Points awarded for collecting a power-up.
pub const POWER_UP_SCORE: u32 = 1000;

/// Coin and score counters for one life.
///
/// Counters only ever go up; a respawn clears both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCollector {
    coins: u32,
    score: u32,
}

impl ScoreCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    /// One coin pickup: a coin plus its points.
    pub fn collect_coin(&mut self) {
        self.add_coins(1);
        self.add_score(COIN_SCORE);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_pickup_counts_coin_and_points() {
        let mut score = ScoreCollector::new();
        score.collect_coin();
        score.collect_coin();
        assert_eq!(score.coins(), 2);
        assert_eq!(score.score(), 20);
    }

    #[test]
    fn zero_increments_change_nothing() {
        let mut score = ScoreCollector::new();
        score.add_coins(0);
        score.add_score(0);
        assert_eq!(score, ScoreCollector::default());
    }

    #[test]
    fn counters_saturate() {
        let mut score = ScoreCollector::new();
        score.add_score(u32::MAX);
        score.add_score(POWER_UP_SCORE);
        assert_eq!(score.score(), u32::MAX);
    }

    #[test]
    fn reset_clears_both() {
        let mut score = ScoreCollector::new();
        score.collect_coin();
        score.add_score(POWER_UP_SCORE);
        score.reset();
        assert_eq!(score.coins(), 0);
        assert_eq!(score.score(), 0);
    }
}
