/// The score-submission boundary.
///
/// The backend is a black box behind `ScoreService`: hand it a game id and
/// a final score, then poll the returned ticket until the result lands.
/// The bundled implementation simulates a remote service — fixed latency,
/// uniform rank — which is why the trait seam still carries an error type
/// the simulation never produces.

use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Final outcome of a settled session. Created once, immutable.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SettlementResult {
    pub score: u32,
    /// Share of players beaten, 0–100.
    pub rank_percent: u8,
    pub coins_earned: u32,
}

/// Coin payout rule, shared by the backend and the local fallback.
pub fn coins_for(score: u32) -> u32 {
    score / 10
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("scoring backend rejected the submission: {0}")]
    Rejected(String),
}

/// One in-flight submission. Resolves at most once, after its latency.
pub struct PendingSettlement {
    remaining: Duration,
    result: Option<SettlementResult>,
}

impl PendingSettlement {
    pub fn new(result: SettlementResult, latency: Duration) -> Self {
        PendingSettlement { remaining: latency, result: Some(result) }
    }

    /// Feed elapsed time; yields the result on the call that crosses the
    /// latency, then never again.
    pub fn poll(&mut self, dt: Duration) -> Option<SettlementResult> {
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.result.take()
        } else {
            None
        }
    }
}

pub trait ScoreService {
    fn submit(&mut self, game_id: &str, score: u32) -> Result<PendingSettlement, ScoreError>;
}

/// Stand-in for the real scoring backend: always resolves, after a
/// configured latency, with a rank drawn uniformly from 60–89.
pub struct SimulatedScoreService {
    latency: Duration,
    rng: ChaCha8Rng,
}

impl SimulatedScoreService {
    pub fn new(latency: Duration, rng: ChaCha8Rng) -> Self {
        SimulatedScoreService { latency, rng }
    }
}

impl ScoreService for SimulatedScoreService {
    fn submit(&mut self, game_id: &str, score: u32) -> Result<PendingSettlement, ScoreError> {
        let rank_percent = self.rng.gen_range(60..90);
        tracing::debug!(game_id, score, rank_percent, "score submitted");
        Ok(PendingSettlement::new(
            SettlementResult { score, rank_percent, coins_earned: coins_for(score) },
            self.latency,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn pending_resolves_once_after_latency() {
        let result = SettlementResult { score: 420, rank_percent: 75, coins_earned: 42 };
        let mut pending = PendingSettlement::new(result, Duration::from_millis(800));

        assert_eq!(pending.poll(Duration::from_millis(500)), None);
        assert_eq!(pending.poll(Duration::from_millis(400)), Some(result));
        assert_eq!(pending.poll(Duration::from_secs(1)), None);
    }

    #[test]
    fn simulated_service_bounds_rank_and_pays_floor_div_ten() {
        let mut svc =
            SimulatedScoreService::new(Duration::ZERO, ChaCha8Rng::seed_from_u64(9));
        for score in [0, 5, 1299] {
            let mut pending = svc.submit("g1", score).unwrap();
            let result = pending.poll(Duration::ZERO).unwrap();
            assert_eq!(result.score, score);
            assert!((60..90).contains(&result.rank_percent));
            assert_eq!(result.coins_earned, score / 10);
        }
    }
}
