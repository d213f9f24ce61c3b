use super::{PlayerProgress, StakingPosition};
use crate::calculations;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated staking state of one account, rebuilt on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStakingSummary {
    pub total_staked: f64,
    pub locked_yields: f64,
    pub unlocked_yields: f64,
    pub daily_credit: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub credit_last_refresh: DateTime<Utc>,
    pub progress: PlayerProgress,
    pub delegations: Vec<StakingPosition>,
}

impl UserStakingSummary {
    pub fn from_positions(
        delegations: Vec<StakingPosition>,
        credit_last_refresh: DateTime<Utc>,
        daily_credit_rate: f64,
        progress: PlayerProgress,
    ) -> Self {
        let total_staked = delegations.iter().map(|p| p.tokens_staked).sum();
        let locked_yields = delegations.iter().map(|p| p.tokens_rewarded).sum();

        Self {
            total_staked,
            locked_yields,
            // Rewards only unlock once challenges resolve, which happens off-chain
            unlocked_yields: 0.0,
            daily_credit: calculations::daily_credit(
                total_staked,
                locked_yields,
                daily_credit_rate,
            ),
            credit_last_refresh,
            progress,
            delegations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(node: &str, staked: f64, rewarded: f64) -> StakingPosition {
        StakingPosition {
            node_id: node.to_string(),
            delegator_id: Some(1),
            tokens_committed: 0.0,
            tokens_staked: staked,
            tokens_unstaking: 0.0,
            tokens_unstaked: 0.0,
            tokens_rewarded: rewarded,
        }
    }

    #[test]
    fn test_summary_totals() {
        let now = Utc::now();
        let summary = UserStakingSummary::from_positions(
            vec![position("a", 100.0, 2.5), position("b", 400.0, 7.5)],
            now,
            0.1,
            PlayerProgress::default(),
        );

        assert_eq!(summary.total_staked, 500.0);
        assert_eq!(summary.locked_yields, 10.0);
        assert_eq!(summary.unlocked_yields, 0.0);
        assert!((summary.daily_credit - 51.0).abs() < 1e-9);
        assert_eq!(summary.credit_last_refresh, now);
        assert_eq!(summary.delegations.len(), 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary =
            UserStakingSummary::from_positions(
            Vec::new(),
            Utc::now(),
            0.1,
            PlayerProgress::default(),
        );
        assert_eq!(summary.total_staked, 0.0);
        assert_eq!(summary.daily_credit, 0.0);
    }
}
