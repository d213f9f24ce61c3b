use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochSnapshot {
    pub counter: u64,
    pub total_staked: f64,
    pub total_rewards_paid: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub staking_auction_ends_at: DateTime<Utc>,
}
