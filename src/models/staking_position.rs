use crate::error::CalcError;
use crate::utils::units::from_smallest_unit;
use serde::{Deserialize, Serialize};

/// One delegation held in the user's staking collection, in whole tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakingPosition {
    pub node_id: String,
    pub delegator_id: Option<u32>,
    pub tokens_committed: f64,
    pub tokens_staked: f64,
    pub tokens_unstaking: f64,
    pub tokens_unstaked: f64,
    pub tokens_rewarded: f64,
}

impl StakingPosition {
    /// Builds a position from smallest-unit balances ordered as
    /// committed, staked, unstaking, unstaked, rewarded.
    pub fn from_units(
        node_id: impl Into<String>,
        delegator_id: Option<u32>,
        units: [u64; 5],
    ) -> Result<Self, CalcError> {
        let [committed, staked, unstaking, unstaked, rewarded] = units;
        Ok(Self {
            node_id: node_id.into(),
            delegator_id,
            tokens_committed: from_smallest_unit(committed)?,
            tokens_staked: from_smallest_unit(staked)?,
            tokens_unstaking: from_smallest_unit(unstaking)?,
            tokens_unstaked: from_smallest_unit(unstaked)?,
            tokens_rewarded: from_smallest_unit(rewarded)?,
        })
    }
}
