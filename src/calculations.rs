//! Derived staking state: credit accrual, yield shares, leveling and APR.
//!
//! Everything here is a pure function of its arguments. Functions that need
//! the current time come in pairs: `foo_at(.., now)` takes the clock
//! explicitly and `foo(..)` reads `Utc::now()`.

use crate::error::CalcError;
use crate::models::ChallengeCategory;
use chrono::{DateTime, Duration, Utc};
use std::str::FromStr;

pub const DEFAULT_DAILY_CREDIT_RATE: f64 = 0.1;
pub const DEFAULT_BONUS_MULTIPLIER: f64 = 1.05;
pub const DEFAULT_NODE_OPERATOR_FEE: f64 = 0.08;
pub const DEFAULT_VESTING_DAYS: u32 = 30;
pub const MIN_DELEGATION_AMOUNT: f64 = 50.0;

const DAYS_PER_YEAR: f64 = 365.0;
const MS_PER_DAY: f64 = 86_400_000.0;
const BASE_LEVEL_XP: f64 = 100.0;

/// Credits granted per day: `(principal_share + locked_yield) * daily_rate`.
pub fn daily_credit(principal_share: f64, locked_yield: f64, daily_rate: f64) -> f64 {
    (principal_share + locked_yield) * daily_rate
}

/// The user's share of `total_rewards`, proportional to their stake.
/// An empty pool yields 0.
pub fn pro_rata_yield(user_stake: f64, total_pool_stake: f64, total_rewards: f64) -> f64 {
    if total_pool_stake == 0.0 {
        return 0.0;
    }
    (user_stake / total_pool_stake) * total_rewards
}

pub fn bonus_reward(base_reward: f64, multiplier: f64) -> f64 {
    base_reward * multiplier
}

/// Level for an experience total. Each level needs twice the XP of the
/// previous one, and level 1 is the floor.
pub fn level(experience: u64) -> u32 {
    if experience == 0 {
        return 1;
    }
    let raw = ((experience as f64 / BASE_LEVEL_XP).log2() + 1.0).floor();
    if raw < 1.0 {
        1
    } else {
        raw.min(u32::MAX as f64) as u32
    }
}

/// XP threshold for reaching the level after `current_level`.
pub fn xp_for_next_level(current_level: u32) -> u64 {
    1u64.checked_shl(current_level)
        .map(|base| base.saturating_mul(BASE_LEVEL_XP as u64))
        .unwrap_or(u64::MAX)
}

pub fn is_vesting_complete_at(
    stake_date: DateTime<Utc>,
    vesting_days: u32,
    now: DateTime<Utc>,
) -> bool {
    now.signed_duration_since(stake_date) >= Duration::days(i64::from(vesting_days))
}

pub fn is_vesting_complete(stake_date: DateTime<Utc>, vesting_days: u32) -> bool {
    is_vesting_complete_at(stake_date, vesting_days, Utc::now())
}

/// Integer win percentage, rounded half up. No challenges means 0.
pub fn accuracy_rate(won: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((f64::from(won) / f64::from(total)) * 100.0).round() as u32
}

/// Delegator APR in percent, annualizing a daily network reward figure and
/// removing the node operator's cut.
pub fn staking_apr(
    total_network_rewards: f64,
    total_network_staked: f64,
    operator_fee: f64,
) -> f64 {
    if total_network_staked == 0.0 {
        return 0.0;
    }
    let delegator_share = 1.0 - operator_fee;
    let annual_rewards = total_network_rewards * DAYS_PER_YEAR;
    (annual_rewards * delegator_share / total_network_staked) * 100.0
}

/// Scales a per-epoch payout to one day. Zero-length epochs yield 0.
pub fn daily_rewards_from_epoch(epoch_rewards: f64, epoch_duration_ms: u64) -> f64 {
    if epoch_duration_ms == 0 {
        return 0.0;
    }
    epoch_rewards * (MS_PER_DAY / epoch_duration_ms as f64)
}

/// Network-wide APR in percent from a per-epoch payout.
pub fn network_apr(epoch_rewards: f64, total_staked: f64, epochs_per_year: f64) -> f64 {
    if total_staked <= 0.0 {
        return 0.0;
    }
    (epoch_rewards * epochs_per_year / total_staked) * 100.0
}

/// Principal after compounding `compounding_periods` times per year.
/// Zero periods means no compounding happens and the principal is returned as is.
pub fn compound_rewards(
    principal: f64,
    apr_percent: f64,
    compounding_periods: u32,
    years: f64,
) -> f64 {
    if compounding_periods == 0 {
        return principal;
    }
    let periods = f64::from(compounding_periods);
    let rate = apr_percent / 100.0;
    principal * (1.0 + rate / periods).powf(periods * years)
}

/// Simple (non-compounding) rewards over `days`.
pub fn estimate_rewards(staked: f64, apr_percent: f64, days: f64) -> f64 {
    let daily_rate = apr_percent / 100.0 / DAYS_PER_YEAR;
    staked * daily_rate * days
}

/// Reward multiplier for a challenge category; unknown categories get 1.0.
pub fn challenge_multiplier(category: &str) -> f64 {
    ChallengeCategory::from_str(category)
        .map(|category| category.multiplier())
        .unwrap_or(1.0)
}

pub fn validate_delegation_amount(amount: f64, minimum: f64) -> Result<f64, CalcError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CalcError::InvalidAmount(amount.to_string()));
    }
    if amount < minimum {
        return Err(CalcError::BelowMinimumDelegation { amount, minimum });
    }
    Ok(amount)
}
