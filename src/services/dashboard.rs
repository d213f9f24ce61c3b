use crate::calculations::network_apr;
use crate::config::Config;
use crate::error::GatewayError;
use crate::models::{
    EpochSnapshot, NetworkStats, PlayerProgress, SessionContext, StakingPosition,
    UserStakingSummary,
};
use crate::services::gateway::ChainGateway;
use crate::services::staking_scripts;
use crate::utils::units::from_smallest_unit;
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::info;
use serde::Serialize;

/// Account-specific part of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDashboard {
    pub address: String,
    pub balance: f64,
    pub has_collection: bool,
    /// `None` until the account has set up a staking collection.
    pub staking: Option<UserStakingSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub fetched_at: DateTime<Utc>,
    pub user: Option<UserDashboard>,
    pub epoch: EpochSnapshot,
    pub network: NetworkStats,
}

fn duration_from_ms(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

pub async fn load_network_overview<G: ChainGateway + ?Sized>(
    gateway: &G,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<(EpochSnapshot, NetworkStats), GatewayError> {
    let (epoch, network) = tokio::try_join!(
        staking_scripts::get_current_epoch(gateway),
        staking_scripts::get_network_stats(gateway),
    )?;

    let snapshot = EpochSnapshot {
        counter: epoch.counter,
        total_staked: from_smallest_unit(epoch.total_staked_units)?,
        total_rewards_paid: from_smallest_unit(epoch.total_rewards_units)?,
        staking_auction_ends_at: now + duration_from_ms(config.epoch_duration_ms),
    };

    let total_staked = from_smallest_unit(network.total_staked_units)?;
    let total_rewards = from_smallest_unit(network.total_rewards_units)?;
    let stats = NetworkStats {
        total_staked,
        total_nodes: network.total_nodes,
        average_apr: network_apr(total_rewards, total_staked, config.epochs_per_year),
    };

    info!(
        "Epoch {}: {} FLOW staked across {} nodes, APR {:.2}%",
        snapshot.counter, stats.total_staked, stats.total_nodes, stats.average_apr
    );
    Ok((snapshot, stats))
}

/// Staking positions of every delegation of `address`, in delegation order.
pub async fn load_positions<G: ChainGateway + ?Sized>(
    gateway: &G,
    address: &str,
    parallel_limit: usize,
) -> Result<Vec<StakingPosition>, GatewayError> {
    let delegators = staking_scripts::get_delegator_ids(gateway, address).await?;

    stream::iter(delegators)
        .map(|delegator| async move {
            staking_scripts::get_staking_info(
                gateway,
                address,
                &delegator.node_id,
                delegator.delegator_id,
            )
            .await
        })
        .buffered(parallel_limit.max(1))
        .try_collect()
        .await
}

pub async fn load_user_staking<G: ChainGateway + ?Sized>(
    gateway: &G,
    address: &str,
    session: &SessionContext,
    progress: PlayerProgress,
    config: &Config,
) -> Result<UserDashboard, GatewayError> {
    let balance = staking_scripts::get_account_balance(gateway, address).await?;
    let has_collection = staking_scripts::has_staking_collection(gateway, address).await?;

    let staking = if has_collection {
        let positions = load_positions(gateway, address, config.parallel_limit).await?;
        info!("Loaded {} staking positions for {}", positions.len(), address);
        Some(UserStakingSummary::from_positions(
            positions,
            session.credit_last_refresh(),
            config.daily_credit_rate,
            progress,
        ))
    } else {
        info!("{} has no staking collection yet", address);
        None
    };

    Ok(UserDashboard {
        address: address.to_string(),
        balance,
        has_collection,
        staking,
    })
}

/// Everything the landing dashboard shows, fetched in one pass.
pub async fn load_dashboard<G: ChainGateway + ?Sized>(
    gateway: &G,
    session: &SessionContext,
    progress: PlayerProgress,
    config: &Config,
) -> Result<DashboardSnapshot, GatewayError> {
    let fetched_at = Utc::now();
    let (epoch, network) = load_network_overview(gateway, config, fetched_at).await?;

    let user = match session.address() {
        Some(address) => {
            Some(load_user_staking(gateway, address, session, progress, config).await?)
        }
        None => None,
    };

    Ok(DashboardSnapshot {
        fetched_at,
        user,
        epoch,
        network,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cadence::CadenceValue;
    use crate::services::gateway::mock::MockGateway;
    use crate::services::staking_scripts::fixtures::*;
    use crate::services::staking_scripts::{
        GET_ACCOUNT_BALANCE, GET_CURRENT_EPOCH, GET_DELEGATOR_IDS, GET_NETWORK_STATS,
        GET_STAKING_INFO, HAS_STAKING_COLLECTION,
    };

    fn network_gateway() -> MockGateway {
        MockGateway::new()
            .with_script(
                GET_CURRENT_EPOCH,
                CadenceValue::Array(vec![
                    CadenceValue::Number {
                        kind: "UInt64".to_string(),
                        value: "88".to_string(),
                    },
                    ufix("1000000.0"),
                    ufix("1000.0"),
                ]),
            )
            .with_script(
                GET_NETWORK_STATS,
                CadenceValue::Array(vec![ufix("1000000.0"), ufix("12.0"), ufix("1000.0")]),
            )
    }

    #[tokio::test]
    async fn test_network_overview() {
        let gateway = network_gateway();
        let config = Config::default();
        let now = Utc::now();

        let (epoch, network) = load_network_overview(&gateway, &config, now).await.unwrap();
        assert_eq!(epoch.counter, 88);
        assert_eq!(epoch.total_staked, 1_000_000.0);
        assert_eq!(epoch.total_rewards_paid, 1000.0);
        assert_eq!(
            epoch.staking_auction_ends_at,
            now + Duration::milliseconds(43_200_000)
        );

        assert_eq!(network.total_nodes, 12);
        // 1000 * 30 / 1_000_000 * 100
        assert!((network.average_apr - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_user_with_collection() {
        let gateway = network_gateway()
            .with_script(GET_ACCOUNT_BALANCE, ufix("250.0"))
            .with_script(HAS_STAKING_COLLECTION, CadenceValue::Bool(true))
            .with_script(
                GET_DELEGATOR_IDS,
                CadenceValue::Array(vec![delegator_info(1, "node-a"), delegator_info(2, "node-b")]),
            )
            .with_script(GET_STAKING_INFO, staking_info("100.0", "5.0"));
        let config = Config::default();
        let session = SessionContext::logged_in("0x01", Utc::now());

        let snapshot = load_dashboard(&gateway, &session, PlayerProgress::default(), &config)
            .await
            .unwrap();
        let user = snapshot.user.unwrap();
        assert_eq!(user.balance, 250.0);
        assert!(user.has_collection);

        let staking = user.staking.unwrap();
        assert_eq!(staking.delegations.len(), 2);
        assert_eq!(staking.delegations[0].node_id, "node-a");
        assert_eq!(staking.delegations[1].node_id, "node-b");
        assert_eq!(staking.total_staked, 200.0);
        assert_eq!(staking.locked_yields, 10.0);
        assert!((staking.daily_credit - 21.0).abs() < 1e-9);
        assert_eq!(staking.credit_last_refresh, session.credit_last_refresh());
        assert_eq!(gateway.call_count(GET_STAKING_INFO), 2);
    }

    #[tokio::test]
    async fn test_user_without_collection_skips_positions() {
        let gateway = network_gateway()
            .with_script(GET_ACCOUNT_BALANCE, ufix("3.5"))
            .with_script(HAS_STAKING_COLLECTION, CadenceValue::Bool(false));
        let session = SessionContext::logged_in("0x01", Utc::now());

        let snapshot =
            load_dashboard(&gateway, &session, PlayerProgress::default(), &Config::default())
                .await
                .unwrap();
        let user = snapshot.user.unwrap();
        assert!(!user.has_collection);
        assert_eq!(user.staking, None);
        assert_eq!(gateway.call_count(GET_DELEGATOR_IDS), 0);
    }

    #[tokio::test]
    async fn test_logged_out_dashboard() {
        let gateway = network_gateway();
        let session = SessionContext::logged_out(Utc::now());

        let snapshot =
            load_dashboard(&gateway, &session, PlayerProgress::default(), &Config::default())
                .await
                .unwrap();
        assert_eq!(snapshot.user, None);
        assert_eq!(gateway.call_count(GET_ACCOUNT_BALANCE), 0);
    }

    #[tokio::test]
    async fn test_failed_position_fails_the_load() {
        let gateway = network_gateway()
            .with_script(GET_ACCOUNT_BALANCE, ufix("3.5"))
            .with_script(HAS_STAKING_COLLECTION, CadenceValue::Bool(true))
            .with_script(
                GET_DELEGATOR_IDS,
                CadenceValue::Array(vec![delegator_info(1, "node-a")]),
            );
        let session = SessionContext::logged_in("0x01", Utc::now());

        let result =
            load_dashboard(&gateway, &session, PlayerProgress::default(), &Config::default()).await;
        assert!(matches!(result, Err(GatewayError::Status { status: 400, .. })));
    }
}
