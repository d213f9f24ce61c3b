use chrono::Utc;
use dotenv::dotenv;
use log::{debug, error, info};
use std::time::Duration;

use flow_stake_credits::calculations::{
    bonus_reward, challenge_multiplier, compound_rewards, daily_rewards_from_epoch,
    estimate_rewards, pro_rata_yield, staking_apr,
};
use flow_stake_credits::config::Config;
use flow_stake_credits::models::{filter_markets, ChallengeCategory, PlayerProgress, SessionContext};
use flow_stake_credits::refresh_timer::{can_refresh_credits, format_time_left, time_until_refresh};
use flow_stake_credits::services::dashboard::{load_dashboard, DashboardSnapshot};
use flow_stake_credits::services::flow_access::{create_flow_connections, FlowAccessClient};
use flow_stake_credits::services::market_provider::{
    DemoMarketProvider, JsonFileMarketProvider, MarketProvider,
};
use flow_stake_credits::utils::units::format_amount;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    info!("Starting Flow staking credits dashboard");
    let config = Config::from_env()?;
    let gateway = create_flow_connections(&config);

    let mut session = match &config.wallet_address {
        Some(address) => SessionContext::logged_in(address.clone(), Utc::now()),
        None => SessionContext::logged_out(Utc::now()),
    };
    match session.short_address() {
        Some(address) => info!("Session for {}", address),
        None => info!("No WALLET_ADDRESS set, loading network data only"),
    }

    let markets: Box<dyn MarketProvider> = match &config.markets_file {
        Some(path) => Box::new(JsonFileMarketProvider::new(path.clone())),
        None => Box::new(DemoMarketProvider::new(Utc::now())),
    };
    log_markets(markets.as_ref()).await?;

    let snapshot = load_dashboard(&gateway, &session, PlayerProgress::default(), &config).await?;
    log_dashboard(&snapshot, &config);

    if !config.watch {
        info!("Dashboard loaded");
        return Ok(());
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(config.tick_interval_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
        }

        let last_refresh = session.credit_last_refresh();
        if can_refresh_credits(last_refresh, config.credit_refresh_period_ms) {
            session = session.with_credits_refreshed(Utc::now());
            info!("Daily credits refreshed");
            refresh(&gateway, &session, &config).await;
        } else {
            debug!(
                "Next credit refresh: {}",
                format_time_left(time_until_refresh(last_refresh, config.credit_refresh_period_ms))
            );
        }
    }
}

async fn refresh(gateway: &FlowAccessClient, session: &SessionContext, config: &Config) {
    match load_dashboard(gateway, session, PlayerProgress::default(), config).await {
        Ok(snapshot) => log_dashboard(&snapshot, config),
        Err(e) => error!("Error refreshing dashboard: {:?}", e),
    }
}

async fn log_markets(provider: &dyn MarketProvider) -> Result<(), Box<dyn std::error::Error>> {
    let markets = provider.list_markets().await?;
    let now = Utc::now();
    info!(
        "{} markets open, {} hot",
        markets.len(),
        markets.iter().filter(|m| m.is_hot).count()
    );
    for market in filter_markets(&markets, None) {
        info!(
            "[{:?}] {} yes {}% / no {}%, {} volume, {} left",
            market.category,
            market.title,
            market.yes_odds,
            market.no_odds,
            market.volume_label(),
            market.time_left_label(now)
        );
    }
    Ok(())
}

fn log_dashboard(snapshot: &DashboardSnapshot, config: &Config) {
    let epoch = &snapshot.epoch;
    let network = &snapshot.network;
    let delegator_apr = staking_apr(
        daily_rewards_from_epoch(epoch.total_rewards_paid, config.epoch_duration_ms),
        network.total_staked,
        config.node_operator_fee,
    );

    info!(
        "Epoch {} | staked {} FLOW | rewards paid {} FLOW | auction ends {}",
        epoch.counter,
        format_amount(epoch.total_staked, 2),
        format_amount(epoch.total_rewards_paid, 2),
        epoch.staking_auction_ends_at.to_rfc3339()
    );
    info!(
        "Network: {} nodes, APR {:.2}%, delegator APR after fees {:.2}%",
        network.total_nodes, network.average_apr, delegator_apr
    );

    let Some(user) = &snapshot.user else {
        return;
    };
    info!("Balance of {}: {} FLOW", user.address, format_amount(user.balance, 4));

    let Some(staking) = &user.staking else {
        info!("No staking collection yet, setup is required before delegating");
        return;
    };

    info!(
        "Staked {} FLOW over {} delegations | locked yields {} | unlocked yields {}",
        format_amount(staking.total_staked, 4),
        staking.delegations.len(),
        format_amount(staking.locked_yields, 4),
        format_amount(staking.unlocked_yields, 4)
    );
    info!(
        "Daily credits {} (with bonus {}) | next refresh in {}",
        format_amount(staking.daily_credit, 2),
        format_amount(bonus_reward(staking.daily_credit, config.bonus_multiplier), 2),
        format_time_left(time_until_refresh(
            staking.credit_last_refresh,
            config.credit_refresh_period_ms
        ))
    );
    info!(
        "Share of epoch rewards {} FLOW | 30 day estimate {} FLOW | compounded yearly {} FLOW",
        format_amount(
            pro_rata_yield(staking.total_staked, network.total_staked, epoch.total_rewards_paid),
            4
        ),
        format_amount(estimate_rewards(staking.total_staked, network.average_apr, 30.0), 4),
        format_amount(compound_rewards(staking.total_staked, network.average_apr, 365, 1.0), 4)
    );

    let progress = &staking.progress;
    info!(
        "Level {} | {} XP to next level | accuracy {}% | streak {}",
        progress.level(),
        progress.xp_to_next_level(),
        progress.accuracy_rate(),
        progress.current_streak
    );
    for category in ChallengeCategory::ALL {
        debug!(
            "{} challenges pay x{:.2}",
            category,
            challenge_multiplier(category.as_str())
        );
    }
}
