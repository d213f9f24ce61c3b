mod challenge;
mod epoch_snapshot;
mod market;
mod network_stats;
mod node_operator;
mod player_progress;
mod session;
mod staking_position;
mod user_staking;

pub use challenge::ChallengeCategory;
pub use epoch_snapshot::EpochSnapshot;
pub use market::{filter_markets, Market, MarketCategory};
pub use network_stats::NetworkStats;
pub use node_operator::{DelegatorRef, NodeOperator, CONSENSUS_NODE_ROLE};
pub use player_progress::PlayerProgress;
pub use session::SessionContext;
pub use staking_position::StakingPosition;
pub use user_staking::UserStakingSummary;
