pub mod cadence;
pub mod dashboard;
pub mod flow_access;
pub mod gateway;
pub mod market_provider;
pub mod staking_scripts;
pub mod staking_transactions;
