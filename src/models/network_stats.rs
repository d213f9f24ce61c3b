use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub total_staked: f64,
    pub total_nodes: u64,
    pub average_apr: f64,
}
