use serde::{Deserialize, Serialize};

/// Role id the staking table assigns to consensus nodes.
pub const CONSENSUS_NODE_ROLE: u8 = 4;

/// A node approved for delegation. Only the id is read from the chain;
/// the rest is filled with defaults until node details are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOperator {
    pub id: String,
    pub role: u8,
    pub tokens_staked: f64,
    pub delegators: u32,
    pub description: Option<String>,
}

impl NodeOperator {
    pub fn approved(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            description: Some(format!("Node {}", id)),
            id,
            role: CONSENSUS_NODE_ROLE,
            tokens_staked: 0.0,
            delegators: 0,
        }
    }
}

/// Points at one delegation inside a staking collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorRef {
    pub node_id: String,
    pub delegator_id: Option<u32>,
}
