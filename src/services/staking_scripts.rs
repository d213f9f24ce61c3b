use crate::error::GatewayError;
use crate::models::{DelegatorRef, NodeOperator, StakingPosition};
use crate::services::cadence::CadenceValue;
use crate::services::gateway::ChainGateway;
use crate::utils::units::{from_smallest_unit, UNITS_PER_TOKEN};
use log::info;

pub const GET_DELEGATOR_IDS: &str = r#"
import FlowStakingCollection from 0xFlowStakingCollection

access(all) fun main(address: Address): [FlowStakingCollection.DelegatorInfo] {
    return FlowStakingCollection.getAllDelegatorInfo(address: address)
}
"#;

pub const GET_STAKING_INFO: &str = r#"
import FlowStakingCollection from 0xFlowStakingCollection

access(all) fun main(address: Address, nodeID: String, delegatorID: UInt32?): [UFix64; 5] {
    let tokensCommitted = FlowStakingCollection.getCommittedTokens(address: address, nodeID: nodeID, delegatorID: delegatorID) ?? 0.0
    let tokensStaked = FlowStakingCollection.getStakedTokens(address: address, nodeID: nodeID, delegatorID: delegatorID) ?? 0.0
    let tokensUnstaking = FlowStakingCollection.getUnstakingTokens(address: address, nodeID: nodeID, delegatorID: delegatorID) ?? 0.0
    let tokensUnstaked = FlowStakingCollection.getUnstakedTokens(address: address, nodeID: nodeID, delegatorID: delegatorID) ?? 0.0
    let tokensRewarded = FlowStakingCollection.getRewardTokens(address: address, nodeID: nodeID, delegatorID: delegatorID) ?? 0.0

    return [tokensCommitted, tokensStaked, tokensUnstaking, tokensUnstaked, tokensRewarded]
}
"#;

pub const GET_CURRENT_EPOCH: &str = r#"
import FlowIDTableStaking from 0xFlowIDTableStaking

access(all) fun main(): [AnyStruct] {
    let epochCounter = FlowIDTableStaking.getEpochCounter()
    let totalStaked = FlowIDTableStaking.getTotalStaked()
    let totalRewardsPaid = FlowIDTableStaking.getEpochTokenPayout()

    return [epochCounter, totalStaked, totalRewardsPaid]
}
"#;

pub const GET_AVAILABLE_NODES: &str = r#"
import FlowIDTableStaking from 0xFlowIDTableStaking

access(all) fun main(): [String] {
    return FlowIDTableStaking.getApprovedList() ?? []
}
"#;

pub const HAS_STAKING_COLLECTION: &str = r#"
import FlowStakingCollection from 0xFlowStakingCollection

access(all) fun main(address: Address): Bool {
    let account = getAccount(address)
    let cap = account.capabilities.get<&FlowStakingCollection.StakingCollection>(FlowStakingCollection.StakingCollectionPublicPath)
    return cap.check()
}
"#;

pub const GET_NETWORK_STATS: &str = r#"
import FlowIDTableStaking from 0xFlowIDTableStaking

access(all) fun main(): [UFix64; 3] {
    let totalStaked = FlowIDTableStaking.getTotalStaked()
    let approvedNodes = FlowIDTableStaking.getApprovedList()?.length ?? 0
    let totalRewards = FlowIDTableStaking.getEpochTokenPayout()

    return [totalStaked, UFix64(approvedNodes), totalRewards]
}
"#;

pub const GET_ACCOUNT_BALANCE: &str = r#"
import FungibleToken from 0xFungibleToken
import FlowToken from 0xFlowToken

access(all) fun main(address: Address): UFix64 {
    let account = getAccount(address)
    let vaultRef = account.capabilities
        .get(/public/flowTokenBalance)
        .borrow<&{FungibleToken.Balance}>()
        ?? panic("Could not borrow Balance reference to the Vault")

    return vaultRef.balance
}
"#;

/// Raw epoch figures, amounts in smallest units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochReading {
    pub counter: u64,
    pub total_staked_units: u64,
    pub total_rewards_units: u64,
}

/// Raw network figures, amounts in smallest units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkReading {
    pub total_staked_units: u64,
    pub total_nodes: u64,
    pub total_rewards_units: u64,
}

fn expect_len<'a>(
    value: &'a CadenceValue,
    len: usize,
    what: &str,
) -> Result<&'a [CadenceValue], GatewayError> {
    let items = value.as_array()?;
    if items.len() != len {
        return Err(GatewayError::UnexpectedValue(format!(
            "{} returned {} values, expected {}",
            what,
            items.len(),
            len
        )));
    }
    Ok(items)
}

pub async fn get_delegator_ids<G: ChainGateway + ?Sized>(
    gateway: &G,
    address: &str,
) -> Result<Vec<DelegatorRef>, GatewayError> {
    let response = gateway
        .execute_script(GET_DELEGATOR_IDS, &[CadenceValue::address(address)])
        .await?;

    let delegators = response
        .as_array()?
        .iter()
        .map(|info| {
            let delegator_id = match info.field("id")?.unwrap_optional() {
                Some(id) => Some(u32::try_from(id.as_u64()?).map_err(|_| {
                    GatewayError::UnexpectedValue(format!("delegator id out of range: {:?}", id))
                })?),
                None => None,
            };
            Ok(DelegatorRef {
                node_id: info.field("nodeID")?.as_str()?.to_string(),
                delegator_id,
            })
        })
        .collect::<Result<Vec<_>, GatewayError>>()?;

    info!("Found {} delegations for {}", delegators.len(), address);
    Ok(delegators)
}

pub async fn get_staking_info<G: ChainGateway + ?Sized>(
    gateway: &G,
    address: &str,
    node_id: &str,
    delegator_id: Option<u32>,
) -> Result<StakingPosition, GatewayError> {
    let args = [
        CadenceValue::address(address),
        CadenceValue::string(node_id),
        CadenceValue::optional(delegator_id.map(CadenceValue::uint32)),
    ];
    let response = gateway.execute_script(GET_STAKING_INFO, &args).await?;
    let items = expect_len(&response, 5, "staking info")?;

    let mut units = [0u64; 5];
    for (slot, item) in units.iter_mut().zip(items) {
        *slot = item.as_ufix64_units()?;
    }
    Ok(StakingPosition::from_units(node_id, delegator_id, units)?)
}

pub async fn get_current_epoch<G: ChainGateway + ?Sized>(
    gateway: &G,
) -> Result<EpochReading, GatewayError> {
    let response = gateway.execute_script(GET_CURRENT_EPOCH, &[]).await?;
    let items = expect_len(&response, 3, "epoch info")?;
    Ok(EpochReading {
        counter: items[0].as_u64()?,
        total_staked_units: items[1].as_ufix64_units()?,
        total_rewards_units: items[2].as_ufix64_units()?,
    })
}

pub async fn get_available_nodes<G: ChainGateway + ?Sized>(
    gateway: &G,
) -> Result<Vec<NodeOperator>, GatewayError> {
    let response = gateway.execute_script(GET_AVAILABLE_NODES, &[]).await?;
    response
        .as_array()?
        .iter()
        .map(|id| Ok(NodeOperator::approved(id.as_str()?)))
        .collect()
}

pub async fn has_staking_collection<G: ChainGateway + ?Sized>(
    gateway: &G,
    address: &str,
) -> Result<bool, GatewayError> {
    gateway
        .execute_script(HAS_STAKING_COLLECTION, &[CadenceValue::address(address)])
        .await?
        .as_bool()
}

pub async fn get_network_stats<G: ChainGateway + ?Sized>(
    gateway: &G,
) -> Result<NetworkReading, GatewayError> {
    let response = gateway.execute_script(GET_NETWORK_STATS, &[]).await?;
    let items = expect_len(&response, 3, "network stats")?;
    Ok(NetworkReading {
        total_staked_units: items[0].as_ufix64_units()?,
        // The node count comes back converted to UFix64
        total_nodes: items[1].as_ufix64_units()? / UNITS_PER_TOKEN,
        total_rewards_units: items[2].as_ufix64_units()?,
    })
}

/// Liquid FLOW balance of `address`, in whole tokens.
pub async fn get_account_balance<G: ChainGateway + ?Sized>(
    gateway: &G,
    address: &str,
) -> Result<f64, GatewayError> {
    let response = gateway
        .execute_script(GET_ACCOUNT_BALANCE, &[CadenceValue::address(address)])
        .await?;
    Ok(from_smallest_unit(response.as_ufix64_units()?)?)
}
