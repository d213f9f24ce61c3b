use crate::calculations::validate_delegation_amount;
use crate::error::{CalcError, GatewayError};
use crate::models::SessionContext;
use crate::services::cadence::CadenceValue;
use crate::services::gateway::{
    ChainGateway, TransactionAuthorizer, UnsignedTransaction, DEFAULT_GAS_LIMIT,
};
use crate::utils::units::to_smallest_unit;
use log::info;

pub const SETUP_STAKING_COLLECTION: &str = r#"
import FlowStakingCollection from 0xFlowStakingCollection

transaction {
    prepare(signer: auth(BorrowValue, SaveValue, Capabilities) &Account) {
        if signer.storage.borrow<&FlowStakingCollection.StakingCollection>(from: FlowStakingCollection.StakingCollectionStoragePath) == nil {
            let stakingCollection <- FlowStakingCollection.createStakingCollection()
            signer.storage.save(<-stakingCollection, to: FlowStakingCollection.StakingCollectionStoragePath)

            signer.capabilities.unpublish(FlowStakingCollection.StakingCollectionPublicPath)
            let cap = signer.capabilities.storage.issue<&FlowStakingCollection.StakingCollection>(FlowStakingCollection.StakingCollectionStoragePath)
            signer.capabilities.publish(cap, at: FlowStakingCollection.StakingCollectionPublicPath)
        }
    }
}
"#;

pub const REGISTER_DELEGATOR: &str = r#"
import FlowStakingCollection from 0xFlowStakingCollection

transaction(id: String, amount: UFix64) {
    let stakingCollectionRef: auth(FlowStakingCollection.CollectionOwner) &FlowStakingCollection.StakingCollection

    prepare(account: auth(BorrowValue) &Account) {
        self.stakingCollectionRef = account.storage.borrow<auth(FlowStakingCollection.CollectionOwner) &FlowStakingCollection.StakingCollection>(from: FlowStakingCollection.StakingCollectionStoragePath)
            ?? panic("Could not borrow a reference to a StakingCollection in the primary user's account")
    }

    execute {
        self.stakingCollectionRef.registerDelegator(nodeID: id, amount: amount)
    }
}
"#;

async fn submit<G, A>(
    gateway: &G,
    authorizer: &A,
    session: &SessionContext,
    script: &str,
    arguments: Vec<CadenceValue>,
) -> Result<String, GatewayError>
where
    G: ChainGateway + ?Sized,
    A: TransactionAuthorizer + ?Sized,
{
    if !session.is_logged_in() {
        return Err(GatewayError::NotAuthenticated);
    }

    let reference_block_id = gateway.latest_block_id().await?;
    let unsigned = UnsignedTransaction {
        script: gateway.resolve_imports(script),
        arguments,
        reference_block_id,
        gas_limit: DEFAULT_GAS_LIMIT,
    };
    let signed = authorizer.authorize(session, unsigned).await?;
    gateway.send_transaction(&signed).await
}

/// One-time creation of the staking collection in the session's account.
pub async fn setup_staking_collection<G, A>(
    gateway: &G,
    authorizer: &A,
    session: &SessionContext,
) -> Result<String, GatewayError>
where
    G: ChainGateway + ?Sized,
    A: TransactionAuthorizer + ?Sized,
{
    let tx_id = submit(gateway, authorizer, session, SETUP_STAKING_COLLECTION, Vec::new()).await?;
    info!("Setup transaction sent: {}", tx_id);
    Ok(tx_id)
}

/// Delegates `amount` FLOW to `node_id` through the staking collection.
pub async fn register_delegator<G, A>(
    gateway: &G,
    authorizer: &A,
    session: &SessionContext,
    node_id: &str,
    amount: f64,
    min_delegation_amount: f64,
) -> Result<String, GatewayError>
where
    G: ChainGateway + ?Sized,
    A: TransactionAuthorizer + ?Sized,
{
    let amount = validate_delegation_amount(amount, min_delegation_amount)?;
    let units = to_smallest_unit(amount)?;
    let units: u64 = units
        .parse()
        .map_err(|_| CalcError::InvalidAmount(amount.to_string()))?;

    let arguments = vec![CadenceValue::string(node_id), CadenceValue::ufix64(units)];
    let tx_id = submit(gateway, authorizer, session, REGISTER_DELEGATOR, arguments).await?;
    info!("Delegated {} FLOW to node {}: {}", amount, node_id, tx_id);
    Ok(tx_id)
}
