use crate::error::GatewayError;
use crate::models::SessionContext;
use crate::services::cadence::CadenceValue;
use async_trait::async_trait;

pub const DEFAULT_GAS_LIMIT: u64 = 9999;

/// Read and write access to the chain.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Runs a read-only Cadence script against the latest sealed block.
    async fn execute_script(
        &self,
        script: &str,
        args: &[CadenceValue],
    ) -> Result<CadenceValue, GatewayError>;

    /// Id of the latest sealed block, used as a transaction reference block.
    async fn latest_block_id(&self) -> Result<String, GatewayError>;

    /// Submits a fully signed transaction and returns its id.
    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<String, GatewayError>;

    /// Rewrites contract import placeholders into deployed addresses.
    fn resolve_imports(&self, source: &str) -> String {
        source.to_string()
    }
}

/// A transaction ready to be signed by the wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTransaction {
    pub script: String,
    pub arguments: Vec<CadenceValue>,
    pub reference_block_id: String,
    pub gas_limit: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProposalKey {
    pub address: String,
    pub key_index: u32,
    pub sequence_number: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSignature {
    pub address: String,
    pub key_index: u32,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    pub transaction: UnsignedTransaction,
    pub payer: String,
    pub proposal_key: ProposalKey,
    pub authorizers: Vec<String>,
    pub payload_signatures: Vec<TransactionSignature>,
    pub envelope_signatures: Vec<TransactionSignature>,
}

/// The wallet side of a mutation: picks proposer, payer and authorizers
/// for the session's account and signs the transaction. A refused or failed
/// signature is reported as `GatewayError::Authorization`.
#[async_trait]
pub trait TransactionAuthorizer: Send + Sync {
    async fn authorize(
        &self,
        session: &SessionContext,
        tx: UnsignedTransaction,
    ) -> Result<SignedTransaction, GatewayError>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Gateway answering scripts from a fixed table and recording submissions.
    #[derive(Default)]
    pub struct MockGateway {
        responses: HashMap<String, CadenceValue>,
        pub calls: Mutex<Vec<(String, Vec<CadenceValue>)>>,
        pub sent: Mutex<Vec<SignedTransaction>>,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_script(mut self, script: &str, response: CadenceValue) -> Self {
            self.responses.insert(script.to_string(), response);
            self
        }

        pub fn call_count(&self, script: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(s, _)| s == script)
                .count()
        }
    }

    #[async_trait]
    impl ChainGateway for MockGateway {
        async fn execute_script(
            &self,
            script: &str,
            args: &[CadenceValue],
        ) -> Result<CadenceValue, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((script.to_string(), args.to_vec()));
            self.responses.get(script).cloned().ok_or(GatewayError::Status {
                status: 400,
                body: "script not mocked".to_string(),
            })
        }

        async fn latest_block_id(&self) -> Result<String, GatewayError> {
            Ok("7bc42fe85d32ca513769a74f97f7e1a7bad6c9407f0d934c2aa645ef9cf613c7".to_string())
        }

        async fn send_transaction(&self, tx: &SignedTransaction) -> Result<String, GatewayError> {
            let mut sent = self.sent.lock().unwrap();
            sent.push(tx.clone());
            Ok(format!("tx-{}", sent.len()))
        }

        fn resolve_imports(&self, source: &str) -> String {
            source.replace("0xFlowStakingCollection", "0x01")
        }
    }

    /// Signs with a single fixed key for the session's address.
    pub struct MockAuthorizer;

    #[async_trait]
    impl TransactionAuthorizer for MockAuthorizer {
        async fn authorize(
            &self,
            session: &SessionContext,
            tx: UnsignedTransaction,
        ) -> Result<SignedTransaction, GatewayError> {
            let address = session
                .address()
                .ok_or(GatewayError::NotAuthenticated)?
                .to_string();
            let signature = TransactionSignature {
                address: address.clone(),
                key_index: 0,
                signature: vec![0xab, 0xcd],
            };
            Ok(SignedTransaction {
                transaction: tx,
                payer: address.clone(),
                proposal_key: ProposalKey {
                    address: address.clone(),
                    key_index: 0,
                    sequence_number: 1,
                },
                authorizers: vec![address],
                payload_signatures: Vec::new(),
                envelope_signatures: vec![signature],
            })
        }
    }
}
