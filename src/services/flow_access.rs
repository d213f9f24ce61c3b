use crate::config::{Config, ContractAddresses};
use crate::error::GatewayError;
use crate::services::cadence::CadenceValue;
use crate::services::gateway::{ChainGateway, SignedTransaction, TransactionSignature};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{error, info, warn};
use reqwest::Client;
use serde_json::{json, Value};

/// Flow Access Node REST client with a secondary node to fall back on.
pub struct FlowAccessClient {
    http: Client,
    primary: String,
    secondary: String,
    contracts: ContractAddresses,
}

pub fn create_flow_connections(config: &Config) -> FlowAccessClient {
    info!("Connecting to Flow {}...", config.network);
    let client = FlowAccessClient::new(
        &config.primary_access_node,
        &config.secondary_access_node,
        config.contracts.clone(),
    );
    info!("Flow access node clients ready");
    client
}

impl FlowAccessClient {
    pub fn new(primary: &str, secondary: &str, contracts: ContractAddresses) -> Self {
        Self {
            http: Client::new(),
            primary: primary.trim_end_matches('/').to_string(),
            secondary: secondary.trim_end_matches('/').to_string(),
            contracts,
        }
    }

    async fn call(
        &self,
        label: &str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, GatewayError> {
        info!("Querying access node: {}", label);
        match self.send(&self.primary, path, body).await {
            Ok(response) => {
                info!("Access node query successful on primary: {}", label);
                Ok(response)
            }
            Err(e) if self.secondary == self.primary => {
                error!("Access node query failed: {:?}", e);
                Err(e)
            }
            Err(e) => {
                warn!("Primary access node failed ({}), trying secondary", e);
                match self.send(&self.secondary, path, body).await {
                    Ok(response) => {
                        info!("Access node query successful on secondary: {}", label);
                        Ok(response)
                    }
                    Err(e) => {
                        error!("Both access nodes failed: {:?}", e);
                        Err(e)
                    }
                }
            }
        }
    }

    async fn send(
        &self,
        base: &str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{}", base, path);
        let request = match body {
            Some(body) => self.http.post(&url).json(body),
            None => self.http.get(&url),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChainGateway for FlowAccessClient {
    async fn execute_script(
        &self,
        script: &str,
        args: &[CadenceValue],
    ) -> Result<CadenceValue, GatewayError> {
        let body = script_request_body(&self.resolve_imports(script), args)?;
        let response = self
            .call("execute_script", "/v1/scripts?block_height=sealed", Some(&body))
            .await?;
        decode_script_response(&response)
    }

    async fn latest_block_id(&self) -> Result<String, GatewayError> {
        let response = self.call("latest_block", "/v1/blocks?height=sealed", None).await?;
        response[0]["header"]["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::UnexpectedValue(format!("block response: {}", response)))
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<String, GatewayError> {
        let body = transaction_request_body(tx)?;
        let response = self.call("send_transaction", "/v1/transactions", Some(&body)).await?;
        let id = response["id"].as_str().ok_or_else(|| {
            GatewayError::UnexpectedValue(format!("transaction response: {}", response))
        })?;
        info!("Transaction submitted: {}", id);
        Ok(id.to_string())
    }

    fn resolve_imports(&self, source: &str) -> String {
        self.contracts.resolve_imports(source)
    }
}

fn encode_arguments(args: &[CadenceValue]) -> Result<Vec<String>, GatewayError> {
    args.iter()
        .map(|arg| -> Result<String, GatewayError> {
            Ok(STANDARD.encode(serde_json::to_vec(&arg.to_json())?))
        })
        .collect()
}

fn strip_0x(address: &str) -> &str {
    address.strip_prefix("0x").unwrap_or(address)
}

fn signatures_json(signatures: &[TransactionSignature]) -> Vec<Value> {
    signatures
        .iter()
        .map(|s| {
            json!({
                "address": strip_0x(&s.address),
                "key_index": s.key_index.to_string(),
                "signature": STANDARD.encode(&s.signature),
            })
        })
        .collect()
}

pub fn script_request_body(script: &str, args: &[CadenceValue]) -> Result<Value, GatewayError> {
    Ok(json!({
        "script": STANDARD.encode(script.as_bytes()),
        "arguments": encode_arguments(args)?,
    }))
}

/// The script endpoint answers with a JSON string holding base64 JSON-Cadence.
pub fn decode_script_response(response: &Value) -> Result<CadenceValue, GatewayError> {
    let encoded = response
        .as_str()
        .ok_or_else(|| GatewayError::UnexpectedValue(format!("script response: {}", response)))?;
    let decoded = STANDARD.decode(encoded.trim())?;
    let value: Value = serde_json::from_slice(&decoded)?;
    CadenceValue::from_json(&value)
}

pub fn transaction_request_body(tx: &SignedTransaction) -> Result<Value, GatewayError> {
    let unsigned = &tx.transaction;
    Ok(json!({
        "script": STANDARD.encode(unsigned.script.as_bytes()),
        "arguments": encode_arguments(&unsigned.arguments)?,
        "reference_block_id": unsigned.reference_block_id,
        "gas_limit": unsigned.gas_limit.to_string(),
        "payer": strip_0x(&tx.payer),
        "proposal_key": {
            "address": strip_0x(&tx.proposal_key.address),
            "key_index": tx.proposal_key.key_index.to_string(),
            "sequence_number": tx.proposal_key.sequence_number.to_string(),
        },
        "authorizers": tx.authorizers.iter().map(|a| strip_0x(a)).collect::<Vec<_>>(),
        "payload_signatures": signatures_json(&tx.payload_signatures),
        "envelope_signatures": signatures_json(&tx.envelope_signatures),
    }))
}
