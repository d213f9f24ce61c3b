use thiserror::Error;

/// Failures of the pure conversion and calculation helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Amount is negative, non-finite or not a number at all
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("delegation of {amount} is below the minimum of {minimum}")]
    BelowMinimumDelegation { amount: f64, minimum: f64 },
}

/// Errors raised while talking to a Flow access node.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("access node returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unexpected Cadence value: {0}")]
    UnexpectedValue(String),

    #[error(transparent)]
    Amount(#[from] CalcError),

    #[error("no authenticated wallet session")]
    NotAuthenticated,

    #[error("transaction authorization failed: {0}")]
    Authorization(String),
}

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("failed to read market file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse market file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("market {id} has odds {yes}/{no} which do not sum to 100")]
    InvalidOdds { id: String, yes: u8, no: u8 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },

    #[error("{var} is out of range: {value}")]
    OutOfRange { var: &'static str, value: String },
}
