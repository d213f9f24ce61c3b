use chrono::{DateTime, Utc};

/// Wallet session state, passed explicitly to whatever needs the current
/// account. Replacing the value is the only way it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    address: Option<String>,
    credit_last_refresh: DateTime<Utc>,
}

impl SessionContext {
    pub fn logged_out(now: DateTime<Utc>) -> Self {
        Self {
            address: None,
            credit_last_refresh: now,
        }
    }

    pub fn logged_in(address: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            address: Some(address.into()),
            credit_last_refresh: now,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.address.is_some()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn credit_last_refresh(&self) -> DateTime<Utc> {
        self.credit_last_refresh
    }

    pub fn with_credits_refreshed(self, now: DateTime<Utc>) -> Self {
        Self {
            credit_last_refresh: now,
            ..self
        }
    }

    /// Address shortened for greetings, e.g. `0x1234ab...cdef01`.
    pub fn short_address(&self) -> Option<String> {
        let address = self.address.as_deref()?;
        if address.len() <= 14 || !address.is_ascii() {
            return Some(address.to_string());
        }
        Some(format!("{}...{}", &address[..8], &address[address.len() - 6..]))
    }
}
