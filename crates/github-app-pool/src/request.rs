//! Pool request parsing and validation
//!
//! Callers hand over a typed `PoolRequest` directly or parse one from loose
//! JSON with [`PoolRequest::from_value`], which enforces the request shape
//! eagerly. All validation runs before any client is built, so a doomed
//! request never spends a network round trip.

use github_app_auth::AppCredentials;
use serde::Deserialize;

use crate::error::{Error, Result};

/// One selection call's input: the ordered credential pool and the API
/// endpoint every client is bound to. Entry order defines index-based
/// identity for the whole run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRequest {
    pub apps: Vec<AppCredentials>,
    pub base_url: String,
}

impl PoolRequest {
    /// Parse a request from loose JSON, checking shape before content.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let Some(obj) = value.as_object() else {
            return Err(Error::InvalidRequest("request must be an object".into()));
        };

        let apps_value = obj.get("apps").cloned().unwrap_or(serde_json::Value::Null);
        if !apps_value.is_array() {
            return Err(Error::InvalidRequest("apps must be an array".into()));
        }

        let base_url = match obj.get("baseUrl") {
            Some(serde_json::Value::String(s)) => s.clone(),
            _ => return Err(Error::InvalidRequest("baseUrl must be a string".into())),
        };

        let apps: Vec<AppCredentials> = serde_json::from_value(apps_value)
            .map_err(|e| Error::InvalidRequest(format!("apps entry malformed: {e}")))?;

        Ok(Self { apps, base_url })
    }

    /// Check the pool invariants, cheapest first: emptiness, then endpoint
    /// shape, then per-entry completeness. An empty pool wins over any
    /// endpoint problem, so `EmptyPool` is reported regardless of the
    /// endpoint value.
    ///
    /// A request with any incomplete entry is rejected outright instead of
    /// silently filtered - proceeding with a reduced pool would shrink
    /// capacity without the caller noticing.
    pub fn validate(&self) -> Result<()> {
        if self.apps.is_empty() {
            return Err(Error::EmptyPool);
        }
        if self.base_url.is_empty() {
            return Err(Error::InvalidRequest(
                "baseUrl must be a non-empty string".into(),
            ));
        }
        let incomplete = self.apps.iter().filter(|app| !app.is_complete()).count();
        if incomplete > 0 {
            return Err(Error::IncompleteConfig(incomplete));
        }
        Ok(())
    }
}
