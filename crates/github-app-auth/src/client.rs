//! Authenticated GitHub App client
//!
//! One client per pool entry, bound to one credential set and one API
//! endpoint. Construction only normalizes the private key; signing and
//! network errors surface at request time. When the credential names an
//! installation, the rate limit probe first exchanges the app JWT for an
//! installation access token so the snapshot reflects that installation's
//! quota rather than the app's.

use serde::Deserialize;
use tracing::debug;

use crate::constants::{ACCEPT_MEDIA_TYPE, API_VERSION, USER_AGENT};
use crate::credentials::AppCredentials;
use crate::error::{Error, Result};
use crate::jwt::sign_app_jwt;
use crate::key::normalize_private_key;

/// A rate limit snapshot as reported by `GET /rate_limit`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimit {
    pub limit: u64,
    pub used: u64,
    pub remaining: u64,
    /// Unix timestamp (seconds) at which the window resets.
    pub reset: u64,
}

/// Envelope around the top-level `rate` object. The per-resource breakdown
/// under `resources` is ignored; `rate` mirrors `resources.core`.
#[derive(Deserialize)]
struct RateLimitResponse {
    rate: RateLimit,
}

#[derive(Deserialize)]
struct InstallationToken {
    token: String,
}

/// An authenticated client bound to one credential and one API endpoint.
pub struct AppClient {
    http: reqwest::Client,
    base_url: String,
    credentials: AppCredentials,
    private_key_pem: String,
}

impl AppClient {
    /// Build a client for one credential against `base_url`.
    ///
    /// Fails only if the private key is neither PEM nor base64-encoded PEM.
    /// Everything else, including an unparseable RSA key, fails at request
    /// time.
    pub fn new(http: reqwest::Client, credentials: AppCredentials, base_url: &str) -> Result<Self> {
        let private_key_pem = normalize_private_key(credentials.private_key.expose())?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            private_key_pem,
        })
    }

    /// The app identifier this client authenticates as.
    pub fn app_id(&self) -> &str {
        &self.credentials.app_id
    }

    /// The API endpoint this client is bound to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credential this client was built from.
    pub fn credentials(&self) -> &AppCredentials {
        &self.credentials
    }

    /// Resolve the bearer token for API calls.
    ///
    /// App-level auth uses the JWT directly. Installation auth exchanges the
    /// JWT for an installation access token first.
    async fn bearer_token(&self) -> Result<String> {
        let jwt = sign_app_jwt(&self.credentials.app_id, &self.private_key_pem)?;
        let Some(installation_id) = self.credentials.installation_id else {
            return Ok(jwt);
        };

        let url = format!(
            "{}/app/installations/{installation_id}/access_tokens",
            self.base_url
        );
        let response = self
            .api_request(self.http.post(&url), &jwt)
            .send()
            .await
            .map_err(|e| Error::Http(format!("installation token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(Error::TokenExchange(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: InstallationToken = response
            .json()
            .await
            .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))?;
        debug!(
            app_id = %self.credentials.app_id,
            installation_id,
            "obtained installation access token"
        );
        Ok(token.token)
    }

    /// Probe the current rate limit for this client's identity.
    ///
    /// Read-only and free: GitHub does not count `/rate_limit` requests
    /// against the quota they report.
    pub async fn rate_limit(&self) -> Result<RateLimit> {
        let token = self.bearer_token().await?;
        let url = format!("{}/rate_limit", self.base_url);

        let response = self
            .api_request(self.http.get(&url), &token)
            .send()
            .await
            .map_err(|e| Error::Http(format!("rate limit request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RateLimitResponse = response
            .json()
            .await
            .map_err(|e| Error::Http(format!("invalid rate limit response: {e}")))?;

        debug!(
            app_id = %self.credentials.app_id,
            remaining = parsed.rate.remaining,
            limit = parsed.rate.limit,
            "rate limit probe"
        );
        Ok(parsed.rate)
    }

    /// Apply the standard GitHub headers and bearer auth.
    fn api_request(&self, builder: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(token)
            .header("accept", ACCEPT_MEDIA_TYPE)
            .header("user-agent", USER_AGENT)
            .header("x-github-api-version", API_VERSION)
    }
}
