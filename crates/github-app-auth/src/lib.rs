//! GitHub App authentication
//!
//! Turns a GitHub App credential set into an authenticated API client:
//! private key normalization (raw PEM or base64-encoded PEM), RS256 app JWT
//! signing, installation access token exchange, and the rate limit probe the
//! pool selector runs against each client.
//!
//! Clients are cheap, single-use handles. Construction only normalizes the
//! key; signing and network errors surface at request time.

pub mod client;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod jwt;
pub mod key;
mod secret;
#[cfg(test)]
pub(crate) mod testutil;

pub use client::{AppClient, RateLimit};
pub use credentials::AppCredentials;
pub use error::{Error, Result};
pub use key::normalize_private_key;
pub use secret::Secret;
