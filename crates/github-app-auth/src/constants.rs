//! GitHub REST API constants

/// Default REST API endpoint. Callers override this per request for
/// GitHub Enterprise installations.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// REST API version pinned via the `X-GitHub-Api-Version` header.
pub const API_VERSION: &str = "2022-11-28";

/// Media type sent with every REST request.
pub const ACCEPT_MEDIA_TYPE: &str = "application/vnd.github+json";

/// User agent sent with every request. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("github-app-pool/", env!("CARGO_PKG_VERSION"));

/// App JWTs are accepted for at most 10 minutes.
pub const JWT_TTL_SECS: u64 = 600;

/// Backdate applied to the JWT issued-at claim to absorb clock drift
/// between us and GitHub.
pub const JWT_DRIFT_SECS: u64 = 60;
