//! Session token primitives
//!
//! Tokens have the form `username.timestamp_ms.digest` where the digest is
//! SHA-256 over `username|timestamp|shared_secret`, rendered as 64 hex
//! characters. The shared secret is an i64; the special value 0 disables
//! auth checking entirely (enforced by the HTTP layer, which skips
//! validation when the secret is 0).
//!
//! This module contains only pure functions. HTTP concerns (cookie and
//! header extraction, status codes) live in the service crates.

use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Clock skew tolerance for tokens stamped slightly in the future (ms)
const FUTURE_SKEW_MS: i64 = 1_000;

/// Session token validation errors
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// Token does not have the `username.timestamp.digest` shape
    #[error("Malformed session token")]
    Malformed,

    /// Token is older than the configured maximum age
    #[error("Session expired: {age_ms}ms old (max {max_age_ms}ms)")]
    Expired { age_ms: i64, max_age_ms: i64 },

    /// Token timestamp is further in the future than clock skew allows
    #[error("Session timestamp {0}ms in the future")]
    FutureTimestamp(i64),

    /// Digest does not match the token contents
    #[error("Session digest mismatch")]
    DigestMismatch,
}

/// Current Unix epoch time in milliseconds
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Issue a session token for `username`, stamped with the current time
pub fn issue_token(username: &str, shared_secret: i64) -> String {
    let timestamp = now_ms();
    format!(
        "{}.{}.{}",
        username,
        timestamp,
        digest(username, timestamp, shared_secret)
    )
}

/// Validate a session token and return the username it carries
///
/// Checks, in order: token shape, timestamp window, digest.
pub fn validate_token(
    token: &str,
    shared_secret: i64,
    max_age_ms: i64,
) -> Result<String, SessionError> {
    // Usernames may contain dots; split from the right so the last two
    // fields are always timestamp and digest.
    let mut fields = token.rsplitn(3, '.');
    let provided_digest = fields.next().ok_or(SessionError::Malformed)?;
    let timestamp: i64 = fields
        .next()
        .ok_or(SessionError::Malformed)?
        .parse()
        .map_err(|_| SessionError::Malformed)?;
    let username = fields.next().ok_or(SessionError::Malformed)?;
    if username.is_empty() {
        return Err(SessionError::Malformed);
    }

    let age_ms = now_ms() - timestamp;
    if age_ms > max_age_ms {
        return Err(SessionError::Expired { age_ms, max_age_ms });
    }
    if age_ms < -FUTURE_SKEW_MS {
        return Err(SessionError::FutureTimestamp(-age_ms));
    }

    if provided_digest != digest(username, timestamp, shared_secret) {
        return Err(SessionError::DigestMismatch);
    }

    Ok(username.to_string())
}

/// SHA-256 digest over `username|timestamp|shared_secret` as 64 hex chars
fn digest(username: &str, timestamp: i64, shared_secret: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(b"|");
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(shared_secret.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a random non-zero shared secret
///
/// Used at startup when the configuration supplies none. Zero is excluded
/// because it means "auth disabled".
pub fn generate_shared_secret() -> i64 {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    loop {
        let secret: i64 = rng.gen();
        if secret != 0 {
            return secret;
        }
    }
}
