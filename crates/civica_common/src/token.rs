//! Verification tokens for confirming a submission by email.
//!
//! A token is a short numeric value with an issue timestamp. There is
//! no token store: expiry is checked against the issue time carried by
//! the token itself. Default TTL is 24 hours.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default token lifetime in seconds (24 hours)
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Time-limited opaque value for confirming a submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationToken {
    value: String,
    issued_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Generate a fresh 6-digit token stamped with the current time
    pub fn generate() -> Self {
        let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
        Self {
            value: format!("{:06}", n),
            issued_at: Utc::now(),
        }
    }

    /// Rebuild a token from its parts (dev backends, tests)
    pub fn from_parts(value: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            issued_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// True once the token's age exceeds `ttl_secs`
    pub fn is_expired(&self, ttl_secs: u64) -> bool {
        let age = Utc::now().signed_duration_since(self.issued_at);
        age.num_seconds() > ttl_secs as i64
    }

    /// Check a candidate value against this token. Expired tokens are
    /// rejected as invalid even when the value matches. The comparison
    /// does not short-circuit on the first differing byte.
    pub fn verify(&self, candidate: &str, ttl_secs: u64) -> bool {
        if self.is_expired(ttl_secs) {
            return false;
        }
        let a = self.value.as_bytes();
        let b = candidate.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}
