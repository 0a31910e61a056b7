use std::fmt;

use sha2::{Digest, Sha256};

use super::ApiError;

/// Bearer token issued by the session provider and forwarded upstream as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Result<Self, ApiError> {
        let raw = raw.into();
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ApiError::MissingToken);
        }
        Ok(Self(raw.to_string()))
    }

    /// Parses an `Authorization` header value of the form `Bearer <token>`.
    pub fn from_authorization(header: &str) -> Result<Self, ApiError> {
        let (scheme, rest) = header.trim().split_once(' ').ok_or(ApiError::MissingToken)?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(ApiError::MissingToken);
        }
        Self::new(rest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short stable digest used to scope cached snapshots to one caller.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..8])
    }
}

// Never print the token itself.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self.fingerprint())
    }
}
