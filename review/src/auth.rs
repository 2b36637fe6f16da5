use std::collections::HashMap;

use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};

/// The authenticated submitter of a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("malformed token entry `{0}`, expected `token:id:name`")]
    MalformedEntry(String),

    #[error("{0}")]
    Any(#[from] anyhow::Error),
}

/// Resolves a bearer token to the identity it was issued for.
///
/// `Ok(None)` means the token is unknown or no longer valid, errors are
/// reserved for the verifier itself being unavailable.
#[async_trait]
pub trait Verifier: DynClone + Send + Sync {
    async fn verify(&self, token: &'_ str) -> Result<Option<Identity>, VerifyError>;
}

dyn_clone::clone_trait_object!(Verifier);

/// Fixed token table, for development setups and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticVerifier(HashMap<String, Identity>);

impl StaticVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.0.insert(token.into(), identity);
        self
    }

    /// Reads comma separated `token:id:name` entries. The name may itself
    /// contain colons.
    pub fn parse(entries: &str) -> Result<Self, VerifyError> {
        let mut verifier = Self::new();

        for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let mut parts = entry.splitn(3, ':');

            let (Some(token), Some(id), Some(name)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(VerifyError::MalformedEntry(entry.to_owned()));
            };

            if token.is_empty() || id.is_empty() {
                return Err(VerifyError::MalformedEntry(entry.to_owned()));
            }

            verifier = verifier.token(token, Identity::new(id, name));
        }

        Ok(verifier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[async_trait]
impl Verifier for StaticVerifier {
    async fn verify(&self, token: &'_ str) -> Result<Option<Identity>, VerifyError> {
        Ok(self.0.get(token).cloned())
    }
}
