//! Remote document service collaborator.
//!
//! The transcoding layer never talks to the network itself. A client for the
//! document service is injected into the remote-document handler through
//! [`RemoteDocuments`]; timeouts and cancellation are the client's concern.

use bytes::Bytes;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("transfer failed: {0}")]
    Transfer(String),
}

/// Login details handed to [`RemoteDocuments::authenticate`]
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Confirmation returned by an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReceipt {
    pub resource_id: String,
}

/// Entry point of a document service client
pub trait RemoteDocuments: Send + Sync {
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn RemoteSession>, RemoteError>;
}

/// Authenticated session, used for a single handler call
pub trait RemoteSession {
    fn fetch(&self, link: &str) -> Result<Bytes, RemoteError>;

    fn upload(&self, data: Bytes, link: &str) -> Result<RemoteReceipt, RemoteError>;
}
