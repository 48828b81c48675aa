//! Service interfaces for the document database, object storage and identity provider

pub mod local;

use thiserror::Error;

use crate::core::post::Post;
use crate::core::session::Identity;

/// Errors raised by backend services
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid object path: {0}")]
    InvalidPath(String),
    #[error("invalid input: {0}")]
    Invalid(String),
}

/// Write-once post collection
pub trait DocumentStore: Send + Sync {
    /// Create a post document
    fn create_post(&self, post: &Post) -> Result<(), BackendError>;

    /// Every readable post, in no particular order
    fn list_posts(&self) -> Result<Vec<Post>, BackendError>;

    /// Fetch a single post
    fn get_post(&self, id: &str) -> Result<Option<Post>, BackendError>;
}

/// Write-once blob storage
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path` and return a public reference URL
    fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<String, BackendError>;
}

/// Delegated sign-in
pub trait IdentityProvider: Send + Sync {
    fn current(&self) -> Option<Identity>;

    fn sign_in(&self, display_name: &str, avatar_url: Option<&str>) -> Result<Identity, BackendError>;

    fn sign_out(&self) -> Result<(), BackendError>;
}
