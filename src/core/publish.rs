//! The publish chain: thumbnail upload, then the post document

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use super::ids::thumbnail_path;
use super::post::{Post, PostBody};
use super::session::Identity;
use crate::backend::{BackendError, DocumentStore, ObjectStorage};

/// Why a publish was aborted
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Sign in to publish")]
    NotSignedIn,
    #[error("Nothing to publish yet")]
    Empty,
    #[error("Failed to publish: {0}")]
    Backend(#[from] BackendError),
}

/// What the author is about to publish
#[derive(Debug, Clone)]
pub struct Draft {
    pub body: PostBody,
    pub caption: String,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        match &self.body {
            PostBody::Text { code } => code.trim().is_empty(),
            PostBody::Block { blocks } => blocks.is_empty(),
        }
    }
}

/// Runs the publish chain against the configured services
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn DocumentStore>,
    storage: Arc<dyn ObjectStorage>,
}

impl Publisher {
    pub fn new(store: Arc<dyn DocumentStore>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { store, storage }
    }

    /// Publish `draft` as `author`.
    ///
    /// Steps run strictly in order: upload the thumbnail (if any), then
    /// write the post. A thumbnail failure only drops the thumbnail; a
    /// failed write aborts without cleaning up an uploaded thumbnail.
    pub fn publish(
        &self,
        author: Option<&Identity>,
        draft: Draft,
        thumbnail: Option<Vec<u8>>,
    ) -> Result<Post, PublishError> {
        let author = author.ok_or(PublishError::NotSignedIn)?;
        if draft.is_empty() {
            return Err(PublishError::Empty);
        }

        let mut post = Post::new(author, draft.body, draft.caption);
        if let Some(bytes) = thumbnail {
            post.thumbnail = self.upload_thumbnail(&bytes);
        }

        self.store.create_post(&post)?;
        tracing::info!("Published {} post {}", post.body.type_name(), post.id);
        Ok(post)
    }

    fn upload_thumbnail(&self, bytes: &[u8]) -> Option<String> {
        let path = thumbnail_path(Utc::now());
        match self.storage.upload(&path, bytes, "image/jpeg") {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Thumbnail upload failed, publishing without it: {}", e);
                None
            }
        }
    }
}
