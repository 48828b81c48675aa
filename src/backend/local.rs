//! Filesystem-backed implementation of the backend services
//!
//! Layout under the data directory:
//! - `posts/<id>.json`: one post document per file
//! - `<object path>`: uploaded blobs, e.g. `thumbnails/block_..._x.jpg`
//! - `identity.json`: the signed-in identity, absent when signed out

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use walkdir::WalkDir;

use super::{BackendError, DocumentStore, IdentityProvider, ObjectStorage};
use crate::core::post::Post;
use crate::core::session::Identity;

const POSTS_DIR: &str = "posts";
const IDENTITY_FILE: &str = "identity.json";

/// Document store and object storage rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn posts_dir(&self) -> PathBuf {
        self.root.join(POSTS_DIR)
    }

    fn post_path(&self, id: &str) -> Result<PathBuf, BackendError> {
        if id.is_empty() || id.contains(['/', '\\', '.']) {
            return Err(BackendError::InvalidPath(id.to_string()));
        }
        Ok(self.posts_dir().join(format!("{}.json", id)))
    }

    /// Resolve an object path, refusing anything that escapes the root
    fn object_path(&self, path: &str) -> Result<PathBuf, BackendError> {
        let relative = Path::new(path);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !plain {
            return Err(BackendError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

/// Create `path` and write `bytes`, failing if it already exists
fn write_new(path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(bytes)?;
    Ok(())
}

impl DocumentStore for LocalBackend {
    fn create_post(&self, post: &Post) -> Result<(), BackendError> {
        let path = self.post_path(&post.id)?;
        let bytes = serde_json::to_vec_pretty(post)?;
        write_new(&path, &bytes)?;
        tracing::info!("Created post {} ({})", post.id, post.body.type_name());
        Ok(())
    }

    fn list_posts(&self) -> Result<Vec<Post>, BackendError> {
        let dir = self.posts_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        for entry in WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().map(|ext| ext == "json").unwrap_or(false))
        {
            let parsed = fs::read(entry.path())
                .map_err(BackendError::from)
                .and_then(|bytes| serde_json::from_slice::<Post>(&bytes).map_err(BackendError::from));
            match parsed {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Skipping unreadable post {}: {}", entry.path().display(), e),
            }
        }
        Ok(posts)
    }

    fn get_post(&self, id: &str) -> Result<Option<Post>, BackendError> {
        let path = self.post_path(id)?;
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

impl ObjectStorage for LocalBackend {
    fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<String, BackendError> {
        let target = self.object_path(path)?;
        write_new(&target, bytes)?;
        let absolute = fs::canonicalize(&target)?;
        tracing::info!(
            "Uploaded {} ({} bytes, {})",
            path,
            bytes.len(),
            content_type
        );
        Ok(format!("file://{}", absolute.display()))
    }
}

/// Identity provider that keeps the signed-in user in a local file.
///
/// Display names map to stable ids, so signing in again under the same
/// name reaches the same posts.
pub struct LocalIdentity {
    path: PathBuf,
    current: Mutex<Option<Identity>>,
}

impl LocalIdentity {
    /// Load the persisted identity under `root`, if any
    pub fn open(root: impl AsRef<Path>) -> Self {
        let path = root.as_ref().join(IDENTITY_FILE);
        let current = fs::read(&path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok());
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    fn user_id(display_name: &str) -> String {
        let key = display_name.trim().to_lowercase();
        uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
    }
}

impl IdentityProvider for LocalIdentity {
    fn current(&self) -> Option<Identity> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn sign_in(&self, display_name: &str, avatar_url: Option<&str>) -> Result<Identity, BackendError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(BackendError::Invalid("display name is empty".to_string()));
        }
        let identity = Identity {
            id: Self::user_id(name),
            display_name: name.to_string(),
            avatar_url: avatar_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&identity)?)?;
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
        Ok(identity)
    }

    fn sign_out(&self) -> Result<(), BackendError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::post::PostBody;

    fn author() -> Identity {
        Identity {
            id: "u1".to_string(),
            display_name: "Ada".to_string(),
            avatar_url: None,
        }
    }

    #[test]
    fn test_create_and_list_posts() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new(dir.path());
        assert!(backend.list_posts().unwrap().is_empty());

        let post = Post::new(&author(), PostBody::Text { code: "<p>x</p>".to_string() }, "cap");
        backend.create_post(&post).unwrap();

        let listed = backend.list_posts().unwrap();
        assert_eq!(listed, vec![post.clone()]);
        assert_eq!(backend.get_post(&post.id).unwrap(), Some(post.clone()));
        assert_eq!(backend.get_post("00000000-0000-0000-0000-000000000000").unwrap(), None);
    }

    #[test]
    fn test_posts_are_write_once() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new(dir.path());
        let post = Post::new(&author(), PostBody::Block { blocks: Vec::new() }, "");
        backend.create_post(&post).unwrap();
        assert!(matches!(backend.create_post(&post), Err(BackendError::Io(_))));
    }

    #[test]
    fn test_list_skips_malformed_documents() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new(dir.path());
        fs::create_dir_all(dir.path().join(POSTS_DIR)).unwrap();
        fs::write(dir.path().join(POSTS_DIR).join("junk.json"), "{not json").unwrap();
        let post = Post::new(&author(), PostBody::Text { code: String::new() }, "");
        backend.create_post(&post).unwrap();
        assert_eq!(backend.list_posts().unwrap().len(), 1);
    }

    #[test]
    fn test_upload_returns_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new(dir.path());
        let url = backend
            .upload("thumbnails/block_1_abc.jpg", b"jpeg", "image/jpeg")
            .unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("thumbnails/block_1_abc.jpg"));
        assert_eq!(fs::read(dir.path().join("thumbnails/block_1_abc.jpg")).unwrap(), b"jpeg");
    }

    #[test]
    fn test_upload_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new(dir.path());
        for bad in ["", "../x.jpg", "/etc/x.jpg", "thumbnails/../../x.jpg"] {
            assert!(matches!(
                backend.upload(bad, b"x", "image/jpeg"),
                Err(BackendError::InvalidPath(_))
            ));
        }
    }

    #[test]
    fn test_local_identity_persists() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalIdentity::open(dir.path());
        assert!(provider.current().is_none());

        let first = provider.sign_in("  Ada ", Some(" ")).unwrap();
        assert_eq!(first.display_name, "Ada");
        assert!(first.avatar_url.is_none());

        let reopened = LocalIdentity::open(dir.path());
        assert_eq!(reopened.current(), Some(first.clone()));

        reopened.sign_out().unwrap();
        assert!(LocalIdentity::open(dir.path()).current().is_none());

        let again = reopened.sign_in("ada", None).unwrap();
        assert_eq!(again.id, first.id);
        assert!(reopened.sign_in("   ", None).is_err());
    }
}
