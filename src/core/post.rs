//! Feed posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::block::Block;
use super::ids::new_post_id;
use super::session::Identity;

/// What a post carries, tagged by the stored `type` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PostBody {
    /// Raw HTML/CSS snippet
    Text {
        #[serde(default)]
        code: String,
    },
    /// Block composition
    Block {
        #[serde(default)]
        blocks: Vec<Block>,
    },
}

impl PostBody {
    pub fn type_name(&self) -> &'static str {
        match self {
            PostBody::Text { .. } => "text",
            PostBody::Block { .. } => "block",
        }
    }
}

/// A published post. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_avatar: Option<String>,
    #[serde(flatten)]
    pub body: PostBody,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl Post {
    /// Snapshot a new post authored by `author`
    pub fn new(author: &Identity, body: PostBody, caption: impl Into<String>) -> Self {
        Self {
            id: new_post_id(),
            user_id: author.id.clone(),
            user_name: author.display_name.clone(),
            user_avatar: author.avatar_url.clone(),
            body,
            caption: caption.into(),
            likes: 0,
            comments: 0,
            created_at: Utc::now(),
            thumbnail: None,
        }
    }

    /// Name to show for the author, falling back when the stored name is blank
    pub fn author_label(&self) -> &str {
        if self.user_name.trim().is_empty() {
            "Anonymous"
        } else {
            &self.user_name
        }
    }
}

/// Order posts newest first
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Aggregate numbers shown on a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileStats {
    pub posts: usize,
    pub likes: u64,
    pub comments: u64,
}

/// Posts by `user_id` (keeping input order) and their totals
pub fn posts_by_user<'a>(posts: &'a [Post], user_id: &str) -> (Vec<&'a Post>, ProfileStats) {
    let mine: Vec<&Post> = posts.iter().filter(|p| p.user_id == user_id).collect();
    let stats = ProfileStats {
        posts: mine.len(),
        likes: mine.iter().map(|p| u64::from(p.likes)).sum(),
        comments: mine.iter().map(|p| u64::from(p.comments)).sum(),
    };
    (mine, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{BlockContent, BlockKind};
    use chrono::Duration;

    fn author() -> Identity {
        Identity {
            id: "u1".to_string(),
            display_name: "Ada".to_string(),
            avatar_url: Some("https://example.com/ada.png".to_string()),
        }
    }

    #[test]
    fn test_text_post_wire_format() {
        let post = Post::new(
            &author(),
            PostBody::Text {
                code: "<h1>hi</h1>".to_string(),
            },
            "first",
        );
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["code"], "<h1>hi</h1>");
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["userName"], "Ada");
        assert_eq!(value["userAvatar"], "https://example.com/ada.png");
        assert!(value.get("blocks").is_none());
        assert!(value["createdAt"].is_string());
        assert!(value["thumbnail"].is_null());
    }

    #[test]
    fn test_block_post_wire_format() {
        let post = Post::new(
            &author(),
            PostBody::Block {
                blocks: vec![Block::new("b1", BlockContent::default_for(BlockKind::Divider))],
            },
            "",
        );
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["type"], "block");
        assert_eq!(value["blocks"][0]["type"], "divider");
        assert!(value.get("code").is_none());

        let back: Post = serde_json::from_value(value).unwrap();
        assert_eq!(back, post);
    }

    #[test]
    fn test_sparse_document_uses_defaults() {
        let post: Post = serde_json::from_str(
            r#"{"id":"p","userId":"u","type":"block","createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(post.body, PostBody::Block { blocks: Vec::new() });
        assert_eq!(post.likes, 0);
        assert_eq!(post.author_label(), "Anonymous");
        assert!(post.user_avatar.is_none());
    }

    #[test]
    fn test_sort_and_profile_stats() {
        let base = Post::new(&author(), PostBody::Text { code: String::new() }, "");
        let mut older = base.clone();
        older.created_at = base.created_at - Duration::hours(1);
        older.likes = 3;
        let mut other = base.clone();
        other.user_id = "u2".to_string();
        other.created_at = base.created_at + Duration::hours(1);

        let mut posts = vec![older.clone(), base.clone(), other.clone()];
        sort_newest_first(&mut posts);
        assert_eq!(posts[0].user_id, "u2");
        assert_eq!(posts[2].created_at, older.created_at);

        let (mine, stats) = posts_by_user(&posts, "u1");
        assert_eq!(mine.len(), 2);
        assert_eq!(stats.posts, 2);
        assert_eq!(stats.likes, 3);
    }
}
