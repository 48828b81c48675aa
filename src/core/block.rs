//! Typed blocks for block-composed posts
//!
//! In memory every block carries a typed payload. On the wire a block is
//! `{ id, type, content }` with `content` always a string; card payloads
//! are JSON-encoded into that string. Conversion between the two shapes
//! happens only in the `RawBlock` impls below.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Kind of a block, as stored in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Text,
    Image,
    Button,
    Divider,
    Input,
    Card,
    Youtube,
}

impl BlockKind {
    /// Every kind, in toolbox order
    pub const ALL: [BlockKind; 8] = [
        BlockKind::Heading,
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Button,
        BlockKind::Divider,
        BlockKind::Input,
        BlockKind::Card,
        BlockKind::Youtube,
    ];

    /// Human-readable name shown in the toolbox
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Heading => "Heading",
            BlockKind::Text => "Text",
            BlockKind::Image => "Image",
            BlockKind::Button => "Button",
            BlockKind::Divider => "Divider",
            BlockKind::Input => "Input",
            BlockKind::Card => "Card",
            BlockKind::Youtube => "YouTube",
        }
    }
}

/// Structured payload of a card block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    pub title: String,
    pub desc: String,
    pub btn: String,
    pub img: String,
}

/// A single editable field of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Title,
    Desc,
    Btn,
    Img,
}

impl Card {
    /// Decode card JSON. Anything that is not a card object yields the empty card.
    pub fn decode(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Encode to the JSON string stored in a block's `content`
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn field(&self, field: CardField) -> &str {
        match field {
            CardField::Title => &self.title,
            CardField::Desc => &self.desc,
            CardField::Btn => &self.btn,
            CardField::Img => &self.img,
        }
    }

    pub fn field_mut(&mut self, field: CardField) -> &mut String {
        match field {
            CardField::Title => &mut self.title,
            CardField::Desc => &mut self.desc,
            CardField::Btn => &mut self.btn,
            CardField::Img => &mut self.img,
        }
    }
}

/// Typed content of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Heading(String),
    Text(String),
    /// Image URL
    Image(String),
    /// Button label
    Button(String),
    Divider,
    /// Input placeholder
    Input(String),
    Card(Card),
    /// YouTube URL as typed by the author
    Youtube(String),
}

impl BlockContent {
    /// Content a freshly appended block of `kind` starts with
    pub fn default_for(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Heading => BlockContent::Heading("New Heading".to_string()),
            BlockKind::Text => BlockContent::Text("Write something here...".to_string()),
            BlockKind::Image => BlockContent::Image(String::new()),
            BlockKind::Button => BlockContent::Button("Click me".to_string()),
            BlockKind::Divider => BlockContent::Divider,
            BlockKind::Input => BlockContent::Input("Type here...".to_string()),
            BlockKind::Card => BlockContent::Card(Card {
                title: "Card title".to_string(),
                desc: "Card description".to_string(),
                btn: "Learn more".to_string(),
                img: String::new(),
            }),
            BlockKind::Youtube => BlockContent::Youtube(String::new()),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Heading(_) => BlockKind::Heading,
            BlockContent::Text(_) => BlockKind::Text,
            BlockContent::Image(_) => BlockKind::Image,
            BlockContent::Button(_) => BlockKind::Button,
            BlockContent::Divider => BlockKind::Divider,
            BlockContent::Input(_) => BlockKind::Input,
            BlockContent::Card(_) => BlockKind::Card,
            BlockContent::Youtube(_) => BlockKind::Youtube,
        }
    }

    /// Build content of `kind` from its wire string
    pub fn from_raw(kind: BlockKind, raw: &str) -> Self {
        let raw = raw.to_string();
        match kind {
            BlockKind::Heading => BlockContent::Heading(raw),
            BlockKind::Text => BlockContent::Text(raw),
            BlockKind::Image => BlockContent::Image(raw),
            BlockKind::Button => BlockContent::Button(raw),
            BlockKind::Divider => BlockContent::Divider,
            BlockKind::Input => BlockContent::Input(raw),
            BlockKind::Card => BlockContent::Card(Card::decode(&raw)),
            BlockKind::Youtube => BlockContent::Youtube(raw),
        }
    }

    /// The wire string for this content
    pub fn to_raw(&self) -> String {
        match self {
            BlockContent::Heading(s)
            | BlockContent::Text(s)
            | BlockContent::Image(s)
            | BlockContent::Button(s)
            | BlockContent::Input(s)
            | BlockContent::Youtube(s) => s.clone(),
            BlockContent::Divider => String::new(),
            BlockContent::Card(card) => card.encode(),
        }
    }
}

/// A block within a block document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub struct Block {
    pub id: String,
    pub content: BlockContent,
}

impl Block {
    pub fn new(id: impl Into<String>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            content,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }
}

/// Persisted shape of a block
#[derive(Serialize, Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    kind: BlockKind,
    #[serde(default)]
    content: String,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Block {
            id: raw.id,
            content: BlockContent::from_raw(raw.kind, &raw.content),
        }
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        RawBlock {
            kind: block.kind(),
            content: block.content.to_raw(),
            id: block.id,
        }
    }
}

fn youtube_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^.*(?:youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*)")
            .expect("youtube regex should compile")
    })
}

/// Extract the 11-character video id from a YouTube URL
pub fn youtube_id(url: &str) -> Option<&str> {
    let caps = youtube_regex().captures(url.trim())?;
    let id = caps.get(1)?.as_str();
    let valid = id.chars().count() == 11
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    valid.then_some(id)
}

/// Still-image preview for a video id
pub fn youtube_thumbnail_url(id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id)
}

pub fn youtube_watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_round_trip() {
        let card = Card {
            title: "Hello \"world\"".to_string(),
            desc: "line one\nline two".to_string(),
            btn: "Go →".to_string(),
            img: "https://example.com/a.png".to_string(),
        };
        assert_eq!(Card::decode(&card.encode()), card);
    }

    #[test]
    fn test_card_decode_fallback() {
        assert_eq!(Card::decode("not json"), Card::default());
        assert_eq!(Card::decode(""), Card::default());
        assert_eq!(Card::decode("[1, 2]"), Card::default());
        assert_eq!(Card::decode("{\"title\": 5}"), Card::default());
    }

    #[test]
    fn test_card_decode_partial_object() {
        let card = Card::decode(r#"{"title":"Only title"}"#);
        assert_eq!(card.title, "Only title");
        assert_eq!(card.desc, "");
    }

    #[test]
    fn test_block_wire_format() {
        let block = Block::new("abc123def", BlockContent::default_for(BlockKind::Card));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["id"], "abc123def");
        assert_eq!(value["type"], "card");
        let content = value["content"].as_str().unwrap();
        assert_eq!(Card::decode(content).title, "Card title");

        let back: Block = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_block_with_bad_card_json_decodes() {
        let block: Block =
            serde_json::from_str(r#"{"id":"x","type":"card","content":"{oops"}"#).unwrap();
        assert_eq!(block.content, BlockContent::Card(Card::default()));
    }

    #[test]
    fn test_block_missing_content_defaults_to_empty() {
        let block: Block = serde_json::from_str(r#"{"id":"x","type":"text"}"#).unwrap();
        assert_eq!(block.content, BlockContent::Text(String::new()));
    }

    #[test]
    fn test_youtube_id_formats() {
        let id = "dQw4w9WgXcQ";
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=share",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
        ] {
            assert_eq!(youtube_id(url), Some(id), "url: {}", url);
        }
    }

    #[test]
    fn test_youtube_id_rejects_unparseable() {
        assert_eq!(youtube_id(""), None);
        assert_eq!(youtube_id("https://example.com/video"), None);
        assert_eq!(youtube_id("https://youtu.be/short"), None);
        assert_eq!(youtube_id("https://www.youtube.com/watch?v=waytoolongvideoid"), None);
        // 11 bytes but only 6 characters
        assert_eq!(youtube_id("https://youtu.be/ééééé1"), None);
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXc!"), None);
    }

    #[test]
    fn test_defaults_keep_their_kind() {
        for kind in BlockKind::ALL {
            let content = BlockContent::default_for(kind);
            assert_eq!(content.kind(), kind);
            assert_eq!(BlockContent::from_raw(kind, &content.to_raw()), content);
        }
    }
}
