//! Ordered block document edited by the block editor

use serde::{Deserialize, Serialize};

use super::block::{Block, BlockContent, BlockKind, CardField};
use super::ids::fresh_block_id;

/// An ordered list of blocks. Position is the index; there is no separate order field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockDocument {
    blocks: Vec<Block>,
}

impl BlockDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Append a block of `kind` with its default content, returning the new id
    pub fn append(&mut self, kind: BlockKind) -> String {
        let id = fresh_block_id(self.blocks.iter().map(|b| b.id.as_str()));
        self.blocks
            .push(Block::new(id.clone(), BlockContent::default_for(kind)));
        id
    }

    /// Remove the block with `id`. Returns whether a block was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        self.blocks.len() != before
    }

    /// Replace the primary string content of block `id`.
    ///
    /// Card blocks take card JSON here; malformed JSON leaves an empty card.
    pub fn update_content(&mut self, id: &str, content: &str) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(block) => {
                block.content = BlockContent::from_raw(block.kind(), content);
                true
            }
            None => false,
        }
    }

    /// Set one field of a card block. Returns false if `id` is missing or not a card.
    pub fn update_card(&mut self, id: &str, field: CardField, value: &str) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(Block {
                content: BlockContent::Card(card),
                ..
            }) => {
                *card.field_mut(field) = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Move the block at `from` so it ends up at index `to`.
    ///
    /// `to` is clamped to the last index; an out-of-range `from` does nothing.
    pub fn move_block(&mut self, from: usize, to: usize) {
        if from >= self.blocks.len() {
            return;
        }
        let to = to.min(self.blocks.len() - 1);
        if from == to {
            return;
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::Card;

    fn ids(doc: &BlockDocument) -> Vec<String> {
        doc.blocks().iter().map(|b| b.id.clone()).collect()
    }

    fn sample(n: usize) -> BlockDocument {
        let mut doc = BlockDocument::new();
        for i in 0..n {
            doc.append(BlockKind::ALL[i % BlockKind::ALL.len()]);
        }
        doc
    }

    #[test]
    fn test_append_adds_unique_id() {
        let mut doc = sample(20);
        let before = ids(&doc);
        let id = doc.append(BlockKind::Text);
        assert_eq!(doc.len(), before.len() + 1);
        assert!(!before.contains(&id));
        assert_eq!(doc.blocks().last().map(|b| b.id.as_str()), Some(id.as_str()));
        assert_eq!(
            doc.get(&id).map(|b| &b.content),
            Some(&BlockContent::default_for(BlockKind::Text))
        );
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut doc = sample(6);
        let before = ids(&doc);
        assert!(doc.remove(&before[2]));
        let expected: Vec<String> = before
            .iter()
            .filter(|id| **id != before[2])
            .cloned()
            .collect();
        assert_eq!(ids(&doc), expected);
        assert!(!doc.remove("missing"));
        assert_eq!(doc.len(), 5);
    }

    #[test]
    fn test_move_block_list_semantics() {
        let mut doc = sample(5);
        let before = ids(&doc);

        doc.move_block(0, 3);
        let after = ids(&doc);
        assert_eq!(after[3], before[0]);
        assert_eq!(
            after.iter().filter(|id| **id != before[0]).collect::<Vec<_>>(),
            before.iter().skip(1).collect::<Vec<_>>()
        );

        doc.move_block(4, 1);
        let moved = ids(&doc);
        assert_eq!(moved[1], after[4]);
        assert_eq!(
            moved.iter().filter(|id| **id != after[4]).collect::<Vec<_>>(),
            after.iter().take(4).collect::<Vec<_>>()
        );
        let mut sorted_before = before.clone();
        let mut sorted_after = moved.clone();
        sorted_before.sort();
        sorted_after.sort();
        assert_eq!(sorted_before, sorted_after);
    }

    #[test]
    fn test_move_block_bounds() {
        let mut doc = sample(3);
        let before = ids(&doc);
        doc.move_block(7, 0);
        assert_eq!(ids(&doc), before);

        doc.move_block(0, 99);
        assert_eq!(ids(&doc), vec![before[1].clone(), before[2].clone(), before[0].clone()]);
    }

    #[test]
    fn test_update_content_accepts_any_string() {
        let mut doc = BlockDocument::new();
        let id = doc.append(BlockKind::Heading);
        assert!(doc.update_content(&id, ""));
        assert_eq!(doc.get(&id).unwrap().content, BlockContent::Heading(String::new()));
        assert!(!doc.update_content("nope", "x"));
    }

    #[test]
    fn test_card_update_path_round_trips() {
        let mut doc = BlockDocument::new();
        let id = doc.append(BlockKind::Card);
        doc.update_card(&id, CardField::Title, "T");
        doc.update_card(&id, CardField::Desc, "D");
        doc.update_card(&id, CardField::Btn, "B");
        doc.update_card(&id, CardField::Img, "https://example.com/i.png");

        let json = serde_json::to_string(&doc).unwrap();
        let back: BlockDocument = serde_json::from_str(&json).unwrap();
        let expected = Card {
            title: "T".to_string(),
            desc: "D".to_string(),
            btn: "B".to_string(),
            img: "https://example.com/i.png".to_string(),
        };
        assert_eq!(back.get(&id).unwrap().content, BlockContent::Card(expected));
    }

    #[test]
    fn test_update_card_rejects_non_card() {
        let mut doc = BlockDocument::new();
        let id = doc.append(BlockKind::Text);
        assert!(!doc.update_card(&id, CardField::Title, "x"));
    }

    #[test]
    fn test_update_content_card_invalid_json() {
        let mut doc = BlockDocument::new();
        let id = doc.append(BlockKind::Card);
        doc.update_content(&id, "{broken");
        assert_eq!(doc.get(&id).unwrap().content, BlockContent::Card(Card::default()));
    }
}
