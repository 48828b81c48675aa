//! Identifier and storage-path generation

use chrono::{DateTime, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of generated block identifiers
pub const BLOCK_ID_LEN: usize = 9;

/// Random lowercase base36 string of `len` characters
pub fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Generate a block id that does not collide with any of `existing`
pub fn fresh_block_id<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    loop {
        let candidate = random_base36(BLOCK_ID_LEN);
        if !existing.clone().into_iter().any(|id| id == candidate) {
            return candidate;
        }
    }
}

/// Generate a post id
pub fn new_post_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Object storage path for a block post thumbnail:
/// `thumbnails/block_<unix-millis>_<random>.jpg`
pub fn thumbnail_path(now: DateTime<Utc>) -> String {
    format!(
        "thumbnails/block_{}_{}.jpg",
        now.timestamp_millis(),
        random_base36(6)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_base36_charset() {
        let id = random_base36(32);
        assert_eq!(id.len(), 32);
        assert!(id.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_fresh_block_id_avoids_existing() {
        let existing: Vec<String> = (0..50).map(|_| random_base36(BLOCK_ID_LEN)).collect();
        let id = fresh_block_id(existing.iter().map(String::as_str));
        assert_eq!(id.len(), BLOCK_ID_LEN);
        assert!(!existing.contains(&id));
    }

    #[test]
    fn test_thumbnail_path_shape() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let path = thumbnail_path(now);
        let rest = path.strip_prefix("thumbnails/block_1709294400000_").unwrap();
        let random = rest.strip_suffix(".jpg").unwrap();
        assert_eq!(random.len(), 6);
    }
}
