use std::sync::Arc;
use tinyrand::RandRange;
use tinyrand_std::thread_rand;

const VALID_CHARS: &[u8] = b"abcdefghjkmnpqrstuvwxyz23456789";

pub fn mini_id(length: usize) -> String {
    let mut rng = thread_rand();
    let mut id = String::with_capacity(length);
    let char_count = VALID_CHARS.len();

    for _ in 0..length {
        let idx = rng.next_range(0..char_count);
        id.push(VALID_CHARS[idx] as char);
    }

    id
}

/// Message ids sort roughly by creation time: millis prefix, random suffix.
pub fn message_id(timestamp_ms: i64) -> String {
    format!("{}-{}", timestamp_ms, mini_id(9))
}

/// Connection ids combine sender identity, registration time, and a random
/// suffix so concurrent connections from one user never collide.
pub fn connection_id(user_id: &str, timestamp_ms: i64) -> Arc<str> {
    Arc::from(format!("{}-{}-{}", user_id, timestamp_ms, mini_id(9)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn mini_id_length() {
        assert_eq!(mini_id(8).len(), 8);
        assert_eq!(mini_id(16).len(), 16);
    }

    #[test]
    fn mini_id_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            let id = mini_id(9);
            assert!(!ids.contains(&id), "Generated duplicate ID: {}", id);
            ids.insert(id);
        }
    }

    #[test]
    fn mini_id_character_set() {
        let valid_chars: HashSet<char> = VALID_CHARS.iter().map(|&b| b as char).collect();

        for _ in 0..100 {
            let id = mini_id(10);
            for c in id.chars() {
                assert!(
                    valid_chars.contains(&c),
                    "Generated ID contains invalid character: {}",
                    c
                );
            }
        }
    }

    #[test]
    fn connection_id_embeds_identity_and_time() {
        let id = connection_id("u1", 1700000000000);
        assert!(id.starts_with("u1-1700000000000-"));
        assert_eq!(id.len(), "u1-1700000000000-".len() + 9);
    }

    #[test]
    fn message_id_is_prefixed_by_timestamp() {
        let id = message_id(42);
        assert!(id.starts_with("42-"));
    }
}
