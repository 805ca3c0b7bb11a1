//! Unique document ID generation
//!
//! IDs follow the service's client-side convention: hex unix seconds, the
//! milliseconds as five zero-padded hex digits, then random hex padding.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;

/// Random hex digits appended after the timestamp
pub const ID_PADDING: usize = 7;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Issues document IDs, never repeating one within its lifetime
#[derive(Debug, Default)]
pub struct IdGenerator {
    issued: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh ID not issued before by this generator
    pub fn unique(&mut self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id = generate(Utc::now(), &mut rng);
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}

fn hex_timestamp(now: DateTime<Utc>) -> String {
    format!("{:x}{:05x}", now.timestamp(), now.timestamp_subsec_millis())
}

fn generate<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> String {
    let mut id = hex_timestamp(now);
    for _ in 0..ID_PADDING {
        id.push(HEX[rng.gen_range(0..HEX.len())] as char);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hex_timestamp_layout() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(hex_timestamp(now), "6553f1000007b");
    }

    #[test]
    fn test_generated_shape() {
        let id = IdGenerator::new().unique();
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_are_distinct_within_run() {
        let mut ids = IdGenerator::new();
        let issued: HashSet<String> = (0..500).map(|_| ids.unique()).collect();
        assert_eq!(issued.len(), 500);
    }
}
