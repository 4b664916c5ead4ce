//! Node identifiers for generated rules.
//!
//! Identifiers only need to be unique within one document. Each source owns
//! the state it needs for that; nothing is shared between documents.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;

/// Length of the generated suffix (`DecisionRule_<id>`).
pub const ID_LEN: usize = 7;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random URL-safe identifiers, re-drawn on collision.
pub struct RandomIds {
    rng: StdRng,
    issued: HashSet<String>,
}

impl RandomIds {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            issued: HashSet::new(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            issued: HashSet::new(),
        }
    }

    fn draw(&mut self) -> String {
        (0..ID_LEN)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        loop {
            let id = self.draw();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}

/// Zero-padded base-36 counter: `0000000`, `0000001`, ...
///
/// Makes documents byte-for-byte reproducible.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let mut n = self.next;
        self.next += 1;

        let mut digits = [b'0'; ID_LEN];
        for slot in digits.iter_mut().rev() {
            let d = (n % 36) as u8;
            *slot = if d < 10 { b'0' + d } else { b'a' + d - 10 };
            n /= 36;
        }
        digits.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_unique_and_well_formed() {
        let mut ids = RandomIds::seeded(7);
        let drawn: Vec<String> = (0..5_000).map(|_| ids.next_id()).collect();
        let unique: HashSet<&String> = drawn.iter().collect();
        assert_eq!(unique.len(), drawn.len());
        assert!(drawn
            .iter()
            .all(|id| id.len() == ID_LEN && id.bytes().all(|b| ALPHABET.contains(&b))));
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = RandomIds::seeded(42);
        let mut b = RandomIds::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.next_id(), b.next_id());
        }
    }

    #[test]
    fn sequential_ids_count_in_base_36() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "0000000");
        assert_eq!(ids.next_id(), "0000001");
        for _ in 2..36 {
            ids.next_id();
        }
        assert_eq!(ids.next_id(), "0000010");
    }
}
