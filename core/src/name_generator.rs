//! Display names for customers.
//!
//! The simulator depends only on `NameSource`; names never influence a
//! trajectory. `NameGenerator` draws from its own RNG stream so that
//! replacing it with `SequentialNames` leaves chain draws untouched.

use crate::rng::SimRng;

pub trait NameSource: Send {
    fn next_name(&mut self) -> String;
}

/// Deterministic full-name generator over curated lists.
pub struct NameGenerator {
    rng: SimRng,
}

impl NameGenerator {
    pub fn new(rng: SimRng) -> Self {
        Self { rng }
    }

    /// Generate a full name (first + last).
    pub fn generate_full_name(&mut self) -> String {
        let first = Self::pick(&mut self.rng, FIRST_NAMES);
        let last = Self::pick(&mut self.rng, LAST_NAMES);
        format!("{first} {last}")
    }

    fn pick(rng: &mut SimRng, names: &'static [&'static str]) -> &'static str {
        names[rng.next_u64_below(names.len() as u64) as usize]
    }
}

impl NameSource for NameGenerator {
    fn next_name(&mut self) -> String {
        self.generate_full_name()
    }
}

/// `customer-000001`, `customer-000002`, ... for tests and headless runs.
#[derive(Debug, Default)]
pub struct SequentialNames {
    issued: u64,
}

impl NameSource for SequentialNames {
    fn next_name(&mut self) -> String {
        self.issued += 1;
        format!("customer-{:06}", self.issued)
    }
}

const FIRST_NAMES: &[&str] = &[
    "Ada", "Amara", "Anton", "Beatriz", "Bjorn", "Camille", "Chidi", "Dara", "Dmitri",
    "Elif", "Emeka", "Esther", "Farah", "Felix", "Greta", "Hana", "Hugo", "Ines",
    "Ivan", "Jamal", "Jonas", "Keiko", "Kofi", "Lena", "Luca", "Maya", "Mateo",
    "Nadia", "Nikos", "Olga", "Omar", "Priya", "Quentin", "Rafael", "Rosa", "Sami",
    "Sofia", "Tariq", "Tessa", "Uma", "Viktor", "Wen", "Yara", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abara", "Becker", "Castillo", "Dubois", "Eriksen", "Fontaine", "Garcia", "Haddad",
    "Ivanova", "Jensen", "Kowalski", "Lindqvist", "Moreau", "Nakamura", "Okafor",
    "Petrov", "Quinn", "Rossi", "Schmidt", "Tanaka", "Urquhart", "Varga", "Weber",
    "Xu", "Yilmaz", "Zielinski", "Andersen", "Bianchi", "Costa", "Dimitrov",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    #[test]
    fn name_generation_is_deterministic() {
        let mut a = NameGenerator::new(RngBank::new(12345).for_stream(StreamSlot::Identity));
        let mut b = NameGenerator::new(RngBank::new(12345).for_stream(StreamSlot::Identity));
        for _ in 0..20 {
            assert_eq!(a.next_name(), b.next_name(), "Same seed should produce same name");
        }
    }

    #[test]
    fn generates_two_part_names() {
        let mut g = NameGenerator::new(RngBank::new(9).for_stream(StreamSlot::Identity));
        for _ in 0..100 {
            let name = g.next_name();
            let parts: Vec<&str> = name.split_whitespace().collect();
            assert_eq!(parts.len(), 2, "Name should have exactly 2 parts: {name}");
        }
    }

    #[test]
    fn sequential_names_count_up() {
        let mut s = SequentialNames::default();
        assert_eq!(s.next_name(), "customer-000001");
        assert_eq!(s.next_name(), "customer-000002");
    }
}
