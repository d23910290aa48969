//! Client order identifier generation.
//!
//! Identifiers are `HHMMSS-NNNNNN`: the session start time followed by a
//! sequence number starting at one. The sequence widens past six digits
//! rather than wrapping, so identifiers never repeat within a process.
//!
//! The generator is explicit state constructed once at startup and passed by
//! reference to the command path; it is deliberately not a static.

use chrono::Local;

use crate::models::ClientOrderId;

/// Generates strictly increasing client order identifiers.
#[derive(Debug)]
pub struct OrderIdGenerator {
    prefix: String,
    sequence: u64,
}

impl OrderIdGenerator {
    /// Create a generator stamped with the current local time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix(Local::now().format("%H%M%S").to_string())
    }

    /// Create a generator with a fixed prefix.
    #[must_use]
    pub(crate) const fn with_prefix(prefix: String) -> Self {
        Self {
            prefix,
            sequence: 1,
        }
    }

    /// Produce the next identifier, advancing the sequence.
    pub fn next_id(&mut self) -> ClientOrderId {
        let id = ClientOrderId::new(format!("{}-{:06}", self.prefix, self.sequence));
        self.sequence += 1;
        id
    }
}

impl Default for OrderIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn identifiers_carry_prefix_and_sequence() {
        let mut generator = OrderIdGenerator::with_prefix("093015".to_string());
        assert_eq!(generator.next_id().as_str(), "093015-000001");
        assert_eq!(generator.next_id().as_str(), "093015-000002");
        assert_eq!(generator.next_id().as_str(), "093015-000003");
    }

    #[test]
    fn sequence_widens_past_six_digits() {
        let mut generator = OrderIdGenerator {
            prefix: "093015".to_string(),
            sequence: 999_999,
        };
        assert_eq!(generator.next_id().as_str(), "093015-999999");
        assert_eq!(generator.next_id().as_str(), "093015-1000000");
    }

    proptest! {
        #[test]
        fn identifiers_are_distinct_and_increasing(count in 1..500usize) {
            let mut generator = OrderIdGenerator::with_prefix("120000".to_string());
            let mut seen = HashSet::new();
            let mut last_sequence = 0u64;

            for _ in 0..count {
                let id = generator.next_id();
                prop_assert!(seen.insert(id.clone()));

                let (_, sequence) = id.as_str().split_once('-').unwrap();
                let sequence: u64 = sequence.parse().unwrap();
                prop_assert!(sequence > last_sequence);
                last_sequence = sequence;
            }
        }
    }
}
