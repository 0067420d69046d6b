use crate::domain::model::{Reference, REFERENCE_LEN};
use crate::utils::error::{BookingError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Mints booking references by whole-token rejection sampling.
pub struct ReferenceAllocator {
    rng: StdRng,
    max_attempts: u32,
}

impl ReferenceAllocator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Deterministic allocator, for tests and reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns a reference that is not a member of `existing`.
    ///
    /// Gives up with `TokenSpaceExhausted` after `max_attempts` collisions.
    pub fn allocate(&mut self, existing: &HashSet<Reference>) -> Result<Reference> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.sample();
            if !existing.contains(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!("Reference collision on attempt {}", attempt);
        }
        Err(BookingError::TokenSpaceExhausted {
            attempts: self.max_attempts,
        })
    }

    fn sample(&mut self) -> Reference {
        let token: String = (0..REFERENCE_LEN)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Reference::from_generated(token)
    }
}

impl Default for ReferenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}
