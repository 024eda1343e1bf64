use std::sync::atomic::{AtomicU64, Ordering};

use rand::{thread_rng, Rng};

use crate::domain::TableId;

/// Join-code alphabet without look-alikes (0/O, 1/I).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const CODE_LEN: usize = 6;

/// Table ids from a monotonic counter, join codes from the thread RNG.
#[derive(Debug)]
pub struct IdGenerator {
    table_counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            table_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_table_id(&self) -> TableId {
        self.table_counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Random join code. Uniqueness is the caller's problem.
    pub fn random_code(&self) -> String {
        let mut rng = thread_rng();
        (0..CODE_LEN)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalise a user-typed join code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
