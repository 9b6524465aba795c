//! Port selection strategies.

use std::fmt::Debug;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks one port out of an operation's configured candidates.
pub trait PortSelector: Send + Sync + Debug {
    /// `None` only when `candidates` is empty.
    fn select<'a>(&self, candidates: &'a [String]) -> Option<&'a str>;
}

/// Uniform random draw, independent per call.
///
/// The generator is owned by the selector and guarded by a mutex; the lock is
/// held only for the draw itself.
#[derive(Debug)]
pub struct RandomPort {
    rng: Mutex<StdRng>,
}

impl RandomPort {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomPort {
    fn default() -> Self {
        Self::new()
    }
}

impl PortSelector for RandomPort {
    fn select<'a>(&self, candidates: &'a [String]) -> Option<&'a str> {
        if candidates.is_empty() {
            return None;
        }

        // A poisoned lock still holds a usable generator.
        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0..candidates.len())
        };
        Some(candidates[index].as_str())
    }
}
