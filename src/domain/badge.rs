//! Badge id generation
//!
//! Badge ids are `B` followed by a 5-digit decimal drawn uniformly from
//! [10000, 99999]. There is no collision check; duplicates are permitted
//! and check-in lookups are always scoped to an event. The generator
//! sits behind a trait so tests can seed it for reproducible output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub trait BadgeIdSource: Send + Sync {
    fn next_badge_id(&self) -> String;
}

/// Seedable badge id generator backed by `StdRng`
pub struct RandomBadgeIds {
    rng: Mutex<StdRng>,
}

impl RandomBadgeIds {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl BadgeIdSource for RandomBadgeIds {
    fn next_badge_id(&self) -> String {
        let n: u32 = self
            .rng
            .lock()
            .expect("badge rng lock poisoned")
            .gen_range(10_000..=99_999);
        format!("B{n}")
    }
}
