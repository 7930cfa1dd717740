//! Individual field generators.
//!
//! Each generator draws from the caller's RNG, so a seeded RNG makes every
//! field reproducible.

pub mod company;
pub mod date;

use rand::seq::SliceRandom;
use rand::Rng;

/// Pick one entry from a non-empty catalog.
pub fn choose<'a, R: Rng>(rng: &mut R, catalog: &[&'a str]) -> &'a str {
    catalog.choose(rng).copied().unwrap_or_default()
}

/// Generate a random integer in the given range (inclusive).
pub fn int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}
