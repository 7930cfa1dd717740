//! Date generators.

use chrono::{Duration, NaiveDate};
use rand::Rng;

/// Generate a random date in `[end - window_days, end]`.
pub fn generate_recent_date<R: Rng>(rng: &mut R, end: NaiveDate, window_days: i64) -> NaiveDate {
    if window_days <= 0 {
        return end;
    }
    let offset = rng.gen_range(0..=window_days);
    end - Duration::days(offset)
}
