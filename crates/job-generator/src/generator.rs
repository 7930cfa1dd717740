//! Main generator for producing job posting batches.

use crate::generators::company::{generate_company, generate_location};
use crate::generators::date::generate_recent_date;
use crate::generators::{choose, int_range};
use chrono::{DateTime, DurationRound, NaiveDateTime, TimeDelta, Utc};
use job_core::{JobPostingRecord, EMPLOYMENT_TYPES, JOB_TITLES};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Inclusive salary bounds.
pub const SALARY_RANGE: (i64, i64) = (90_000, 200_000);

/// How far back `posted_date` may reach from the reference date.
pub const POSTED_WINDOW_DAYS: i64 = 30;

/// Generator that produces deterministic job posting batches.
///
/// `create_date` is the reference time (truncated to microseconds, the
/// warehouse timestamp precision) for every record of the generator, and the
/// `posted_date` window ends on the reference date.
pub struct JobGenerator {
    /// Seeded random number generator for reproducibility
    rng: StdRng,
    /// Generation timestamp shared by every record
    reference_time: NaiveDateTime,
    /// Next job_id to hand out
    next_id: u64,
}

impl JobGenerator {
    /// Create a new generator with the given seed, anchored at the current time.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            reference_time: truncate_to_micros(Utc::now()),
            next_id: 1,
        }
    }

    /// Anchor the batch at a fixed time instead of "now".
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = truncate_to_micros(reference_time);
        self
    }

    pub fn reference_time(&self) -> NaiveDateTime {
        self.reference_time
    }

    /// Generate the next record.
    pub fn next_record(&mut self) -> JobPostingRecord {
        let job_id = self.next_id;
        self.next_id += 1;

        let rng = &mut self.rng;
        JobPostingRecord {
            job_id,
            title: choose(rng, &JOB_TITLES).to_string(),
            company: generate_company(rng),
            location: generate_location(rng),
            salary: int_range(rng, SALARY_RANGE.0, SALARY_RANGE.1),
            posted_date: generate_recent_date(
                rng,
                self.reference_time.date(),
                POSTED_WINDOW_DAYS,
            ),
            employment_type: choose(rng, &EMPLOYMENT_TYPES).to_string(),
            create_date: self.reference_time,
        }
    }

    /// Lazily generate `count` records.
    pub fn records(&mut self, count: u64) -> RecordIterator<'_> {
        RecordIterator {
            generator: self,
            remaining: count,
        }
    }

    /// Generate a batch of exactly `count` records.
    ///
    /// A count of zero yields an empty batch.
    pub fn generate(&mut self, count: u64) -> Vec<JobPostingRecord> {
        info!("Generating {count} job records");
        let records: Vec<JobPostingRecord> = self.records(count).collect();
        info!("Generated {} job records", records.len());
        records
    }
}

/// Iterator that lazily generates records.
pub struct RecordIterator<'a> {
    generator: &'a mut JobGenerator,
    remaining: u64,
}

impl Iterator for RecordIterator<'_> {
    type Item = JobPostingRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.generator.next_record())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordIterator<'_> {}

fn truncate_to_micros(ts: DateTime<Utc>) -> NaiveDateTime {
    ts.duration_trunc(TimeDelta::microseconds(1))
        .unwrap_or(ts)
        .naive_utc()
}
