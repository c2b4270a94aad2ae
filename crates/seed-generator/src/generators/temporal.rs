//! Date, time and duration generators.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rand::Rng;
use seed_core::Value;
use std::time::Duration;

/// Generate a random timestamp between the Unix epoch and now.
pub fn generate_date_time<R: Rng>(rng: &mut R) -> Value {
    let now = Utc::now().timestamp();
    let ts = rng.random_range(0..=now.max(0));
    Value::DateTime(DateTime::from_timestamp(ts, 0).unwrap_or_default())
}

/// Generate a random date between the Unix epoch and today.
pub fn generate_date<R: Rng>(rng: &mut R) -> Value {
    match generate_date_time(rng) {
        Value::DateTime(dt) => Value::Date(dt.date_naive()),
        _ => Value::Date(NaiveDate::default()),
    }
}

/// Generate a random time of day with second precision.
pub fn generate_time<R: Rng>(rng: &mut R) -> Value {
    let secs = rng.random_range(0..86_400u32);
    Value::Time(NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap_or_default())
}

/// Generate a random duration of up to the current epoch offset in seconds.
pub fn generate_duration<R: Rng>(rng: &mut R) -> Value {
    let now = Utc::now().timestamp().max(0) as u64;
    Value::Duration(Duration::from_secs(rng.random_range(0..=now)))
}
