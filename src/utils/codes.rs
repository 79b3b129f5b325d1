//! One-time numeric codes for email verification and password reset.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub const CODE_TTL_MINUTES: i64 = 10;

/// A random six-digit code in `100000..=999999`.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

pub fn code_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(CODE_TTL_MINUTES)
}
