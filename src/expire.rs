//! Expiration Times
//!
//! Common durations for `expire_time`.

use std::time::Duration;

pub const ONE_MINUTE: Duration = Duration::from_secs(60);
pub const FIVE_MINUTES: Duration = Duration::from_secs(5 * 60);
pub const TEN_MINUTES: Duration = Duration::from_secs(10 * 60);
pub const THIRTY_MINUTES: Duration = Duration::from_secs(30 * 60);
pub const ONE_HOUR: Duration = Duration::from_secs(60 * 60);
pub const SIX_HOURS: Duration = Duration::from_secs(6 * 60 * 60);
pub const TWELVE_HOURS: Duration = Duration::from_secs(12 * 60 * 60);
pub const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);
pub const THREE_DAYS: Duration = Duration::from_secs(3 * 24 * 60 * 60);
pub const ONE_WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Thirty days
pub const ONE_MONTH: Duration = Duration::from_secs(30 * 24 * 60 * 60);
/// 365 days
pub const ONE_YEAR: Duration = Duration::from_secs(365 * 24 * 60 * 60);
