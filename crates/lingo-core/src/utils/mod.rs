//! Utility functions.

pub mod time;

pub use time::{Clock, SystemClock, format_datetime, now_utc, parse_datetime};
