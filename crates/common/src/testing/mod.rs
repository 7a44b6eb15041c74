//! Test doubles for the runtime tier.

pub mod time;

pub use time::{PendingSleeper, RecordingSleeper};
