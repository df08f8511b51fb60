//! Rule-level errors.
//!
//! A [`DataIntegrityError`] means the feed broke an assumption the rules
//! depend on. The pipeline never recovers from one: a wrong stop id would
//! silently detach stop times from their stops downstream.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    #[error("Unexpected stop ID for stop {stop_id:?} (code {stop_code:?}, name {stop_name:?})")]
    UnexpectedStopId {
        stop_id: String,
        stop_code: String,
        stop_name: String,
    },

    #[error("No zone prefix matches stop {stop_id:?}")]
    NoZonePrefix { stop_id: String },

    #[error("No digits in stop {stop_id:?}")]
    NoDigits { stop_id: String },

    #[error("Stop ID for {stop_id:?} does not fit in 32 bits")]
    StopIdOverflow { stop_id: String },
}
