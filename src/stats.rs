use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the run log: what a cleanup run read, kept and dropped.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CleanupStats {
    pub timestamp: DateTime<Utc>,
    pub agency: String,
    pub source: Option<String>,

    pub routes_read: usize,
    pub routes_kept: usize,
    pub routes_excluded: usize,
    pub routes_merged: usize,
    pub trips_read: usize,
    pub trips_kept: usize,
    pub stops_read: usize,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl CleanupStats {
    pub fn new(agency: &str) -> Self {
        CleanupStats {
            timestamp: Utc::now(),
            agency: agency.to_string(),
            ..Default::default()
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(agency: &str, error_type: &str, error_message: &str) -> Self {
        CleanupStats {
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Self::new(agency)
        }
    }

    /// Set where the feed was read from
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}
