use crate::attendance::action::{AttendanceAction, LabelSet};
use crate::utils::time::format_record_time;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Coordinates { latitude: f64, longitude: f64 },
    FreeText(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{:?},{:?}", latitude, longitude),
            Location::FreeText(text) => f.write_str(text),
        }
    }
}

/// One punch. Built once per successful submission and never changed
/// afterwards; corrections are new records.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    user_identifier: String,
    action: AttendanceAction,
    timestamp: DateTime<FixedOffset>,
    location: Location,
}

impl AttendanceRecord {
    pub(crate) fn new(
        user_identifier: &str,
        action: AttendanceAction,
        timestamp: DateTime<FixedOffset>,
        location: Location,
    ) -> Self {
        Self {
            user_identifier: user_identifier.to_string(),
            action,
            timestamp,
            location,
        }
    }

    pub fn user_identifier(&self) -> &str {
        &self.user_identifier
    }

    pub fn action(&self) -> AttendanceAction {
        self.action
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn to_stored(&self, labels: LabelSet) -> StoredRecord {
        StoredRecord {
            email: self.user_identifier.clone(),
            action: self.action.label(labels).to_string(),
            time: format_record_time(self.timestamp),
            location: self.location.to_string(),
        }
    }
}

/// Row layout shared by every record store backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Location", default)]
    pub location: String,
}
