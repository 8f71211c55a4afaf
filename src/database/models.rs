use crate::attendance::record::StoredRecord;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub email: String,
    pub action: String,
    pub time: String,
    pub location: String,
}

impl From<AttendanceRow> for StoredRecord {
    fn from(row: AttendanceRow) -> Self {
        StoredRecord {
            email: row.email,
            action: row.action,
            time: row.time,
            location: row.location,
        }
    }
}
