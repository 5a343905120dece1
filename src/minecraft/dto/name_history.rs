use super::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A name a player has held and the moment it was adopted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameHistoryEntry {
    pub name: String,
    /// Epoch milliseconds, 0 for the name the account was registered with
    pub changed_to_at: i64,
}

impl NameHistoryEntry {
    pub fn is_original(&self) -> bool {
        self.changed_to_at == 0
    }

    pub fn changed_at(&self) -> Option<DateTime<Utc>> {
        if self.is_original() {
            None
        } else {
            DateTime::from_timestamp_millis(self.changed_to_at)
        }
    }
}

/// One element of `GET /user/profiles/{uuid}/names`
#[derive(Debug, Deserialize)]
pub(crate) struct NameHistoryRecord {
    pub name: String,
    #[serde(default, rename = "changedToAt", deserialize_with = "lenient::millis")]
    pub changed_to_at: Option<i64>,
}

impl From<NameHistoryRecord> for NameHistoryEntry {
    fn from(record: NameHistoryRecord) -> Self {
        NameHistoryEntry {
            name: record.name,
            changed_to_at: record.changed_to_at.unwrap_or(0),
        }
    }
}
