use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inbound "please re-equivalate" event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceNotification {
    pub message_id: String,
    pub subject_id: u64,
    /// External slot key; notifications sharing it never run concurrently.
    #[serde(default)]
    pub lock_key: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl EquivalenceNotification {
    pub fn new(subject_id: u64) -> Self {
        Self {
            message_id: uuid::Uuid::new_v4().to_string(),
            subject_id,
            lock_key: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_lock_key(mut self, key: impl Into<String>) -> Self {
        self.lock_key = Some(key.into());
        self
    }

    /// Slot key, falling back to the subject id.
    pub fn slot(&self) -> String {
        self.lock_key
            .clone()
            .unwrap_or_else(|| self.subject_id.to_string())
    }
}
