use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One scheduled transmission of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broadcast {
    pub channel: String,
    pub transmission_start: DateTime<Utc>,
    pub transmission_end: DateTime<Utc>,
}

impl Broadcast {
    pub fn new(
        channel: impl Into<String>,
        transmission_start: DateTime<Utc>,
        transmission_end: DateTime<Utc>,
    ) -> Self {
        Self {
            channel: channel.into(),
            transmission_start,
            transmission_end,
        }
    }

    /// Same channel, start times within `flexibility` of each other.
    pub fn matches(&self, other: &Broadcast, flexibility: Duration) -> bool {
        self.channel == other.channel
            && (self.transmission_start - other.transmission_start).abs() <= flexibility
    }

    /// Whether the two transmission windows overlap once widened by `flexibility`.
    pub fn overlaps(&self, other: &Broadcast, flexibility: Duration) -> bool {
        self.channel == other.channel
            && self.transmission_start - flexibility < other.transmission_end
            && other.transmission_start < self.transmission_end + flexibility
    }
}
