use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// One tracked interval of a project. An entry is open while `end` is unset;
/// `duration` is only meaningful once the entry has been closed.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Entry {
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default = "Duration::zero", with = "duration_ns")]
    pub duration: Duration,
    #[serde(default)]
    pub start_note: String,
    #[serde(default)]
    pub end_note: String,
}

impl Entry {
    pub fn open(start: DateTime<Utc>, note: Option<String>) -> Self {
        Entry {
            start,
            end: None,
            duration: Duration::zero(),
            start_note: note.unwrap_or_default(),
            end_note: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn close(&mut self, end: DateTime<Utc>, note: Option<String>) {
        self.end = Some(end);
        self.duration = end - self.start;
        if let Some(note) = note {
            self.end_note = note;
        }
    }

    /// Recomputes `duration` from the stored endpoints. Open entries are left
    /// alone.
    pub fn recalculate(&mut self) {
        if let Some(end) = self.end {
            self.duration = end - self.start;
        }
    }
}

mod duration_ns {
    use chrono::Duration;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_nanoseconds().unwrap_or(i64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ns = i64::deserialize(deserializer)?;
        Ok(Duration::nanoseconds(ns))
    }
}
