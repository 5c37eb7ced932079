use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Status of a step in the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step has not run yet.
    Pending,
    /// Step ran to completion.
    Completed,
    /// Step failed, or never ran because an earlier step aborted the saga.
    Failed,
}

/// Record of one step in the saga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Name of the step.
    #[serde(rename = "step")]
    pub name: String,
    /// Current status.
    pub status: StepStatus,
    /// Human-readable outcome.
    pub message: String,
    /// When the status was last set.
    #[serde(with = "rfc3339_millis")]
    pub timestamp: DateTime<Utc>,
}

/// Ordered trace of every step in a saga run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepTrace {
    records: Vec<StepRecord>,
}

impl StepTrace {
    /// Create a new empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trace with every step `pending`.
    #[must_use]
    pub fn planned<'a>(names: impl IntoIterator<Item = &'a str>, at: DateTime<Utc>) -> Self {
        let records = names
            .into_iter()
            .map(|name| StepRecord {
                name: name.to_string(),
                status: StepStatus::Pending,
                message: String::new(),
                timestamp: at,
            })
            .collect();
        Self { records }
    }

    pub(crate) fn record_completed(&mut self, index: usize, message: String, at: DateTime<Utc>) {
        self.settle(index, StepStatus::Completed, message, at);
    }

    pub(crate) fn record_failure(&mut self, index: usize, message: String, at: DateTime<Utc>) {
        self.settle(index, StepStatus::Failed, message, at);
    }

    fn settle(&mut self, index: usize, status: StepStatus, message: String, at: DateTime<Utc>) {
        if let Some(record) = self.records.get_mut(index) {
            if record.status == StepStatus::Pending {
                record.status = status;
                record.message = message;
                record.timestamp = at;
            }
        }
    }

    /// Mark every step still `pending` as `failed` with `message`.
    ///
    /// Returns the number of steps affected.
    pub fn fail_remaining(&mut self, message: &str, at: DateTime<Utc>) -> usize {
        let mut count = 0;
        for record in &mut self.records {
            if record.status == StepStatus::Pending {
                record.status = StepStatus::Failed;
                record.message = message.to_string();
                record.timestamp = at;
                count += 1;
            }
        }
        count
    }

    /// Drop every record after the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    /// Get all records in the trace.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StepRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.records
            .iter()
            .all(|r| r.status == StepStatus::Completed)
    }

    #[must_use]
    pub fn count(&self, status: StepStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// Get a summary of the saga execution for display.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.records {
            let status = match record.status {
                StepStatus::Pending => "·",
                StepStatus::Completed => "✓",
                StepStatus::Failed => "✗",
            };
            if record.message.is_empty() {
                lines.push(format!("{status} {}", record.name));
            } else {
                lines.push(format!("{status} {}: {}", record.name, record.message));
            }
        }
        lines.join("\n")
    }
}

mod rfc3339_millis {
    use super::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
