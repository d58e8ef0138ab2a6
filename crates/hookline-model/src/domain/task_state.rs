use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::TaskStatus;

/// Last known state of a task, as reported by its runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskState {
    /// Current execution state.
    pub status: TaskStatus,
    /// Whether the last run ended in failure.
    #[serde(default)]
    pub failed: bool,
    /// Number of restarts so far.
    #[serde(default)]
    pub restarts: u64,
    /// When the task was first started.
    #[serde(default, with = "time_serde", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<SystemTime>,
    /// When the task exited for good.
    #[serde(default, with = "time_serde", skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<SystemTime>,
}

impl TaskState {
    /// Task that has not been started.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Task that has started and is still running.
    pub fn running() -> Self {
        Self {
            status: TaskStatus::Running,
            started_at: Some(SystemTime::now()),
            ..Self::default()
        }
    }

    /// Task that ran to completion successfully.
    pub fn succeeded() -> Self {
        let now = SystemTime::now();
        Self {
            status: TaskStatus::Dead,
            started_at: Some(now),
            finished_at: Some(now),
            ..Self::default()
        }
    }

    /// Task that ran and exited with a failure.
    pub fn failed() -> Self {
        Self {
            failed: true,
            ..Self::succeeded()
        }
    }

    /// Returns `true` once the task has been started at least once.
    #[inline]
    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Returns `true` if the task ran to completion without failing.
    #[inline]
    pub fn successful(&self) -> bool {
        self.status.is_terminal() && !self.failed && self.has_started()
    }
}

mod time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let secs = time
            .map(|t| t.duration_since(UNIX_EPOCH).map(|d| d.as_secs()))
            .transpose()
            .map_err(serde::ser::Error::custom)?;
        secs.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SystemTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(|s| UNIX_EPOCH + Duration::from_secs(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_has_not_started() {
        let st = TaskState::pending();
        assert!(!st.has_started());
        assert!(!st.successful());
    }

    #[test]
    fn running_has_started_but_not_succeeded() {
        let st = TaskState::running();
        assert!(st.has_started());
        assert!(!st.successful());
    }

    #[test]
    fn success_requires_clean_exit() {
        assert!(TaskState::succeeded().successful());
        assert!(!TaskState::failed().successful());
        assert!(TaskState::failed().has_started());
    }

    #[test]
    fn dead_without_start_is_not_success() {
        let st = TaskState {
            status: TaskStatus::Dead,
            ..TaskState::default()
        };
        assert!(!st.successful());
    }

    #[test]
    fn timestamps_serialize_as_epoch_seconds() {
        let st = TaskState::running();
        let json = serde_json::to_string(&st).unwrap();
        assert!(json.contains("\"startedAt\":"));
        assert!(!json.contains("finishedAt"));

        let back: TaskState = serde_json::from_str(&json).unwrap();
        assert!(back.has_started());
        assert_eq!(back.status, TaskStatus::Running);
    }

    #[test]
    fn minimal_snapshot_entry_deserializes() {
        let st: TaskState = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(st, TaskState::pending());
    }
}
