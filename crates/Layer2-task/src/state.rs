//! Job state machine
//!
//! ```text
//! NotStarted ──► Running ──► Completed
//!      │                        ▲
//!      └────────────────────────┘  (resolve / spawn failure)
//! ```

use serde::{Deserialize, Serialize};

/// Lifecycle state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Registered, process not spawned yet
    #[default]
    NotStarted,

    /// Process spawned, pid known
    Running,

    /// Finished, whether by exit, signal or setup failure
    Completed,
}

impl JobState {
    /// Check if this is a terminal state (cannot transition further)
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, JobState::Running)
    }

    /// Whether `self -> next` is an edge of the lifecycle graph
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::NotStarted, JobState::Running)
                | (JobState::NotStarted, JobState::Completed)
                | (JobState::Running, JobState::Completed)
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            JobState::NotStarted => "NotStarted",
            JobState::Running => "Running",
            JobState::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use JobState::*;

        assert!(NotStarted.can_transition_to(Running));
        assert!(NotStarted.can_transition_to(Completed));
        assert!(Running.can_transition_to(Completed));

        assert!(!Running.can_transition_to(NotStarted));
        assert!(!Completed.can_transition_to(Running));
        assert!(!Completed.can_transition_to(NotStarted));
        assert!(!Completed.can_transition_to(Completed));
        assert!(!Running.can_transition_to(Running));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&JobState::NotStarted).unwrap(),
            "\"not_started\""
        );
        assert_eq!(JobState::Completed.to_string(), "Completed");
        assert!(JobState::Completed.is_terminal());
        assert!(!JobState::Running.is_terminal());
    }
}
