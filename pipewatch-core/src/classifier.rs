//! Status classifier
//!
//! Decides, from a status alone, whether a watcher for the job must keep
//! polling. Two disjoint closed sets cover every known status:
//!
//! - [`ACTIVE_STATUSES`]: the server is working and the status can change
//!   without any client action.
//! - [`STOP_STATUSES`]: the current stage has settled. Nothing changes until
//!   the user explicitly starts the next stage (or retries a failed one), so
//!   the watcher stops even though the job as a whole may not be finished.
//!
//! Statuses outside both sets are treated as stop statuses so garbage input
//! can never keep a watcher alive forever.

use tracing::warn;

use crate::domain::status::{JobStatus, Stage};

/// Statuses that require polling
pub const ACTIVE_STATUSES: [JobStatus; 3] = [
    JobStatus::Running(Stage::Research),
    JobStatus::Running(Stage::LegalResolution),
    JobStatus::Running(Stage::DataExtraction),
];

/// Statuses at which polling stops
pub const STOP_STATUSES: [JobStatus; 7] = [
    JobStatus::Pending,
    JobStatus::Complete(Stage::Research),
    JobStatus::Failed(Stage::Research),
    JobStatus::Complete(Stage::LegalResolution),
    JobStatus::Failed(Stage::LegalResolution),
    JobStatus::Complete(Stage::DataExtraction),
    JobStatus::Failed(Stage::DataExtraction),
];

/// Polling class of a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Still changing server-side, must be polled
    Active,
    /// Settled until the user triggers the next action
    TerminalStable,
    /// Never started
    Idle,
}

/// True if a job in this status must be polled
pub fn requires_polling(status: &JobStatus) -> bool {
    ACTIVE_STATUSES.contains(status)
}

/// True if a watcher observing this status must stop
///
/// Unknown statuses are final.
pub fn is_final_for_polling(status: &JobStatus) -> bool {
    if status.is_unknown() {
        warn!("Unrecognized job status '{}', treating it as final", status);
        return true;
    }
    STOP_STATUSES.contains(status)
}

/// Classifies a status
pub fn classify(status: &JobStatus) -> StatusClass {
    match status {
        JobStatus::Pending => StatusClass::Idle,
        s if requires_polling(s) => StatusClass::Active,
        _ => StatusClass::TerminalStable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses_require_polling() {
        for status in &ACTIVE_STATUSES {
            assert!(requires_polling(status), "{} should poll", status);
            assert!(!is_final_for_polling(status), "{} should not stop", status);
            assert_eq!(classify(status), StatusClass::Active);
        }
    }

    #[test]
    fn test_stop_statuses_are_final() {
        for status in &STOP_STATUSES {
            assert!(is_final_for_polling(status), "{} should stop", status);
            assert!(!requires_polling(status), "{} should not poll", status);
        }
    }

    #[test]
    fn test_sets_are_disjoint_and_cover_every_known_status() {
        let mut known = vec![JobStatus::Pending];
        for stage in Stage::ALL {
            known.push(JobStatus::Running(stage));
            known.push(JobStatus::Complete(stage));
            known.push(JobStatus::Failed(stage));
        }

        for status in &known {
            let active = ACTIVE_STATUSES.contains(status);
            let stop = STOP_STATUSES.contains(status);
            assert!(active != stop, "{} must be in exactly one set", status);
        }
        assert_eq!(ACTIVE_STATUSES.len() + STOP_STATUSES.len(), known.len());
    }

    #[test]
    fn test_unknown_status_is_final() {
        let status = JobStatus::Unknown("reticulating_splines".to_string());
        assert!(!requires_polling(&status));
        assert!(is_final_for_polling(&status));
        assert_eq!(classify(&status), StatusClass::TerminalStable);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&JobStatus::Pending), StatusClass::Idle);
        assert_eq!(
            classify(&JobStatus::Complete(Stage::Research)),
            StatusClass::TerminalStable
        );
        assert_eq!(
            classify(&JobStatus::Failed(Stage::DataExtraction)),
            StatusClass::TerminalStable
        );
    }
}
