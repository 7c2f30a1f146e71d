//! Run outcomes and the append-only audit trail.

use serde::Serialize;
use uuid::Uuid;

/// Result of executing one action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The probe found the target already holding; nothing was mutated.
    AlreadySatisfied,
    /// The mutation ran and succeeded (or would run, in dry-run mode).
    Changed,
    /// The probe or mutation failed; carries the underlying diagnostic.
    Failed(String),
}

impl Outcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// One entry of the run's audit trail, in execution order.
#[derive(Clone, Debug, Serialize)]
pub struct ActionRecord {
    pub step: String,
    pub description: String,
    pub outcome: Outcome,
}

/// Full result of a pipeline run. The record sequence is append-only during
/// a run and fully determines the audit trail.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    pub records: Vec<ActionRecord>,
    pub errors: Vec<String>,
    pub failed_step: Option<String>,
    pub duration_ms: u64,
    pub run_uuid: Option<Uuid>,
}

impl RunReport {
    #[must_use]
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Count of records with the given outcome class.
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Changed))
            .count()
    }

    #[must_use]
    pub fn satisfied_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::AlreadySatisfied))
            .count()
    }
}
