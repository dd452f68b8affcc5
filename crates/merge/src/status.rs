//! Per-record merge outcomes.

use std::fmt;

use sos_io::RecordKey;
use sos_schema::status_label;

/// Result of the read-back check for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every written cell read back within tolerance.
    Overwritten,
    /// At least one cell did not match after the write.
    NotOverwritten,
}

/// Outcome of merging one exchange-file group.
///
/// `Display` renders the status line printed for the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStatus {
    key: RecordKey,
    outcome: Outcome,
}

impl MergeStatus {
    /// Creates a status for `key`.
    pub fn new(key: RecordKey, outcome: Outcome) -> Self {
        Self { key, outcome }
    }

    /// Record the status belongs to.
    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    /// Read-back outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether the record was verified.
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Overwritten
    }
}

impl fmt::Display for MergeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = status_label(self.key.source());
        let prior = self.key.prior();
        let run_type = self.key.run_type();
        match self.outcome {
            Outcome::Overwritten => write!(
                f,
                "{label}: '{prior}' has been overwritten in the SoS ({run_type})."
            ),
            Outcome::NotOverwritten => write!(
                f,
                "FAILURE: {label}: '{prior}' has NOT been overwritten in the SoS ({run_type})."
            ),
        }
    }
}

/// Statuses of a whole merge run, in processing order.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    statuses: Vec<MergeStatus>,
}

impl MergeReport {
    /// Appends a status.
    pub fn push(&mut self, status: MergeStatus) {
        self.statuses.push(status);
    }

    /// All statuses.
    pub fn statuses(&self) -> &[MergeStatus] {
        &self.statuses
    }

    /// Statuses whose read-back check failed.
    pub fn failures(&self) -> impl Iterator<Item = &MergeStatus> {
        self.statuses.iter().filter(|s| !s.is_success())
    }

    /// Number of verified records.
    pub fn n_overwritten(&self) -> usize {
        self.statuses.iter().filter(|s| s.is_success()).count()
    }

    /// Number of records that failed verification.
    pub fn n_failed(&self) -> usize {
        self.failures().count()
    }

    /// Whether every record was verified.
    pub fn is_success(&self) -> bool {
        self.n_failed() == 0
    }
}
