use crate::types::FailureReason;
use thiserror::Error;

/// Faults raised while turning a directory into test cases.
///
/// Only `DirectoryNotFound` aborts a whole suite; the per-case variants are
/// isolated to their case and surfaced as failed results so one bad fixture
/// does not hide the rest.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("fixture root not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("incomplete test case '{case_id}': {detail}")]
    IncompleteTestCase { case_id: String, detail: String },

    #[error("unreadable fixture for '{case_id}': {message}")]
    FixtureUnreadable { case_id: String, message: String },
}

impl DiscoveryError {
    /// Identifier of the case this error is attributed to, when it is
    /// scoped to a single case rather than the whole suite.
    pub fn case_id(&self) -> Option<&str> {
        match self {
            DiscoveryError::DirectoryNotFound { .. } => None,
            DiscoveryError::IncompleteTestCase { case_id, .. }
            | DiscoveryError::FixtureUnreadable { case_id, .. } => Some(case_id),
        }
    }
}

impl From<DiscoveryError> for FailureReason {
    fn from(err: DiscoveryError) -> Self {
        FailureReason::IncompleteTestCase(err.to_string())
    }
}
