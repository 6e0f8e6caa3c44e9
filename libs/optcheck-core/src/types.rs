use serde::{Deserialize, Serialize};
use std::fmt;

/// One test case: an identifier bound to its fixture pair.
///
/// Constructed only by [`crate::store::FixtureStore`] during discovery.
/// Both contents are non-empty; a pairing that cannot be completed never
/// produces a `TestCase`, it produces a discovery error instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Fixture filename stem, e.g. `add_twice` for `add_twice.in`.
    pub id: String,
    /// Raw text of the pre-optimization fixture.
    pub input: String,
    /// Raw text of the golden post-optimization fixture.
    pub expected: String,
}

/// Outcome of evaluating one test case. Exactly one per discovered case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    pub case_id: String,
    pub passed: bool,
    /// Transformation output, kept only on failure for diagnostics.
    pub actual_output: Option<String>,
    pub failure: Option<FailureReason>,
}

impl CaseResult {
    pub fn pass(case_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            passed: true,
            actual_output: None,
            failure: None,
        }
    }

    pub fn fail(
        case_id: impl Into<String>,
        actual_output: Option<String>,
        failure: FailureReason,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            passed: false,
            actual_output,
            failure: Some(failure),
        }
    }
}

/// Why a case did not pass.
///
/// `ComparisonMismatch` is the ordinary "test failed" outcome; the other
/// variants are captured faults that must not crash the suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The fixture pairing was malformed (missing half, empty file, unreadable file).
    IncompleteTestCase(String),
    /// The external transformation itself failed or timed out.
    TransformationError(String),
    /// Transformation output differs from the golden content.
    /// Both sides are stored normalized for diagnosis.
    ComparisonMismatch { expected: String, actual: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::IncompleteTestCase(detail) => {
                write!(f, "incomplete test case: {}", detail)
            }
            FailureReason::TransformationError(msg) => {
                write!(f, "transformation error: {}", msg)
            }
            FailureReason::ComparisonMismatch { .. } => write!(f, "output mismatch"),
        }
    }
}
