/// Optimization Comparators - Case Verification
///
/// **Core Responsibility:**
/// Apply one optimization kind to a test case's input and judge whether
/// the result matches the golden content.
///
/// **Critical Properties:**
/// - Knows nothing about the filesystem
/// - Knows nothing about how the optimizer works internally
/// - Pure: evaluating the same case twice yields the same result
///
/// **Comparison Rules:**
/// - Exact, case-sensitive text equality after normalization
/// - Normalization removes trailing whitespace per line, line-ending
///   differences (`\r\n` vs `\n`), and trailing blank lines
/// - Everything else is significant; optimizer output is expected to be
///   syntactically canonical
///
/// A failing transformation is converted into a failed result, never a
/// panic or a propagated error, so the rest of the suite keeps running.
use crate::types::{CaseResult, FailureReason, TestCase};
use std::sync::Arc;

/// The opaque external transformation for one optimization kind.
///
/// Supplied by the optimizer under test; the harness only inspects the
/// output text.
pub trait OptimizationPass: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, input: &str) -> anyhow::Result<String>;
}

/// Capability implemented once per optimization kind.
pub trait Comparator: Send + Sync {
    /// Stable kind name used in configuration and logs.
    fn kind(&self) -> &str;
    /// Evaluate one test case to exactly one result.
    fn evaluate(&self, case: &TestCase) -> CaseResult;
}

impl std::fmt::Debug for dyn Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Comparator").field("kind", &self.kind()).finish()
    }
}

/// Normalize text for comparison: per-line trailing-whitespace trim,
/// uniform line endings, no trailing blank lines.
pub fn normalize(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().map(|l| l.trim_end()).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Shared comparison core for both comparator variants.
fn compare(pass: &dyn OptimizationPass, case: &TestCase, check_idempotence: bool) -> CaseResult {
    let actual = match pass.apply(&case.input) {
        Ok(output) => output,
        Err(e) => {
            return CaseResult::fail(
                case.id.clone(),
                None,
                FailureReason::TransformationError(format!("{:#}", e)),
            );
        }
    };

    let actual_norm = normalize(&actual);
    let expected_norm = normalize(&case.expected);

    if actual_norm != expected_norm {
        return CaseResult::fail(
            case.id.clone(),
            Some(actual),
            FailureReason::ComparisonMismatch {
                expected: expected_norm,
                actual: actual_norm,
            },
        );
    }

    if check_idempotence {
        // Already-optimized code must be a fixed point of the pass.
        match pass.apply(&actual) {
            Ok(second) => {
                let second_norm = normalize(&second);
                if second_norm != actual_norm {
                    return CaseResult::fail(
                        case.id.clone(),
                        Some(second),
                        FailureReason::ComparisonMismatch {
                            expected: actual_norm,
                            actual: second_norm,
                        },
                    );
                }
            }
            Err(e) => {
                return CaseResult::fail(
                    case.id.clone(),
                    Some(actual),
                    FailureReason::TransformationError(format!(
                        "pass failed on its own output: {:#}",
                        e
                    )),
                );
            }
        }
    }

    CaseResult::pass(case.id.clone())
}

/// Comparator for common-subexpression elimination.
pub struct CommonSubexprComparator {
    pass: Arc<dyn OptimizationPass>,
    check_idempotence: bool,
}

impl CommonSubexprComparator {
    pub fn new(pass: Arc<dyn OptimizationPass>) -> Self {
        Self {
            pass,
            check_idempotence: false,
        }
    }

    /// Additionally verify that a passing case is a fixed point of the pass.
    pub fn with_idempotence_check(mut self, enabled: bool) -> Self {
        self.check_idempotence = enabled;
        self
    }
}

impl Comparator for CommonSubexprComparator {
    fn kind(&self) -> &str {
        "common-subexpr"
    }

    fn evaluate(&self, case: &TestCase) -> CaseResult {
        compare(self.pass.as_ref(), case, self.check_idempotence)
    }
}

/// Comparator for translation-to-translation elimination.
pub struct TranToTranComparator {
    pass: Arc<dyn OptimizationPass>,
    check_idempotence: bool,
}

impl TranToTranComparator {
    pub fn new(pass: Arc<dyn OptimizationPass>) -> Self {
        Self {
            pass,
            check_idempotence: false,
        }
    }

    /// Additionally verify that a passing case is a fixed point of the pass.
    pub fn with_idempotence_check(mut self, enabled: bool) -> Self {
        self.check_idempotence = enabled;
        self
    }
}

impl Comparator for TranToTranComparator {
    fn kind(&self) -> &str {
        "tran-to-tran"
    }

    fn evaluate(&self, case: &TestCase) -> CaseResult {
        compare(self.pass.as_ref(), case, self.check_idempotence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stand-in for the external optimizer.
    struct StubPass<F>(F);

    impl<F> OptimizationPass for StubPass<F>
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
    {
        fn name(&self) -> &str {
            "stub"
        }

        fn apply(&self, input: &str) -> anyhow::Result<String> {
            (self.0)(input)
        }
    }

    fn case(id: &str, input: &str, expected: &str) -> TestCase {
        TestCase {
            id: id.to_string(),
            input: input.to_string(),
            expected: expected.to_string(),
        }
    }

    fn identity() -> Arc<dyn OptimizationPass> {
        Arc::new(StubPass(|input: &str| Ok(input.to_string())))
    }

    #[test]
    fn normalize_rules() {
        assert_eq!(normalize("a = b\n"), "a = b");
        assert_eq!(normalize("a = b\r\nc = d\r\n"), "a = b\nc = d");
        assert_eq!(normalize("a = b  \nc = d\n\n\n"), "a = b\nc = d");
        assert_eq!(normalize("a = b\n\nc = d"), "a = b\n\nc = d");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn matching_output_passes() {
        let comparator = CommonSubexprComparator::new(identity());
        let result = comparator.evaluate(&case("case1", "t1 = a + b\n", "t1 = a + b\n"));
        assert!(result.passed);
    }

    #[test]
    fn trailing_newline_difference_still_passes() {
        let comparator = CommonSubexprComparator::new(identity());
        let result = comparator.evaluate(&case("case1", "t1 = a + b", "t1 = a + b\n"));
        assert!(result.passed);
    }

    #[test]
    fn single_token_difference_fails_with_both_texts() {
        let comparator = TranToTranComparator::new(identity());
        let result = comparator.evaluate(&case("case1", "t1 = a + b\n", "t1 = a + c\n"));

        assert!(!result.passed);
        assert_eq!(result.actual_output.as_deref(), Some("t1 = a + b\n"));
        match result.failure {
            Some(FailureReason::ComparisonMismatch { expected, actual }) => {
                assert_eq!(expected, "t1 = a + c");
                assert_eq!(actual, "t1 = a + b");
            }
            other => panic!("expected ComparisonMismatch, got {:?}", other),
        }
    }

    #[test]
    fn case_differences_are_significant() {
        let comparator = CommonSubexprComparator::new(identity());
        let result = comparator.evaluate(&case("case1", "T1 = a + b\n", "t1 = a + b\n"));
        assert!(!result.passed);
    }

    #[test]
    fn pass_failure_becomes_transformation_error() {
        let pass: Arc<dyn OptimizationPass> =
            Arc::new(StubPass(|_: &str| anyhow::bail!("malformed statement at line 3")));
        let comparator = CommonSubexprComparator::new(pass);
        let result = comparator.evaluate(&case("case1", "garbage", "anything"));

        assert!(!result.passed);
        match result.failure {
            Some(FailureReason::TransformationError(msg)) => {
                assert!(msg.contains("malformed statement at line 3"));
            }
            other => panic!("expected TransformationError, got {:?}", other),
        }
    }

    #[test]
    fn evaluate_is_pure_under_repetition() {
        let comparator = CommonSubexprComparator::new(identity());
        let case = case("case1", "t1 = a + b\n", "t1 = a + c\n");
        assert_eq!(comparator.evaluate(&case), comparator.evaluate(&case));
    }

    #[test]
    fn idempotence_check_accepts_fixed_point() {
        let comparator = TranToTranComparator::new(identity()).with_idempotence_check(true);
        let result = comparator.evaluate(&case("case1", "t1 = tran x\n", "t1 = tran x\n"));
        assert!(result.passed);
    }

    #[test]
    fn idempotence_check_catches_drift() {
        // Output matches expected on the first application but keeps
        // growing on every re-application.
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let pass: Arc<dyn OptimizationPass> = Arc::new(StubPass(move |input: &str| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Ok(input.to_string())
            } else {
                Ok(format!("{}extra = 1\n", input))
            }
        }));

        let comparator = CommonSubexprComparator::new(pass).with_idempotence_check(true);
        let result = comparator.evaluate(&case("case1", "t1 = a + b\n", "t1 = a + b\n"));

        assert!(!result.passed);
        match result.failure {
            Some(FailureReason::ComparisonMismatch { expected, actual }) => {
                assert_eq!(expected, "t1 = a + b");
                assert_eq!(actual, "t1 = a + b\nextra = 1");
            }
            other => panic!("expected ComparisonMismatch, got {:?}", other),
        }
    }
}
