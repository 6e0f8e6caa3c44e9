/// Test Suite Runner - Orchestration
///
/// **Core Responsibility:**
/// Drive discovery and evaluation for one fixture root tied to one
/// optimization kind, and compose multiple suites into one report.
///
/// **Failure Isolation (fail-soft):**
/// - A malformed fixture becomes a failed result for that case id and the
///   remaining cases still run
/// - Only a missing suite root aborts that suite (there is nothing to
///   discover); other suites still run
///
/// **Determinism:**
/// Cases are evaluated sequentially in discovery order, so output and
/// reports are stable across runs.
///
/// Each evaluation runs on the blocking pool under a hard timeout, so a
/// pathological fixture cannot hang the whole suite.
use crate::comparator::Comparator;
use crate::config::SuiteConfig;
use crate::error::DiscoveryError;
use crate::store::FixtureStore;
use crate::types::{CaseResult, FailureReason, TestCase};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

pub const DEFAULT_CASE_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one suite: either its results, or the hard failure that
/// prevented discovery (with an empty result sequence).
#[derive(Debug)]
pub struct SuiteRun {
    pub suite: String,
    pub error: Option<DiscoveryError>,
    pub results: Vec<CaseResult>,
}

impl SuiteRun {
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.results.iter().all(|r| r.passed)
    }
}

/// Merged outcome of every configured suite, in table order.
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub runs: Vec<SuiteRun>,
}

impl SuiteReport {
    /// True when every case in every suite passed and no suite root was
    /// missing. Drives the process exit status.
    pub fn all_passed(&self) -> bool {
        self.runs.iter().all(|run| run.passed())
    }

    /// All case results across suites, preserving suite and discovery order.
    pub fn results(&self) -> impl Iterator<Item = &CaseResult> {
        self.runs.iter().flat_map(|run| run.results.iter())
    }
}

/// Orchestrates discovery and evaluation.
#[derive(Debug, Clone)]
pub struct TestSuiteRunner {
    case_timeout: Duration,
}

impl Default for TestSuiteRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSuiteRunner {
    pub fn new() -> Self {
        Self {
            case_timeout: DEFAULT_CASE_TIMEOUT,
        }
    }

    pub fn with_case_timeout(mut self, case_timeout: Duration) -> Self {
        self.case_timeout = case_timeout;
        self
    }

    /// Run one suite. `Err` only when the suite root is missing; every
    /// per-case fault is a failed result in the returned sequence.
    pub async fn run(
        &self,
        suite: &SuiteConfig,
        comparator: &Arc<dyn Comparator>,
    ) -> Result<Vec<CaseResult>, DiscoveryError> {
        let store = FixtureStore::with_extensions(&suite.input_ext, &suite.expected_ext);
        let discovered = store.discover(&suite.root)?;

        info!(
            suite = %suite.name,
            kind = comparator.kind(),
            root = %suite.root.display(),
            cases = discovered.len(),
            "running suite"
        );

        let mut results = Vec::with_capacity(discovered.len());
        for entry in discovered {
            let result = match entry {
                Ok(case) => self.evaluate_case(case, comparator).await,
                Err(err) => {
                    // Fail-soft: one bad fixture must not hide the rest.
                    let case_id = err.case_id().unwrap_or("<unknown>").to_string();
                    warn!(case_id = %case_id, error = %err, "discovery fault");
                    CaseResult::fail(case_id, None, err.into())
                }
            };
            debug!(
                case_id = %result.case_id,
                passed = result.passed,
                "case evaluated"
            );
            results.push(result);
        }

        Ok(results)
    }

    /// Run every `(suite, comparator)` table entry and merge the outcomes
    /// for final reporting.
    pub async fn run_all(&self, table: &[(SuiteConfig, Arc<dyn Comparator>)]) -> SuiteReport {
        let mut report = SuiteReport::default();

        for (suite, comparator) in table {
            let run = match self.run(suite, comparator).await {
                Ok(results) => SuiteRun {
                    suite: suite.name.clone(),
                    error: None,
                    results,
                },
                Err(err) => {
                    warn!(suite = %suite.name, error = %err, "suite cannot run");
                    SuiteRun {
                        suite: suite.name.clone(),
                        error: Some(err),
                        results: Vec::new(),
                    }
                }
            };
            report.runs.push(run);
        }

        report
    }

    /// Evaluate one case on the blocking pool under a hard timeout.
    async fn evaluate_case(&self, case: TestCase, comparator: &Arc<dyn Comparator>) -> CaseResult {
        let case_id = case.id.clone();
        let comparator = Arc::clone(comparator);

        let handle = tokio::task::spawn_blocking(move || comparator.evaluate(&case));

        match timeout(self.case_timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => CaseResult::fail(
                case_id,
                None,
                FailureReason::TransformationError(format!("evaluation panicked: {}", join_err)),
            ),
            Err(_) => CaseResult::fail(
                case_id,
                None,
                FailureReason::TransformationError(format!(
                    "evaluation timed out after {}ms",
                    self.case_timeout.as_millis()
                )),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{CommonSubexprComparator, OptimizationPass, TranToTranComparator};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    struct IdentityPass;

    impl OptimizationPass for IdentityPass {
        fn name(&self) -> &str {
            "identity"
        }

        fn apply(&self, input: &str) -> anyhow::Result<String> {
            Ok(input.to_string())
        }
    }

    struct SleepyPass;

    impl OptimizationPass for SleepyPass {
        fn name(&self) -> &str {
            "sleepy"
        }

        fn apply(&self, input: &str) -> anyhow::Result<String> {
            std::thread::sleep(Duration::from_millis(200));
            Ok(input.to_string())
        }
    }

    fn suite(root: impl Into<PathBuf>) -> SuiteConfig {
        SuiteConfig {
            name: "test-suite".to_string(),
            root: root.into(),
            pass: "common-subexpr".to_string(),
            input_ext: "in".to_string(),
            expected_ext: "expected".to_string(),
        }
    }

    fn identity_comparator() -> Arc<dyn Comparator> {
        Arc::new(CommonSubexprComparator::new(Arc::new(IdentityPass)))
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).expect("write fixture");
    }

    #[tokio::test]
    async fn well_formed_pair_with_matching_content_passes() {
        let dir = tempdir().unwrap();
        write(dir.path(), "case1.in", "t1 = a + b\n");
        write(dir.path(), "case1.expected", "t1 = a + b\n");

        let runner = TestSuiteRunner::new();
        let results = runner
            .run(&suite(dir.path()), &identity_comparator())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].case_id, "case1");
        assert!(results[0].passed);
    }

    #[tokio::test]
    async fn broken_fixture_fails_without_stopping_siblings() {
        let dir = tempdir().unwrap();
        write(dir.path(), "case1.in", "t1 = a + b\n");
        write(dir.path(), "case1.expected", "t1 = a + b\n");
        write(dir.path(), "case2.in", "t2 = c + d\n");

        let runner = TestSuiteRunner::new();
        let results = runner
            .run(&suite(dir.path()), &identity_comparator())
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].passed);
        assert!(!results[1].passed);
        assert_eq!(results[1].case_id, "case2");
        assert!(matches!(
            results[1].failure,
            Some(FailureReason::IncompleteTestCase(_))
        ));
    }

    #[tokio::test]
    async fn missing_root_aborts_the_suite() {
        let runner = TestSuiteRunner::new();
        let err = runner
            .run(&suite("/definitely/not/here"), &identity_comparator())
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::DirectoryNotFound { .. }));
    }

    #[tokio::test]
    async fn slow_evaluation_times_out() {
        let dir = tempdir().unwrap();
        write(dir.path(), "case1.in", "t1 = a + b\n");
        write(dir.path(), "case1.expected", "t1 = a + b\n");

        let comparator: Arc<dyn Comparator> =
            Arc::new(TranToTranComparator::new(Arc::new(SleepyPass)));
        let runner = TestSuiteRunner::new().with_case_timeout(Duration::from_millis(20));
        let results = runner.run(&suite(dir.path()), &comparator).await.unwrap();

        assert!(!results[0].passed);
        match &results[0].failure {
            Some(FailureReason::TransformationError(msg)) => {
                assert!(msg.contains("timed out"), "unexpected message: {msg}");
            }
            other => panic!("expected TransformationError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn run_all_merges_suites_and_isolates_missing_roots() {
        let dir = tempdir().unwrap();
        write(dir.path(), "case1.in", "t1 = a + b\n");
        write(dir.path(), "case1.expected", "t1 = a + b\n");

        let good = suite(dir.path());
        let mut missing = suite("/definitely/not/here");
        missing.name = "missing-suite".to_string();

        let table: Vec<(SuiteConfig, Arc<dyn Comparator>)> = vec![
            (good, identity_comparator()),
            (missing, identity_comparator()),
        ];

        let runner = TestSuiteRunner::new();
        let report = runner.run_all(&table).await;

        assert_eq!(report.runs.len(), 2);
        assert!(report.runs[0].passed());
        assert!(!report.runs[1].passed());
        assert!(report.runs[1].results.is_empty());
        assert!(matches!(
            report.runs[1].error,
            Some(DiscoveryError::DirectoryNotFound { .. })
        ));
        assert!(!report.all_passed());
    }

    #[tokio::test]
    async fn all_passed_reflects_every_case() {
        let dir = tempdir().unwrap();
        write(dir.path(), "case1.in", "t1 = a + b\n");
        write(dir.path(), "case1.expected", "t1 = a + b\n");

        let table: Vec<(SuiteConfig, Arc<dyn Comparator>)> =
            vec![(suite(dir.path()), identity_comparator())];
        let report = TestSuiteRunner::new().run_all(&table).await;

        assert!(report.all_passed());
        assert_eq!(report.results().count(), 1);
    }
}
