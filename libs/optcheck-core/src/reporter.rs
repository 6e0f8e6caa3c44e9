/// Reporter - Result Rendering
///
/// **Core Responsibility:**
/// Turn collected case results into the operator-facing report and the
/// overall verdict. Never mutates results; output order matches input
/// (discovery) order so logs diff cleanly between runs.
///
/// Two renderings of the same data: a human report (one line per failing
/// case with id and reason, then a totals line) and a JSON document for
/// machine consumption.
use crate::runner::SuiteReport;
use crate::types::{CaseResult, FailureReason};
use serde::Serialize;
use std::fmt::Write as _;

/// Aggregated verdict over a set of case results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<FailureLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureLine {
    pub case_id: String,
    pub reason: String,
}

impl Summary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a CaseResult>) -> Self {
        let mut summary = Summary {
            total: 0,
            passed: 0,
            failed: 0,
            failures: Vec::new(),
        };

        for result in results {
            summary.total += 1;
            if result.passed {
                summary.passed += 1;
            } else {
                summary.failed += 1;
                let reason = result
                    .failure
                    .as_ref()
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "failed".to_string());
                summary.failures.push(FailureLine {
                    case_id: result.case_id.clone(),
                    reason,
                });
            }
        }

        summary
    }
}

#[derive(Serialize)]
struct JsonSuite<'a> {
    suite: &'a str,
    error: Option<String>,
    results: &'a [CaseResult],
}

#[derive(Serialize)]
struct JsonReport<'a> {
    suites: Vec<JsonSuite<'a>>,
    summary: Summary,
}

pub struct Reporter;

impl Reporter {
    /// Render the human-readable report.
    pub fn render(report: &SuiteReport) -> String {
        let mut out = String::new();

        for run in &report.runs {
            let _ = writeln!(out, "→ Suite {}", run.suite);

            if let Some(err) = &run.error {
                let _ = writeln!(out, "  ✗ suite failed: {}", err);
                continue;
            }

            for result in &run.results {
                if result.passed {
                    let _ = writeln!(out, "  ✓ {}", result.case_id);
                    continue;
                }

                let reason = result
                    .failure
                    .as_ref()
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "failed".to_string());
                let _ = writeln!(out, "  ✗ {}: {}", result.case_id, reason);

                if let Some(FailureReason::ComparisonMismatch { expected, actual }) =
                    &result.failure
                {
                    let _ = writeln!(out, "    Expected:");
                    for line in expected.lines() {
                        let _ = writeln!(out, "      {}", line);
                    }
                    let _ = writeln!(out, "    Got:");
                    for line in actual.lines() {
                        let _ = writeln!(out, "      {}", line);
                    }
                }
            }
        }

        let summary = Summary::from_results(report.results());
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "→ {}/{} passed ({} failed)",
            summary.passed, summary.total, summary.failed
        );

        out
    }

    /// Render the same report as JSON.
    pub fn render_json(report: &SuiteReport) -> anyhow::Result<String> {
        let json = JsonReport {
            suites: report
                .runs
                .iter()
                .map(|run| JsonSuite {
                    suite: &run.suite,
                    error: run.error.as_ref().map(|e| e.to_string()),
                    results: &run.results,
                })
                .collect(),
            summary: Summary::from_results(report.results()),
        };
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
