/// Fixture Store - Test Case Discovery
///
/// **Core Responsibility:**
/// Translate one suite root directory into a sequence of well-formed
/// test cases, in a deterministic order.
///
/// **Pairing Rule:**
/// - Scan immediate files of the root only (no recursion)
/// - Group by filename stem
/// - A group must contain exactly one input file and one expected file,
///   and neither may be empty
/// - Anything else is an `IncompleteTestCase` for that stem, reported in
///   place so the remaining cases still run
///
/// **Determinism:**
/// Case identifiers are sorted lexicographically regardless of filesystem
/// enumeration order. Discovery is read-only, so re-invoking it on the
/// same directory yields identical results.
use crate::config;
use crate::error::DiscoveryError;
use crate::types::TestCase;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Default)]
struct PendingPair {
    input: Option<PathBuf>,
    expected: Option<PathBuf>,
}

/// Locates and reads the fixture pairs under one suite root.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    input_ext: String,
    expected_ext: String,
}

impl Default for FixtureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureStore {
    /// Store using the default `.in` / `.expected` extensions.
    pub fn new() -> Self {
        Self {
            input_ext: config::DEFAULT_INPUT_EXT.to_string(),
            expected_ext: config::DEFAULT_EXPECTED_EXT.to_string(),
        }
    }

    /// Store using the extensions a suite configured.
    pub fn with_extensions(input_ext: impl Into<String>, expected_ext: impl Into<String>) -> Self {
        Self {
            input_ext: input_ext.into(),
            expected_ext: expected_ext.into(),
        }
    }

    /// Discover all test cases under `root`.
    ///
    /// The outer `Err` is raised only when the root itself is missing or
    /// unreadable; every per-case fault is an `Err` entry in the returned
    /// sequence so the caller can fail that case and keep going.
    pub fn discover(
        &self,
        root: &Path,
    ) -> Result<Vec<Result<TestCase, DiscoveryError>>, DiscoveryError> {
        if !root.is_dir() {
            return Err(DiscoveryError::DirectoryNotFound {
                path: root.display().to_string(),
            });
        }

        let entries = fs::read_dir(root).map_err(|e| DiscoveryError::DirectoryNotFound {
            path: format!("{} ({})", root.display(), e),
        })?;

        // BTreeMap gives the lexicographic case order for free.
        let mut pairs: BTreeMap<String, PendingPair> = BTreeMap::new();

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let (Some(stem), Some(ext)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.extension().and_then(|s| s.to_str()),
            ) else {
                continue;
            };

            let pair = pairs.entry(stem.to_string()).or_default();
            if ext == self.input_ext {
                pair.input = Some(path);
            } else if ext == self.expected_ext {
                pair.expected = Some(path);
            }
        }

        // Stems that only ever carried ignored extensions leave an empty
        // pending pair behind; they are not fixtures.
        pairs.retain(|_, pair| pair.input.is_some() || pair.expected.is_some());

        let discovered: Vec<Result<TestCase, DiscoveryError>> = pairs
            .into_iter()
            .map(|(id, pair)| self.complete_pair(id, pair))
            .collect();

        debug!(
            root = %root.display(),
            cases = discovered.len(),
            "discovered fixture pairs"
        );

        Ok(discovered)
    }

    fn complete_pair(&self, id: String, pair: PendingPair) -> Result<TestCase, DiscoveryError> {
        let input_path = pair.input.ok_or_else(|| DiscoveryError::IncompleteTestCase {
            case_id: id.clone(),
            detail: format!("missing {}.{}", id, self.input_ext),
        })?;
        let expected_path = pair
            .expected
            .ok_or_else(|| DiscoveryError::IncompleteTestCase {
                case_id: id.clone(),
                detail: format!("missing {}.{}", id, self.expected_ext),
            })?;

        let input = read_fixture(&id, &input_path)?;
        let expected = read_fixture(&id, &expected_path)?;

        if input.trim().is_empty() {
            return Err(DiscoveryError::IncompleteTestCase {
                case_id: id.clone(),
                detail: format!("{}.{} is empty", id, self.input_ext),
            });
        }
        if expected.trim().is_empty() {
            return Err(DiscoveryError::IncompleteTestCase {
                case_id: id.clone(),
                detail: format!("{}.{} is empty", id, self.expected_ext),
            });
        }

        Ok(TestCase {
            id,
            input,
            expected,
        })
    }
}

fn read_fixture(id: &str, path: &Path) -> Result<String, DiscoveryError> {
    fs::read_to_string(path).map_err(|e| DiscoveryError::FixtureUnreadable {
        case_id: id.to_string(),
        message: format!("{}: {}", path.display(), e),
    })
}
