//! Fixture-driven regression harness for compiler optimization passes.
//!
//! The harness walks a directory of checked-in fixture pairs, runs each
//! input through an optimization pass, and compares the result against the
//! recorded golden output. It never executes the optimized program and never
//! generates fixtures; those are authored by hand.
//!
//! **Fixture contract (v1):**
//! - One root directory per optimization kind.
//! - Each test case is a pair of files in that directory sharing a filename
//!   stem: `<id>.in` (pre-optimization text) and `<id>.expected` (golden
//!   post-optimization text). Extensions are per-suite configuration; these
//!   are the defaults.
//! - Files with any other extension are ignored. Subdirectories are not
//!   descended into.
//!
//! Changing this contract invalidates existing fixtures, so it is versioned
//! here rather than inferred.

pub mod comparator;
pub mod config;
pub mod error;
pub mod reporter;
pub mod runner;
pub mod store;
pub mod types;

pub use comparator::{
    CommonSubexprComparator, Comparator, OptimizationPass, TranToTranComparator,
};
pub use config::{HarnessConfig, SuiteConfig};
pub use error::DiscoveryError;
pub use reporter::{Reporter, Summary};
pub use runner::{SuiteReport, SuiteRun, TestSuiteRunner};
pub use store::FixtureStore;
pub use types::{CaseResult, FailureReason, TestCase};
