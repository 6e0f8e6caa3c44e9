// Composition root: wire the suite table to comparators and run.
use anyhow::{bail, Result};
use optcheck_core::{
    CommonSubexprComparator, Comparator, HarnessConfig, Reporter, SuiteConfig,
    TestSuiteRunner, TranToTranComparator,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Build the comparator variant for one suite entry, with its pass
/// resolved from the registry.
fn build_comparator(suite: &SuiteConfig, check_idempotence: bool) -> Result<Arc<dyn Comparator>> {
    let Some(pass) = optcheck_passes::lookup(&suite.pass) else {
        bail!(
            "suite '{}' names unknown pass '{}' (known: {})",
            suite.name,
            suite.pass,
            optcheck_passes::known_passes().join(", ")
        );
    };

    let comparator: Arc<dyn Comparator> = match suite.pass.as_str() {
        "common-subexpr" => {
            Arc::new(CommonSubexprComparator::new(pass).with_idempotence_check(check_idempotence))
        }
        "tran-to-tran" => {
            Arc::new(TranToTranComparator::new(pass).with_idempotence_check(check_idempotence))
        }
        other => bail!("no comparator variant for pass '{}'", other),
    };

    Ok(comparator)
}

pub async fn run(
    config_path: &str,
    json: bool,
    check_idempotence: bool,
    timeout_ms: u64,
) -> Result<bool> {
    let config = HarnessConfig::load(Path::new(config_path))?;

    let mut table: Vec<(SuiteConfig, Arc<dyn Comparator>)> = Vec::new();
    for suite in config.suites {
        let comparator = build_comparator(&suite, check_idempotence)?;
        table.push((suite, comparator));
    }

    info!(suites = table.len(), config = config_path, "harness configured");

    let runner = TestSuiteRunner::new().with_case_timeout(Duration::from_millis(timeout_ms));
    let report = runner.run_all(&table).await;

    if json {
        println!("{}", Reporter::render_json(&report)?);
    } else {
        print!("{}", Reporter::render(&report));
    }

    Ok(report.all_passed())
}

pub fn list(config_path: &str) -> Result<()> {
    let config = HarnessConfig::load(Path::new(config_path))?;

    println!("→ {} configured suite(s)", config.suites.len());
    for suite in &config.suites {
        println!(
            "  {} (pass: {}, root: {}, pair: *.{} / *.{})",
            suite.name,
            suite.pass,
            suite.root.display(),
            suite.input_ext,
            suite.expected_ext
        );
    }

    Ok(())
}
