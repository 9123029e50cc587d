/*!
 * lockbench - Contention Sweep Entry Point
 *
 * Runs every selected lock strategy across a sweep of thread counts and
 * emits a JSON report. Configuration comes from `LOCKBENCH_*` variables.
 */

use contention_locks::harness::detect_parallelism;
use contention_locks::{init_tracing, ContentionHarness, HarnessConfig};
use miette::IntoDiagnostic;
use std::io::Write;
use tracing::info;

fn main() -> miette::Result<()> {
    init_tracing();

    let parallelism = detect_parallelism();
    info!(parallelism, "Detected hardware concurrency");

    let config = HarnessConfig::from_env(parallelism)?;
    let harness = ContentionHarness::new(config)?;
    let report = harness.run()?;

    match std::env::var("LOCKBENCH_REPORT") {
        Ok(path) if !path.trim().is_empty() => {
            report.write_to(&path)?;
            info!(path = %path, run_id = %report.run_id, "Report written");
        }
        _ => {
            let json = report.to_json()?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").into_diagnostic()?;
        }
    }

    Ok(())
}
