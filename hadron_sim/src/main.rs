//! Hadron DST Simulator CLI
//!
//! Run deterministic resolution scenarios against the interaction core.

use clap::Parser;
use hadron_sim::scenarios::ScenarioId;
use hadron_sim::{ActionExport, ScenarioResult, ScenarioRunner, SimConfig};
use tracing::{debug, error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Hadron Deterministic Simulation Testing CLI
#[derive(Parser, Debug)]
#[command(name = "hadron-sim")]
#[command(about = "Run deterministic interaction resolution scenarios", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Scenario to run (elastic_pair, resonance_formation, resonance_decay,
    /// competing_candidates, wall_crossing, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Candidates per scenario
    #[arg(short, long, default_value = "100")]
    events: usize,

    /// Number of consecutive seeds to test (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Collision energy in GeV for two-body scenarios
    #[arg(long, default_value = "1.8")]
    sqrt_s: f64,

    /// Worker threads for parallel resolution
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export resolved actions of a single scenario to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn main() {
    let args = Args::parse();

    // Initialize logging; RUST_LOG overrides the default level
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        vec![args.scenario.parse().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            let names: Vec<&str> = ScenarioId::all().iter().map(|s| s.name()).collect();
            eprintln!("Available scenarios: {}, all", names.join(", "));
            std::process::exit(1);
        })]
    };

    if !args.json {
        info!("hadron-sim v{}: {} scenario(s)", env!("CARGO_PKG_VERSION"), scenarios.len());
        for scenario in &scenarios {
            debug!("  {}: {}", scenario.name(), scenario.description());
        }
    }

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let config = SimConfig {
        seed: base_seed,
        events: args.events,
        sqrt_s: args.sqrt_s,
        workers: args.workers.max(1),
        ..SimConfig::default()
    };

    // --export: one scenario, records written to a file
    if let Some(export_path) = &args.export {
        if scenarios.len() > 1 {
            eprintln!("Error: --export only supports a single scenario, not 'all'");
            std::process::exit(1);
        }

        let result = ScenarioRunner::from_config(config).run(scenarios[0]);
        let export = ActionExport::from_result(&result);
        match export.write_to_file(export_path) {
            Ok(()) => info!("Exported {} records to {}", export.records.len(), export_path),
            Err(e) => {
                error!("Failed to write export: {}", e);
                std::process::exit(1);
            }
        }

        report(&result);
        if !result.passed {
            std::process::exit(1);
        }
        return;
    }

    let mut results: Vec<ScenarioResult> = Vec::new();
    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = ScenarioRunner::from_config(SimConfig { seed, ..config.clone() });

        for scenario in &scenarios {
            let result = runner.run(*scenario);
            if !args.json {
                report(&result);
            }
            results.push(result);
        }
    }

    if !print_summary(&results, args.json) {
        std::process::exit(1);
    }
}

/// One log line per scenario run.
fn report(result: &ScenarioResult) {
    let name = result.scenario.name();
    if result.passed {
        info!(
            "✓ {} (seed={}) committed={} stale={} below_threshold={}",
            name,
            result.seed,
            result.metrics.committed,
            result.metrics.stale,
            result.metrics.insufficient_energy
        );
    } else {
        error!(
            "✗ {} (seed={}): {}",
            name,
            result.seed,
            result.failure_reason.as_deref().unwrap_or("unknown")
        );
    }
}

/// Prints the run summary, as JSON on stdout or as log lines.
///
/// Returns true if every run passed.
fn print_summary(results: &[ScenarioResult], json: bool) -> bool {
    let failed: Vec<&ScenarioResult> = results.iter().filter(|r| !r.passed).collect();

    if json {
        let runs: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "scenario": r.scenario,
                    "seed": r.seed,
                    "passed": r.passed,
                    "metrics": r.metrics,
                    "failure_reason": r.failure_reason,
                })
            })
            .collect();
        let summary = serde_json::json!({
            "runs": results.len(),
            "failed": failed.len(),
            "results": runs,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return false;
            }
        }
    } else if failed.is_empty() {
        info!("{} run(s) passed", results.len());
    } else {
        error!("{}/{} run(s) failed", failed.len(), results.len());
        for r in &failed {
            error!("  {} seed={}", r.scenario.name(), r.seed);
        }
    }

    failed.is_empty()
}
