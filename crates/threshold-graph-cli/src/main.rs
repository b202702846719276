//! tgraph - run a Boolean threshold network simulation and stream samples.
//!
//! Builds one simulator from a parameter bag, equilibrates it, then takes
//! `--samples` measurements `--steps-per-sample` steps apart. Each measurement
//! is written to stdout as one JSON line; logs go to stderr.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use threshold_graph_automaton::{build_simulator, seeded_rng, Samples, SimulatorKind};
use tracing::{info, Level};

mod params;

/// Run a Boolean threshold network simulation.
#[derive(Parser, Debug)]
#[command(
    name = "tgraph",
    author,
    version,
    about = "Boolean threshold network simulator",
    long_about = None
)]
struct Cli {
    /// Topology: lattice, random_k or nonlocal.
    #[arg(short, long)]
    kind: SimulatorKind,

    /// Seed of the simulator's random stream.
    #[arg(short, long, default_value_t = 0, env = "TGRAPH_SEED")]
    seed: u64,

    /// JSON file holding a flat object of parameters.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Parameter override, e.g. `-p eta=0.1` (repeatable, applied after --params).
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Steps run before the first sample.
    #[arg(long, default_value_t = 0)]
    equilibration_steps: u32,

    /// Steps run between samples.
    #[arg(long, default_value_t = 1)]
    steps_per_sample: u32,

    /// Number of samples to take.
    #[arg(short = 'n', long, default_value_t = 1)]
    samples: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// One output line.
#[derive(Serialize)]
struct SampleRecord<'a> {
    kind: SimulatorKind,
    sample: u32,
    steps: u64,
    #[serde(flatten)]
    values: &'a Samples,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let bag = params::load_params(cli.params.as_deref(), &cli.overrides)?;
    let mut sim = build_simulator(cli.kind, &bag, seeded_rng(cli.seed))
        .with_context(|| format!("failed to build {} simulator", cli.kind))?;

    sim.equilibrate(cli.equilibration_steps)
        .context("equilibration failed")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for sample in 0..cli.samples {
        sim.advance(cli.steps_per_sample)
            .with_context(|| format!("simulation failed before sample {sample}"))?;
        let values = sim.sample();
        let record = SampleRecord {
            kind: cli.kind,
            sample,
            steps: sim.steps_taken(),
            values: &values,
        };
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;

    info!(
        kind = %cli.kind,
        samples = cli.samples,
        steps = sim.steps_taken(),
        "run_complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "tgraph", "--kind", "nonlocal", "--seed", "7", "-p", "system_size=16", "-p",
            "eta=0.1", "-n", "3",
        ])
        .unwrap();
        assert_eq!(cli.kind, SimulatorKind::Nonlocal);
        assert_eq!(cli.seed, 7);
        assert_eq!(cli.overrides.len(), 2);
        assert_eq!(cli.samples, 3);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["tgraph", "--kind", "hypercube"]).is_err());
    }
}
