//! Command line interface of `heaan-bench`.
use crate::bench::{BenchmarkReport, TargetOptions, find_target, targets};
use crate::compiler::CompilationConfiguration;
use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(name = "heaan-bench")]
#[command(about = "Compile small integer functions to CKKS circuits and benchmark them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors. Cannot be combined with `-v`
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available benchmark targets
    List,
    /// Run one target, or every target with `all`
    Run {
        target: String,

        /// TOML file with compilation settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of encrypted evaluations
        #[arg(short, long, default_value_t = 4)]
        samples: usize,

        /// Seed for sample inputs and, unless the config sets one, for keys
        #[arg(long)]
        seed: Option<u64>,

        /// Write the JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exit with an error when an alert fires
        #[arg(long)]
        strict: bool,
    },
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            }
        }
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::List => {
                for target in targets() {
                    println!("{:<16} {}", target.name, target.description);
                }
                Ok(())
            }
            Commands::Run {
                target,
                config,
                samples,
                seed,
                output,
                strict,
            } => {
                let mut configuration = match &config {
                    Some(path) => CompilationConfiguration::load(path)?,
                    None => CompilationConfiguration::benchmark(),
                };
                if configuration.seed.is_none() {
                    configuration.seed = seed;
                }
                let options = TargetOptions {
                    samples,
                    seed,
                    configuration,
                };
                let reports = run_targets(&target, &options)?;

                if let Some(path) = output {
                    let json = serde_json::to_string_pretty(&reports)?;
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "report written");
                }

                if strict {
                    ensure_no_alerts(&reports)?;
                }
                Ok(())
            }
        }
    }
}

fn run_targets(name: &str, options: &TargetOptions) -> Result<Vec<BenchmarkReport>> {
    let selected: Vec<_> = if name == "all" {
        targets().iter().collect()
    } else {
        vec![find_target(name).with_context(|| format!("unknown target `{name}`"))?]
    };

    let mut reports = Vec::with_capacity(selected.len());
    for target in selected {
        info!(target = target.name, "running benchmark");
        let report = (target.run)(options)
            .with_context(|| format!("benchmark `{}` failed", target.name))?;
        print!("{report}");
        reports.push(report);
    }
    Ok(reports)
}

/// Fails when any report carries a triggered alert.
pub fn ensure_no_alerts(reports: &[BenchmarkReport]) -> Result<()> {
    let fired = reports.iter().flat_map(|r| r.triggered_alerts()).count();
    if fired > 0 {
        bail!("{fired} alert(s) fired");
    }
    Ok(())
}
