//! Binary entrypoint for pipevisor.
//!
//! Parses the CLI, installs `tracing`, and runs the pipeline until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, filter::Directive, fmt};

use pipevisor::{CONSUME_DURATION, Config, LogWriter, PRODUCE_CYCLE, Pipeline, SkipPolicy, Subscribe};

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "pipevisor", about = "Producer/consumer pipeline with graceful shutdown")]
struct Cli {
    /// Producer period, in time units
    #[arg(long, value_name = "UNITS", default_value_t = PRODUCE_CYCLE)]
    produce_cycle: u32,

    /// Worker duration per item, in time units
    #[arg(long, value_name = "UNITS", default_value_t = CONSUME_DURATION)]
    consume_duration: u32,

    /// Length of one time unit (ms)
    #[arg(long, value_name = "MILLIS", default_value_t = 1000)]
    time_unit_ms: u64,

    /// Staleness policy: check-after-pop | drain-to-latest
    #[arg(long, value_name = "POLICY", default_value = "check-after-pop")]
    skip: SkipPolicy,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            time_unit: Duration::from_millis(self.time_unit_ms),
            produce_cycle: self.produce_cycle,
            consume_duration: self.consume_duration,
            skip: self.skip,
            ..Config::default()
        }
    }
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let directive = format!("pipevisor={level}")
        .parse::<Directive>()
        .context("building log filter")?;
    let filter = EnvFilter::from_default_env().add_directive(directive);
    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = cli.config();
    info!(
        produce_cycle = cfg.produce_cycle,
        consume_duration = cfg.consume_duration,
        time_unit = ?cfg.time_unit,
        skip = cfg.skip.as_label(),
        "starting pipeline"
    );

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let pipeline = Pipeline::builder(cfg)
        .with_subscribers(subs)
        .build()
        .context("validating configuration")?;

    info!("press ctrl + c to terminate...");
    if let Err(e) = pipeline.run().await {
        error!(label = e.as_label(), "{}", e.as_message());
        return Err(e).context("pipeline stopped abnormally");
    }

    info!("main flow end");
    Ok(())
}
