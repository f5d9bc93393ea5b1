mod cli;
mod monitor;
mod query;
mod source;

use anyhow::{Context, Result};
use clap::Parser;
use nix::sys::signal::{signal, SigHandler, Signal};
use tracing::info;

use uudev_core::config::{load_dotenv, Config};
use uudev_dispatch::{Dispatcher, ShellExecutor};
use uudev_rules::RuleLoader;

use crate::cli::CliArgs;
use crate::source::UdevSource;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize tracing on stderr; stdout carries operator diagnostics.
    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = args.path.as_deref() {
        return query::query(path, args.verbose);
    }

    if args.monitor {
        let mut source = UdevSource::open().context("failed to open udev monitor")?;
        return monitor::monitor(&mut source, args.verbose, args.json);
    }

    load_dotenv();
    let config = Config::from_env(args.conf.as_deref()).context("failed to resolve configuration")?;
    config.log_summary();

    let loader = RuleLoader::new(&config.conf_path);
    let report = loader
        .load()
        .with_context(|| format!("failed to load rules from {}", loader.path().display()))?;

    install_signal_policy()?;

    if args.verbose > 0 {
        report.rules.dump(&mut std::io::stdout().lock())?;
    }

    let mut source = UdevSource::open().context("failed to open udev monitor")?;
    let mut dispatcher = Dispatcher::new(report.rules, ShellExecutor::new(&config.shell))
        .with_verbosity(args.verbose);

    info!(
        rules = dispatcher.rules().len(),
        shell = %dispatcher.executor().shell().display(),
        "uudev started"
    );
    dispatcher.run(&mut source).context("device source failed")?;
    Ok(())
}

/// Keep broken pipes from killing the daemon and leave child reaping to
/// the executor's own wait.
fn install_signal_policy() -> Result<()> {
    // SAFETY: only default and ignore dispositions are installed, no handlers run.
    unsafe {
        signal(Signal::SIGPIPE, SigHandler::SigIgn).context("failed to ignore SIGPIPE")?;
        signal(Signal::SIGCHLD, SigHandler::SigDfl).context("failed to reset SIGCHLD")?;
    }
    Ok(())
}
