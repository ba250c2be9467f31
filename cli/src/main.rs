mod commands;
mod terminal;

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use commands::CommandLine;
use mping_common::network::target::ResolvedTarget;
use mping_core::engine::{EngineError, Pinger};
use mping_core::resolver::{self, ResolveError, SystemLookup};
use mping_protocols::icmp::IcmpProber;
use terminal::{logging, print::TableReporter, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    if !is_root::is_root() {
        anyhow::bail!("Administrative privileges are required to use mping.");
    }

    let cfg = commands.config()?;
    let targets = commands.parsed_targets()?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let resolved: Vec<ResolvedTarget> = {
        let _spinner = spinner::start_resolution_spinner(targets.len());
        match resolver::resolve_targets(Arc::new(SystemLookup), &targets, cfg.ip_version, &cancel).await {
            Ok(resolved) => resolved,
            Err(ResolveError::Cancelled) => return Ok(()),
        }
    };

    for target in &resolved {
        if let Some(addr) = target.address {
            debug!("Resolved Target: {addr} ({})", target.label);
        }
    }

    let prober = IcmpProber::for_targets(&resolved).context("Failed to prepare ICMP probing")?;
    let pinger = Pinger::new(resolved, Arc::new(prober), &cfg)?;

    let stdout = io::stdout();
    let is_tty = stdout.is_terminal();
    let mut reporter = TableReporter::new(stdout.lock(), pinger.targets(), cfg.show_rtt)
        .clear_line_on_interrupt(is_tty);

    match pinger.run(&mut reporter, &cancel).await {
        Ok(_) | Err(EngineError::Cancelled) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Cancels `cancel` on Ctrl-C, or SIGTERM on unix.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        wait_for_interrupt().await;
        debug!("Interrupt received, stopping");
        cancel.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_interrupt() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to listen for SIGTERM: {e}");
            return ctrl_c().await;
        }
    };

    tokio::select! {
        _ = ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_interrupt() {
    ctrl_c().await
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
