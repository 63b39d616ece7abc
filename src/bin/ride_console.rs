//! Terminal driver console.
//!
//! Runs the simulation with a plain-text renderer on stdout and reads
//! commands from stdin, one per line (`online`, `accept`, `next`,
//! `go_to 2`, `swipe 300 100`, ...). With the `web` feature the same
//! dashboard is also served over HTTP on localhost.
//!
//! # Usage
//!
//! ```sh
//! cargo run --bin ride_console -- [trip.json]
//! cargo run --bin ride_console --features web -- trip.json
//! RUST_LOG=ride_console=debug cargo run --bin ride_console
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use ride_console::hal::{SystemClock, TerminalRenderer};
use ride_console::{
    CommandOutcome, CommandSource, Config, Dashboard, DashboardCommand, Scheduler, TripConfig,
};

/// Trip file used when no path is given.
const DEFAULT_TRIP_PATH: &str = "config.json";

/// Terminal refresh period; slower than the default so typed input stays readable.
const TERMINAL_RENDER_MS: u64 = 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ride_console=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let trip_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_TRIP_PATH.to_string());

    let config = Config::default();
    let simulation = config
        .simulation
        .clone()
        .with_render_interval_ms(TERMINAL_RENDER_MS);

    let trip = TripConfig::load_or_default(&trip_path).await;
    let dashboard = Arc::new(Dashboard::new(simulation, SystemClock::new()).with_trip(trip));

    let scheduler = Scheduler::start_with_renderer(Arc::clone(&dashboard), TerminalRenderer::stdout());
    let token = scheduler.cancellation_token();

    let input = tokio::spawn(read_commands(Arc::clone(&dashboard), token.clone()));

    #[cfg(feature = "web")]
    let web = {
        use ride_console::services::{run_server, WebServerConfig};

        let web_config = WebServerConfig::from_config(&config.web);
        config.web.enabled.then(|| {
            tokio::spawn(run_server(Arc::clone(&dashboard), web_config, token.clone()))
        })
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for Ctrl+C")?;
            tracing::info!("interrupt received");
        }
        // `quit` typed
        _ = token.cancelled() => {}
    }

    scheduler.shutdown().await;
    input.abort();

    #[cfg(feature = "web")]
    if let Some(web) = web {
        web.await
            .context("web server task panicked")?
            .context("web server failed")?;
    }

    Ok(())
}

/// Apply commands typed on stdin. `quit` stops the console; EOF only stops reading.
async fn read_commands(dashboard: Arc<Dashboard<SystemClock>>, token: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = token.cancelled() => break,
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                return;
            }
        };

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }

        match text.parse::<DashboardCommand>() {
            Ok(cmd) => match dashboard.apply_command_from(cmd, CommandSource::Local) {
                CommandOutcome::Rejected(reason) => tracing::warn!(command = cmd.name(), %reason, "rejected"),
                CommandOutcome::Ignored => tracing::info!(command = cmd.name(), "nothing to do"),
                CommandOutcome::Applied => {}
            },
            Err(e) => tracing::warn!(input = text, error = %e, "not a command"),
        }
    }

    token.cancel();
}
