use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use swarm_load::{
    Config, Dispatcher, HttpTransport, MockTransport, RunConfig, SimulatedSensor, TcpTransport,
    Transport, TransportConfig,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "swarm-load")]
#[command(about = "Simulated sensor fleet load generator")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "swarm-load.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "swarm_load=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    let sensor_ids = config.fleet.sensor_ids();

    info!(
        sensors = sensor_ids.len(),
        batch_size = config.batch.size,
        host = %config.target.host,
        port = config.target.port,
        path = %config.target.path,
        "Starting swarm-load"
    );

    let transport: Arc<dyn Transport> = match config.transport {
        TransportConfig::Http {
            connect_timeout_secs,
            read_timeout_secs,
        } => {
            info!(connect_timeout_secs, read_timeout_secs, "Using HTTP transport");
            Arc::new(HttpTransport::new(
                &config.target,
                Duration::from_secs(connect_timeout_secs),
                Duration::from_secs(read_timeout_secs),
            )?)
        }
        TransportConfig::Tcp {
            connect_timeout_secs,
            read_timeout_secs,
        } => {
            info!(connect_timeout_secs, read_timeout_secs, "Using raw socket transport");
            Arc::new(TcpTransport::new(
                &config.target,
                Duration::from_secs(connect_timeout_secs),
                Duration::from_secs(read_timeout_secs),
            ))
        }
        TransportConfig::Mock => {
            info!("Using mock transport (dry run)");
            Arc::new(MockTransport::ok())
        }
    };

    let sensors = SimulatedSensor::fleet(&sensor_ids, config.generate);
    let dispatcher = Dispatcher::new(transport, sensors, config.batch.size);

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down...");
            cancel_for_signal.cancel();
        }
    });

    let summary = match config.run {
        RunConfig::Oneshot {
            max_in_flight,
            max_delay_secs,
        } => {
            info!(max_in_flight, max_delay_secs, "Starting one-shot run");
            dispatcher
                .run_oneshot(
                    max_in_flight,
                    Duration::from_secs_f64(max_delay_secs),
                    cancel.clone(),
                )
                .await
        }
        RunConfig::Periodic {
            interval_secs,
            jitter_secs,
        } => {
            info!(interval_secs, jitter_secs, "Starting periodic run");
            dispatcher
                .run_periodic(
                    Duration::from_secs(interval_secs),
                    Duration::from_secs_f64(jitter_secs),
                    cancel.clone(),
                )
                .await
        }
    };

    info!(
        attempts = summary.attempts,
        successes = summary.successes,
        failures = summary.failures,
        elapsed_secs = summary.elapsed.as_secs_f64(),
        success_rate_pct = summary.success_rate() * 100.0,
        "Run complete"
    );

    Ok(())
}
