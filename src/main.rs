//! Appointments service entry point.

use axum::extract::Request;
use axum::ServiceExt;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use appointments_service::api::{create_router, AppState};
use appointments_service::config::Config;
use appointments_service::metrics;
use appointments_service::store::{AppointmentStore, IdPolicy};
use appointments_service::utils::shutdown_signal;

/// In-memory appointment booking service.
#[derive(Parser, Debug)]
#[command(name = "appointments-service")]
#[command(about = "HTTP service for creating, listing and deleting appointments")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Run {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Id assignment rule (overrides ID_POLICY).
        #[arg(long, value_enum)]
        id_policy: Option<IdPolicy>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("appointments_service=debug,tower_http=debug,info")
    } else {
        let directives = config.as_ref().map(|c| c.log_filter()).unwrap_or("info");
        EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Run { port, id_policy }) => {
            cmd_run(config?, port.or(args.port), id_policy).await
        }
        None => cmd_run(config?, args.port, None).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(loaded: appointments_service::Result<Config>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("APPOINTMENTS SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match loaded {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    if let Err(e) = config.validate() {
        println!("FAILED");
        println!("  Error: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }
    println!("OK");

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind Address: {}:{}", config.host, config.port);
    println!("  Id Policy: {:?}", config.id_policy);
    println!("  Seed Appointments: {}", config.seed_appointments);
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Serve the appointments API until a shutdown signal arrives.
async fn cmd_run(
    mut config: Config,
    port: Option<u16>,
    id_policy: Option<IdPolicy>,
) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(policy) = id_policy {
        config.id_policy = policy;
    }
    config.validate()?;

    let store = if config.seed_appointments {
        AppointmentStore::seeded(config.id_policy)
    } else {
        AppointmentStore::new(config.id_policy)
    };

    let mut app_state = AppState::new(store);
    if config.metrics_enabled {
        match metrics::install_prometheus() {
            Ok(handle) => app_state = app_state.with_metrics(handle),
            Err(e) => warn!("Metrics disabled, recorder install failed: {}", e),
        }
    }

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    info!(
        "Id policy: {:?}, seeded: {}",
        config.id_policy, config.seed_appointments
    );

    let app = create_router(app_state);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
