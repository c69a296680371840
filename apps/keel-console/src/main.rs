use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keel_console::config::ConsoleConfig;
use keel_console::{AppState, build_router, cli};

#[derive(Parser)]
#[command(name = "keel-console")]
#[command(about = "Web admin console for the cluster management server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web console
    Serve {
        /// Overrides the configured listen port
        #[arg(long, env = "KEEL_LISTEN_PORT")]
        port: Option<u16>,
    },
    /// Inspect or change the installed license
    License {
        #[command(subcommand)]
        action: LicenseCommand,
    },
    /// Page through server logs, newest first
    Logs {
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
}

#[derive(Subcommand)]
enum LicenseCommand {
    Show,
    Update {
        /// License file to install
        #[arg(long)]
        file: Option<PathBuf>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    Delete {
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    let file_appender = tracing_appender::rolling::never(".", "console.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keel_console=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let config = ConsoleConfig::load()?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.listen_port);
            tracing::info!("Keel console starting...");
            tracing::info!("Management server: {}", config.api_base());
            tracing::info!("Cluster: {}", config.cluster);

            let app = build_router(AppState::new(config)?);

            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            tracing::info!("Console listening on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
        Commands::License { action } => {
            let state = AppState::new(config)?;
            match action {
                LicenseCommand::Show => cli::license_show(&state.client, &state.catalog).await?,
                LicenseCommand::Update { file, yes } => {
                    cli::license_update(
                        &state.client,
                        &state.catalog,
                        file.as_deref(),
                        state.config.max_upload_bytes,
                        yes,
                    )
                    .await?
                }
                LicenseCommand::Delete { yes } => {
                    cli::license_delete(&state.client, &state.catalog, yes).await?
                }
            }
        }
        Commands::Logs { pages } => {
            let state = AppState::new(config)?;
            cli::logs(&state.client, &state.catalog, pages).await?;
        }
    }

    Ok(())
}
