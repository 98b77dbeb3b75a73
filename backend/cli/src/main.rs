use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use restock_config::Config;
use restock_gateway::services::registry_from_config;
use restock_gateway::{start_server, AppState, Services};

#[derive(Parser)]
#[command(name = "restock")]
#[command(about = "Restock — human-in-the-loop stock reorder copilot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Restock gateway server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current server status
    Status,
    /// Check configuration and provider wiring
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    logging::init_logger(&config.log_dir, &config.log_level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    println!("Restock is up: {}", resp.status());
                }
                Err(_) => {
                    println!("Restock is not running on port {}", config.port);
                }
            }
        }
        Commands::Doctor => {
            run_doctor(&config);
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        reasoning_model = %config.reasoning_model,
        vision_model = %config.vision_model,
        "Starting Restock gateway"
    );

    for key in config.missing_keys() {
        info!(key, "API key not set; that provider falls back to the mock");
    }

    let services = Services::from_config(&config);
    let state = AppState::new(services);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .context("invalid bind address")?;
    start_server(addr, state).await
}

fn run_doctor(config: &Config) {
    let registry = registry_from_config(config);
    let mut providers = registry.list();
    providers.sort();
    println!("providers: {}", providers.join(", "));

    let missing = config.missing_keys();
    if missing.is_empty() {
        println!("all API keys configured");
    } else {
        for key in missing {
            println!("warning: {key} is not set (calls will use the mock provider)");
        }
    }
    println!("reasoning model: {}", config.reasoning_model);
    println!("vision model:    {}", config.vision_model);
}
