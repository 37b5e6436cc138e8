use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};
use wallet_reputation::{
    api::{self, AppState},
    badge::{render_badge_svg, style_for_name},
    config::Settings,
    models::AnalysisOutcome,
    service::ReputationService,
};

#[derive(Parser)]
#[clap(name = "wallet-reputation")]
#[clap(about = "Score wallet activity and issue soulbound reputation badges", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an address and print its reputation
    Analyze {
        /// Wallet address (0x...)
        #[clap(short, long)]
        address: String,

        /// Print the raw JSON result
        #[clap(long)]
        json: bool,
    },

    /// Check whether an address already holds a badge
    CheckBadge {
        #[clap(short, long)]
        address: String,
    },

    /// Analyze an address, then mint its badge
    Mint {
        #[clap(short, long)]
        address: String,
    },

    /// Start the API server
    Serve {
        /// Port to listen on (defaults to api.port)
        #[clap(short, long)]
        port: Option<u16>,
    },

    /// Render the badge artwork for a category
    RenderSvg {
        #[clap(short, long)]
        category: String,

        /// Write to a file instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::new().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        Settings::default()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.app.log_level)),
        )
        .init();

    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    match cli.command {
        Commands::Analyze { address, json } => {
            let service = connect(&settings).await?;
            let outcome = service.analyze(&address).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }

            match outcome {
                AnalysisOutcome::Scored(result) => {
                    println!("\n=== Wallet Reputation ===");
                    println!("Address: {}", result.details.address);
                    println!("Transactions: {}", result.details.transaction_count);
                    println!("Balance: {}", result.details.balance);
                    println!("Category: {}", result.category);
                    println!("Score: {}/100", result.score);
                    println!("\n{}", result.message);
                    println!("{}", result.rationale);
                }
                AnalysisOutcome::Failed(failure) => {
                    println!("\n❌ Analysis failed: {}", failure.message);
                }
            }
        }

        Commands::CheckBadge { address } => {
            let service = connect(&settings).await?;
            let has_badge = service.check_badge(&address).await?;
            if has_badge {
                println!("✅ {} holds a reputation badge", address);
            } else {
                println!("{} has no reputation badge yet", address);
            }
        }

        Commands::Mint { address } => {
            let service = connect(&settings).await?;
            let result = match service.analyze(&address).await {
                AnalysisOutcome::Scored(result) => result,
                AnalysisOutcome::Failed(failure) => {
                    anyhow::bail!("Analysis failed: {}", failure.message);
                }
            };

            info!(%address, category = %result.category, score = result.score, "Minting badge");
            let outcome = service.mint(&address, &result).await;

            if outcome.success {
                println!("\n✅ {}", outcome.message);
            } else {
                println!("\n❌ Mint failed: {}", outcome.message);
            }
            if let Some(tx_hash) = &outcome.tx_hash {
                println!("Transaction: {}/tx/{}", settings.chain.explorer_url.trim_end_matches('/'), tx_hash);
            }
            if let Some(token_id) = outcome.token_id {
                println!("Token ID: {}", token_id);
            }
        }

        Commands::Serve { port } => {
            let port = port.unwrap_or(settings.api.port);
            let addr: SocketAddr = format!("{}:{}", settings.api.host, port)
                .parse()
                .with_context(|| format!("Invalid listen address {}:{}", settings.api.host, port))?;

            let service = connect(&settings).await?;
            let state = AppState::new(service, settings);
            api::serve(state, addr).await.context("HTTP server error")?;
        }

        Commands::RenderSvg { category, output } => {
            let svg = render_badge_svg(&style_for_name(&category));
            match output {
                Some(path) => {
                    std::fs::write(&path, svg)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Badge written to {}", path.display());
                }
                None => println!("{}", svg),
            }
        }
    }

    Ok(())
}

async fn connect(settings: &Settings) -> anyhow::Result<ReputationService> {
    ReputationService::from_settings(settings)
        .await
        .context("Failed to initialize reputation service")
}
