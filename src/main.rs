use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pl_predictor::api::{ApiClient, PredictionService};
use pl_predictor::config::Config;
use pl_predictor::controllers::Trigger;
use pl_predictor::dashboard::{Dashboard, DashboardSettings};
use pl_predictor::render;
use pl_predictor::PredictorError;

#[derive(Parser)]
#[command(name = "pl-predictor")]
#[command(about = "Premier League match predictions from the prediction service", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List upcoming matches and data freshness
    Matches,
    /// Show the league table
    Table,
    /// Predict upcoming matches
    Predict {
        /// Only predict the match at this position (1-based)
        #[arg(long)]
        index: Option<usize>,
    },
    /// Simulate any matchup
    Lab {
        home: String,
        away: String,
    },
    /// Pull the latest results into the backend dataset
    Update,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "pl_predictor=debug,info"
    } else {
        "pl_predictor=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Using prediction service at {}", config.api_url);

    let client = ApiClient::new(&config.api_url, config.request_timeout)
        .context("Failed to create API client")?;
    let service: Arc<dyn PredictionService> = Arc::new(client);

    let settings = DashboardSettings {
        request_timeout: config.request_timeout,
        tiers: config.tiers.clone(),
        logos: config.logo_resolver()?,
        roster: config.roster()?,
    };

    let dashboard = Dashboard::mount(service, settings)
        .await
        .context("Failed to mount dashboard")?;

    let outcome = run(&dashboard, cli.command.unwrap_or(Commands::Matches)).await;
    dashboard.dispose();
    outcome
}

async fn run(dashboard: &Dashboard, command: Commands) -> Result<()> {
    match command {
        Commands::Matches => {
            let freshness = dashboard.freshness().status().await;
            let status = dashboard.updater().status().await;
            print!("{}", render::update_pane(freshness, &status));
            println!();
            print_cards(dashboard).await;
        }
        Commands::Table => {
            print!("{}", render::table(dashboard.table()));
        }
        Commands::Predict { index } => {
            match index {
                Some(index) => {
                    let controller = index
                        .checked_sub(1)
                        .and_then(|i| dashboard.matches().get(i))
                        .with_context(|| {
                            format!(
                                "no match at position {} ({} listed)",
                                index,
                                dashboard.matches().len()
                            )
                        })?;
                    controller.predict().await;
                }
                None => {
                    let issued = dashboard.predict_all().await;
                    info!("Issued {} predictions", issued);
                }
            }
            print_cards(dashboard).await;
        }
        Commands::Lab { home, away } => {
            let lab = dashboard.lab();
            lab.select_home(&home).await?;
            lab.select_away(&away).await?;

            match lab.predict().await {
                Ok(_) | Err(PredictorError::Validation(_)) => {}
                Err(e) => return Err(e.into()),
            }

            let (home, away) = lab.selection().await;
            print!(
                "{}",
                render::lab(&home, &away, &lab.state().await, dashboard.tiers())
            );
        }
        Commands::Update => {
            let updater = dashboard.updater();
            if updater.trigger().await == Trigger::Ignored {
                println!("Update already running");
            }
            let freshness = dashboard.freshness().status().await;
            print!("{}", render::update_pane(freshness, &updater.status().await));
        }
    }

    Ok(())
}

async fn print_cards(dashboard: &Dashboard) {
    if dashboard.matches().is_empty() {
        println!("No upcoming matches");
        return;
    }

    println!("Upcoming Matches:");
    for controller in dashboard.matches() {
        let state = controller.state().await;
        println!(
            "{}",
            render::match_card(
                controller.fixture(),
                &state,
                dashboard.logos(),
                dashboard.tiers()
            )
        );
    }
}
