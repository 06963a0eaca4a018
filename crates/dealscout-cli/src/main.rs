mod browse;
mod commands;
mod render;
mod session;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use dealscout_core::{FilterField, Filters};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dealscout")]
#[command(about = "Search a dealership's used inventory within a qualified budget")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List dealer names matching partial input
    Suggest {
        /// Part of a dealership name
        partial: String,
    },
    /// Check whether a dealer's inventory feed is online
    Status {
        /// Exact dealership name
        dealer: String,
    },
    /// Search a dealer's used inventory within a budget
    Search(SearchArgs),
    /// Interactive session with live suggestions and status checks
    Browse,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Exact dealership name, as offered by `suggest`
    #[arg(long)]
    dealer: String,
    /// Qualified amount; non-digits are ignored (e.g. "$25,000")
    #[arg(long)]
    amount: String,
    #[arg(long)]
    year_from: Option<String>,
    #[arg(long)]
    year_to: Option<String>,
    /// Maximum odometer reading
    #[arg(long)]
    max_mileage: Option<String>,
    #[arg(long)]
    body_type: Option<String>,
    #[arg(long)]
    make: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    trim: Option<String>,
    /// Results page to show (1-based)
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Print the available filter choices after the results
    #[arg(long)]
    options: bool,
    /// Refuse to search unless the dealer feed reports inventory
    #[arg(long)]
    check_status: bool,
    /// Print the visible page as JSON
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    fn filters(&self) -> Filters {
        let fields = [
            (FilterField::YearFrom, &self.year_from),
            (FilterField::YearTo, &self.year_to),
            (FilterField::MaxMileage, &self.max_mileage),
            (FilterField::BodyType, &self.body_type),
            (FilterField::Make, &self.make),
            (FilterField::Model, &self.model),
            (FilterField::Trim, &self.trim),
        ];
        fields
            .into_iter()
            .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
            .fold(Filters::default(), |filters, (field, value)| {
                filters.with(field, value)
            })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = dealscout_core::load_app_config()
        .context("Vehicle search is temporarily unavailable: configuration could not be loaded")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Suggest { partial } => commands::run_suggest(&config, &partial).await,
        Commands::Status { dealer } => commands::run_status(&config, &dealer).await,
        Commands::Search(args) => commands::run_search(&config, &args).await,
        Commands::Browse => browse::run_browse(&config).await,
    }
}
