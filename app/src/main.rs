// In app/src/main.rs

use analytics::{ResultView, Tone};
use anyhow::Result;
use api_client::{BacktestClient, Session};
use app_config::Settings;
use backtester::{BacktestPanel, PanelState, RequestBuilder, StrategySource};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use core_types::{ParamValue, Parameters};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strategies::TemplateCatalog;
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Build trading strategies and backtest them against the backtest service.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists the strategy templates and their default parameters.
    Templates,

    /// Compiles a strategy blueprint and prints the resulting spec as JSON.
    Compile {
        /// Path to the blueprint TOML file.
        #[arg(short, long)]
        blueprint: PathBuf,
    },

    /// Runs a backtest and prints the result summary.
    Backtest {
        /// Template to run (e.g., "momentum_breakout"). Defaults to `backtest.strategy_type`.
        #[arg(long, conflicts_with = "blueprint")]
        strategy_type: Option<String>,

        /// Run a custom block strategy from a blueprint file instead of a template.
        #[arg(short, long)]
        blueprint: Option<PathBuf>,

        /// Comma-separated tickers (e.g., "SPY, QQQ").
        #[arg(short, long)]
        symbols: String,

        /// Start date in YYYY-MM-DD format. Defaults to `backtest.lookback_days` ago.
        #[arg(long)]
        start_date: Option<String>,

        /// End date in YYYY-MM-DD format. Defaults to today.
        #[arg(long)]
        end_date: Option<String>,

        #[arg(long)]
        initial_capital: Option<f64>,

        /// Parameter override as key=value. Repeatable.
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, ParamValue)>,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings()?;
    init_tracing(&settings.app.log_level);

    tracing::info!(environment = %settings.app.environment, "Settings loaded.");

    match cli.command {
        Commands::Templates => handle_templates(&settings).await?,
        Commands::Compile { blueprint } => handle_compile(blueprint)?,
        Commands::Backtest {
            strategy_type,
            blueprint,
            symbols,
            start_date,
            end_date,
            initial_capital,
            params,
        } => {
            let source = match blueprint {
                Some(path) => StrategySource::Custom(compile_blueprint(&path)?),
                None => StrategySource::Template(
                    strategy_type.unwrap_or_else(|| settings.backtest.strategy_type.clone()),
                ),
            };
            let form = BacktestForm {
                source,
                symbols,
                start_date,
                end_date,
                initial_capital,
                overrides: params.into_iter().collect(),
            };
            handle_backtest(&settings, form).await?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = tracing::Level::from_str(log_level).unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("hyper", tracing::Level::WARN)
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Parses a `key=value` parameter override.
fn parse_param(raw: &str) -> std::result::Result<(String, ParamValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    let value = ParamValue::from_str(value.trim()).unwrap_or_else(|e| match e {});
    Ok((key.to_string(), value))
}

// --- "Templates" Subcommand Logic ---

/// The built-in catalog, overlaid with whatever the service reports.
async fn load_catalog(client: &BacktestClient) -> TemplateCatalog {
    let mut catalog = TemplateCatalog::builtin();
    match client.get_templates().await {
        Ok(remote) => {
            tracing::info!(count = remote.len(), "Merged templates reported by the service.");
            for template in &remote {
                catalog.merge(&template.strategy_type, &template.name, &template.parameters);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not fetch templates; using the built-in table.");
        }
    }
    catalog
}

async fn handle_templates(settings: &Settings) -> Result<()> {
    let client = BacktestClient::new(&settings.service)?;
    let catalog = load_catalog(&client).await;

    for template in catalog.iter() {
        println!("{} ({})", template.name, template.id);
        if !template.description.is_empty() {
            println!("  {}", template.description);
        }
        if !template.typical_trades_per_month.is_empty() {
            println!("  typical trades/month: {}", template.typical_trades_per_month);
        }
        for (key, value) in &template.default_parameters {
            println!("  {key:<20} {value}");
        }
    }
    Ok(())
}

// --- "Compile" Subcommand Logic ---

fn compile_blueprint(path: &Path) -> Result<core_types::StrategySpec> {
    let blueprint = app_config::load_blueprint(path)?;
    let session = blueprint.to_session();
    tracing::info!(name = %blueprint.name, blocks = session.len(), "Blueprint loaded.");
    Ok(session.compile_named(&blueprint.name)?)
}

fn handle_compile(path: PathBuf) -> Result<()> {
    let spec = compile_blueprint(&path)?;
    println!("{}", serde_json::to_string_pretty(&spec)?);
    Ok(())
}

// --- "Backtest" Subcommand Logic ---

/// The backtest panel's input fields, as typed by the user.
struct BacktestForm {
    source: StrategySource,
    symbols: String,
    start_date: Option<String>,
    end_date: Option<String>,
    initial_capital: Option<f64>,
    overrides: Parameters,
}

async fn handle_backtest(settings: &Settings, form: BacktestForm) -> Result<()> {
    // --- 1. Session ---
    let session = match &settings.broker {
        Some(broker) => match Session::login(&settings.service, broker).await {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "Brokerage login failed; continuing without a session.");
                None
            }
        },
        None => None,
    };

    run_in_session(session, run_backtest(settings, form)).await
}

/// Runs `work`, then closes `session` whatever the outcome.
async fn run_in_session<T>(session: Option<Session>, work: impl Future<Output = Result<T>>) -> Result<T> {
    let outcome = work.await;
    if let Some(session) = session {
        session.logout().await;
    }
    outcome
}

async fn run_backtest(settings: &Settings, form: BacktestForm) -> Result<()> {
    let client = BacktestClient::new(&settings.service)?;

    // --- 2. Build the Request ---
    let today = Utc::now().date_naive();
    let start_date = form.start_date.unwrap_or_else(|| {
        (today - Duration::days(i64::from(settings.backtest.lookback_days)))
            .format("%Y-%m-%d")
            .to_string()
    });
    let end_date = form.end_date.unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
    let initial_capital = form.initial_capital.unwrap_or(settings.backtest.initial_capital);

    let builder = RequestBuilder::new(load_catalog(&client).await);
    let request = builder.build_with_overrides(
        form.source,
        &form.symbols,
        &start_date,
        &end_date,
        Some(initial_capital),
        &form.overrides,
    )?;

    // --- 3. Run ---
    let mut panel = BacktestPanel::new(client);
    match panel.submit(&request).await? {
        PanelState::Success(result) => {
            let view = ResultView::new(result)?;
            print_view(&view);
            Ok(())
        }
        PanelState::Failed(e) => Err(anyhow::anyhow!(e.user_message())),
        other => Err(anyhow::anyhow!("Backtest ended in unexpected state '{}'", other.name())),
    }
}

fn print_view(view: &ResultView) {
    for metric in &view.metrics {
        let marker = match metric.tone {
            Tone::Positive => "+",
            Tone::Negative => "-",
            Tone::Neutral => " ",
        };
        println!("{marker} {metric}");
    }
    match (view.series.first(), view.series.last()) {
        (Some(first), Some(last)) => println!(
            "Equity curve: {} points, {:.2} -> {:.2}",
            view.series.len(),
            first.value,
            last.value
        ),
        _ => println!("Equity curve: no points"),
    }
}
