use analytics::AnalyticsEngine;
use anyhow::Context;
use backend_client::{AuthContext, HttpClientFactory};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::Config;
use core_types::Ratio;
use rust_decimal::Decimal;
use session::{
    classify_startup_error, ActorSession, ErrorContext, JournalStore, StartupGate,
    StartupStatus,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// The main entry point for the fxjournal application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status => handle_status().await,
        Commands::Report => handle_report().await,
        Commands::Tools(tool) => handle_tool(tool),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A discipline-scored forex trading journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the startup sequence and print where it settled.
    Status,
    /// Fetch the journal and print the performance report.
    Report,
    /// Standalone planning calculators.
    #[command(subcommand)]
    Tools(Tool),
}

#[derive(Subcommand)]
enum Tool {
    /// Position size that risks a fixed amount over a stop distance.
    LotSize {
        #[arg(long)]
        account: Decimal,
        #[arg(long)]
        risk_percent: Decimal,
        #[arg(long)]
        entry: Decimal,
        #[arg(long)]
        stop: Decimal,
        /// Currency pair, used to pick the pip size (e.g. "EURUSD").
        #[arg(long)]
        pair: String,
    },
    /// Probability of losing the account under the given edge.
    RiskOfRuin {
        #[arg(long)]
        win_rate: Decimal,
        #[arg(long)]
        avg_win: Decimal,
        #[arg(long)]
        avg_loss: Decimal,
        #[arg(long)]
        risk_percent: Decimal,
    },
    /// Gain required to recover from a drawdown.
    DrawdownRecovery {
        #[arg(long)]
        drawdown: Decimal,
    },
    /// Month-by-month compounding projection.
    Compound {
        #[arg(long)]
        balance: Decimal,
        #[arg(long)]
        monthly_return: Decimal,
        #[arg(long)]
        months: u32,
    },
}

// ==============================================================================
// Startup plumbing
// ==============================================================================

fn build_session(config: &Config) -> Arc<ActorSession> {
    let factory = Arc::new(HttpClientFactory::new(config.backend.clone()));
    let auth = match &config.auth.token {
        Some(token) => AuthContext::authenticated(token.clone()),
        None => AuthContext::anonymous(),
    };
    Arc::new(ActorSession::new(
        factory,
        auth,
        config.admin.init_secret.clone(),
        config.startup.clone(),
    ))
}

/// Drives the startup gate to a settled status, printing the classified
/// error when it is not `Ready`.
async fn start_up(config: &Config) -> anyhow::Result<(Arc<ActorSession>, StartupStatus)> {
    let session = build_session(config);
    let gate = StartupGate::new(Arc::clone(&session), config.startup.clone());

    gate.start();
    let snapshot = gate.wait_until_settled().await;

    if let Some(warning) = session.snapshot().admin_init_warning {
        tracing::warn!("{}", warning);
    }

    match snapshot.status {
        StartupStatus::Ready | StartupStatus::SetupNeeded => {}
        status => {
            let context = if status == StartupStatus::ProfileError {
                Some(ErrorContext::Profile)
            } else {
                Some(ErrorContext::Actor)
            };
            let classified = classify_startup_error(snapshot.error.as_deref(), context);
            eprintln!("{}: {}", classified.title, classified.description);
            if let Some(details) = classified.technical_details {
                eprintln!("  details: {}", details);
            }
        }
    }

    Ok((session, snapshot.status))
}

async fn handle_status() -> anyhow::Result<()> {
    let config = configuration::load_config().context("failed to load config.toml")?;
    let (_session, status) = start_up(&config).await?;

    match status {
        StartupStatus::Ready => println!("ready"),
        StartupStatus::SetupNeeded => {
            println!("setup-needed: no profile yet; create one to finish setup")
        }
        StartupStatus::ConnectionError => println!("connection-error"),
        StartupStatus::ProfileError => println!("profile-error"),
        StartupStatus::Timeout => println!("timeout"),
        StartupStatus::Loading => unreachable!("gate settled"),
    }
    Ok(())
}

// ==============================================================================
// Report command
// ==============================================================================

async fn handle_report() -> anyhow::Result<()> {
    let config = configuration::load_config().context("failed to load config.toml")?;
    let (session, status) = start_up(&config).await?;

    match status {
        StartupStatus::Ready => {}
        StartupStatus::SetupNeeded => {
            anyhow::bail!("no profile yet; run setup before requesting a report")
        }
        _ => anyhow::bail!("startup did not reach ready"),
    }

    let store = JournalStore::new(session);
    let trades = store.trades().await.context("failed to fetch trades")?;

    let engine = AnalyticsEngine::with_starting_balance(config.journal.starting_balance);
    let metrics = engine.compute_metrics(&trades);

    let mut kpis = Table::new();
    kpis.set_header(vec!["Metric", "Value"]);
    kpis.add_row(vec!["Completed trades".to_string(), metrics.total_trades.to_string()]);
    kpis.add_row(vec![
        "Win rate".to_string(),
        format!("{}%", metrics.win_rate_pct.round_dp(1)),
    ]);
    kpis.add_row(vec![
        "Net P/L".to_string(),
        metrics.net_profit_loss.round_dp(2).to_string(),
    ]);
    kpis.add_row(vec![
        "Profit factor".to_string(),
        metrics.profit_factor.to_string(),
    ]);
    kpis.add_row(vec![
        "Expectancy".to_string(),
        metrics.expectancy.round_dp(2).to_string(),
    ]);
    kpis.add_row(vec![
        "Average RR".to_string(),
        metrics.average_rr.round_dp(2).to_string(),
    ]);
    kpis.add_row(vec![
        "Max drawdown".to_string(),
        format!("{}%", metrics.max_drawdown_pct.round_dp(2)),
    ]);
    kpis.add_row(vec![
        "Current streak".to_string(),
        format!("{} {:?}(s)", metrics.current_streak.count, metrics.current_streak.outcome),
    ]);
    kpis.add_row(vec![
        "Risk consistency".to_string(),
        metrics.risk_consistency_score.round_dp(1).to_string(),
    ]);
    kpis.add_row(vec![
        "Discipline".to_string(),
        metrics.discipline_score.round_dp(1).to_string(),
    ]);
    println!("{kpis}");

    let mut months = Table::new();
    months.set_header(vec!["Month", "Trades", "P/L"]);
    for month in engine.monthly_performance(&trades) {
        months.add_row(vec![
            month.month,
            month.trades.to_string(),
            month.profit.round_dp(2).to_string(),
        ]);
    }
    println!("{months}");

    let mut sessions = Table::new();
    sessions.set_header(vec!["Session", "Trades", "Win rate", "P/L"]);
    for bucket in engine.session_performance(&trades) {
        sessions.add_row(vec![
            bucket.session.to_string(),
            bucket.trades.to_string(),
            format!("{}%", bucket.win_rate_pct.round_dp(1)),
            bucket.profit.round_dp(2).to_string(),
        ]);
    }
    println!("{sessions}");

    let mut pairs = Table::new();
    pairs.set_header(vec!["Pair", "Trades", "P/L"]);
    for pair in engine.pair_distribution(&trades) {
        pairs.add_row(vec![
            pair.pair,
            pair.trades.to_string(),
            pair.profit.round_dp(2).to_string(),
        ]);
    }
    println!("{pairs}");

    Ok(())
}

// ==============================================================================
// Calculator commands
// ==============================================================================

fn handle_tool(tool: Tool) -> anyhow::Result<()> {
    match tool {
        Tool::LotSize {
            account,
            risk_percent,
            entry,
            stop,
            pair,
        } => {
            let risk = calculators::risk_amount(account, risk_percent);
            let distance = calculators::stop_distance(entry, stop);
            let pip = calculators::pip_value(&pair);
            let lots = calculators::lot_size(risk, distance, pip);
            println!("risk amount: {}", risk.round_dp(2));
            println!("stop distance: {}", distance);
            println!("lot size: {}", lots.round_dp(2));
        }
        Tool::RiskOfRuin {
            win_rate,
            avg_win,
            avg_loss,
            risk_percent,
        } => {
            let ruin = calculators::risk_of_ruin(win_rate, avg_win, avg_loss, risk_percent);
            println!("risk of ruin: {}%", ruin.round_dp(2));
        }
        Tool::DrawdownRecovery { drawdown } => match calculators::drawdown_recovery(drawdown) {
            Ratio::Finite(gain) => println!("required gain: {}%", gain.round_dp(2)),
            Ratio::Infinite => println!("required gain: unrecoverable (100% drawdown)"),
        },
        Tool::Compound {
            balance,
            monthly_return,
            months,
        } => {
            let mut table = Table::new();
            table.set_header(vec!["Month", "Balance"]);
            for point in calculators::compound_growth(balance, monthly_return, months) {
                table.add_row(vec![
                    point.month.to_string(),
                    point.balance.round_dp(2).to_string(),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}
