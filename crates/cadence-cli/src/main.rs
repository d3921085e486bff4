use app::App;
use cadence_core::error::CoreError;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod cli;
mod commands;
mod config;
mod parser;
mod templates;
mod util;
mod views;

fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = cli::Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "configuration loaded");

    let app = match App::open(config).await {
        Ok(app) => app,
        Err(e) => {
            handle_error(e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_task(&app, command).await,
        cli::Commands::Templates => commands::templates::list_templates(&app).await,
        cli::Commands::Remove(command) => commands::templates::remove_template(&app, command).await,
        cli::Commands::Today(command) => commands::view::show_day(&app, command).await,
        cli::Commands::Agenda(command) => commands::view::show_agenda(&app, command).await,
        cli::Commands::Actionable(command) => commands::view::show_actionable(&app, command).await,
        cli::Commands::Next(command) => commands::view::show_next(&app, command).await,
        cli::Commands::Do(command) => commands::r#do::do_task(&app, command).await,
        cli::Commands::Undo(command) => commands::r#do::undo_task(&app, command).await,
        cli::Commands::Ledger(command) => commands::ledger::ledger_command(&app, command).await,
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.downcast_ref::<CoreError>() {
        Some(CoreError::NotFound(s)) => {
            eprintln!("{} {}", "Error:".style(error_style), s);
        }
        Some(CoreError::AmbiguousId(tasks)) => {
            eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
            eprintln!("Did you mean one of these?");
            for (id, name) in tasks {
                eprintln!("  {} ({})", id.yellow(), name);
            }
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        Some(CoreError::InvalidRule(s)) => {
            eprintln!("{} Invalid recurrence: {}", "Error:".style(error_style), s.yellow());
        }
        Some(CoreError::Database(e)) => {
            eprintln!("{} Database error: {}", "Error:".style(error_style), e);
        }
        _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}
