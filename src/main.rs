mod cli;
mod config;
mod db;
mod ledger;
mod models;
mod prayer_times;
mod premium;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use db::repository::MetaRepo;
use prayer_times::PrayerCalculator;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    match cli.command {
        // Setup wizard
        Some(Commands::Setup { reset }) => {
            handlers::handle_setup(&conn, &mut config, reset)?;
        }

        // Explicit subcommands — check setup first
        Some(cmd) => {
            ensure_setup(&conn, &mut config)?;
            match cmd {
                Commands::Checkin {
                    outcome,
                    group,
                    date,
                    amend,
                } => {
                    handlers::handle_checkin(
                        &conn,
                        &config,
                        &outcome,
                        group.as_deref(),
                        date.as_deref(),
                        amend,
                    )?;
                }
                Commands::Status => {
                    handlers::handle_status(&conn, &config)?;
                }
                Commands::Stats { week, months } => {
                    handlers::handle_stats(&conn, &config, week, months)?;
                }
                Commands::Leaderboard { group, period } => {
                    handlers::handle_leaderboard(&conn, &group, &period)?;
                }
                Commands::Group { action } => {
                    handlers::handle_group(&conn, &action)?;
                }
                Commands::Goal { action } => {
                    handlers::handle_goal(&conn, &config, &action)?;
                }
                Commands::Fast { action } => {
                    handlers::handle_fast(&conn, &config, &action)?;
                }
                Commands::Times => {
                    handlers::handle_times(&conn, &config)?;
                }
                Commands::Export { json } => {
                    handlers::handle_export(&conn, &config, json)?;
                }
                Commands::Premium { action } => {
                    handlers::handle_premium(&conn, &action)?;
                }
                Commands::Setup { .. } => unreachable!(),
            }
        }

        // No subcommand → launch TUI
        None => {
            ensure_setup(&conn, &mut config)?;
            // Ensure prayer times are cached for today+7 days
            if let Ok(calc) = PrayerCalculator::new(
                config.salah.latitude,
                config.salah.longitude,
                &config.salah.calc_method,
                &config.salah.madhab,
                config.salah.timezone_offset,
            ) {
                let _ = calc.ensure_cached(&conn, 7);
            }
            tui::app::run(conn, config)?;
        }
    }

    Ok(())
}

/// Check if setup has been done; if not, run the wizard automatically.
fn ensure_setup(conn: &Connection, config: &mut AppConfig) -> Result<()> {
    let done = MetaRepo::get(conn, "setup_done")?;
    if done.as_deref() != Some("1") {
        eprintln!("No configuration found. Running setup...");
        eprintln!();
        handlers::handle_setup(conn, config, false)?;
    }
    Ok(())
}
