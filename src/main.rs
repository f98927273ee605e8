use std::io;

use clap::Parser;
use color_eyre::Result;
use taskpad::cli::{Cli, Commands};
use taskpad::{Config, Database, Profile};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps config, database and log apart from the real ones
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config_path = match cli.config.as_deref() {
        Some(path) => taskpad::utils::expand_path(path),
        None => Config::get_config_path(profile)?,
    };
    let config = Config::load_with_profile(profile, Some(config_path.as_path()))?;

    // Logging is best effort; the app works without a log file
    match taskpad::logger::get_log_file_path(profile) {
        Ok(log_path) => {
            if let Err(e) = taskpad::logger::init(&log_path, config.log_level_filter()) {
                eprintln!("Logging disabled: {}", e);
            }
        }
        Err(e) => eprintln!("Logging disabled: {}", e),
    }
    log::info!("Starting taskpad ({:?} profile)", profile);

    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = taskpad::tui::App::new(config, config_path, db)?;
            taskpad::tui::run_event_loop(app)?;
        }
        Commands::List { json } => {
            taskpad::cli::handle_list(json, &db, &mut io::stdout().lock())?;
        }
        Commands::AddTask {
            name,
            description,
            deadline,
            emoji,
            color,
            categories,
        } => {
            taskpad::cli::handle_add_task(name, description, deadline, emoji, color, categories, &db)?;
        }
        Commands::AddCategory { name, emoji, color } => {
            taskpad::cli::handle_add_category(name, emoji, color, &db)?;
        }
    }

    Ok(())
}
