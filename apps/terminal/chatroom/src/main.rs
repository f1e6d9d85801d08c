use chatroom::error::ChatroomError;
use chatroom::logger::{default_log_dir, initialize as LoggerInitialize};
use chatroom::repl::Repl;

use chatroom_core::config::AppConfig;
use chatroom_core::session::SessionController;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;

use log::info;
use tokio::io::{BufReader, stdin, stdout};

#[tokio::main]
async fn main() -> Result<(), ChatroomError> {
    let log_dir = default_log_dir()?;

    create_dir_all(&log_dir).map_err(|e| ChatroomError::Chatroom {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir)?;

    info!("Chatroom starting");
    info!("Log directory: {}", log_dir.display());

    let config_dir = AppConfig::default_dir()?;
    let config = AppConfig::load_with_env(&config_dir)?;
    info!("Configuration loaded from {}", config_dir.display());

    let controller = SessionController::from_config(&config)?;
    controller.load_session().await?;

    let mut repl = Repl::new(controller, BufReader::new(stdin()), stdout());
    repl.run().await?;

    info!("Chatroom exiting");
    Ok(())
}
