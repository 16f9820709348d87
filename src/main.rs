mod chatbot;
mod config;
mod controller;
mod datastore;
mod log;
mod model;
mod summary;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use dotenv::dotenv;
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing::{event, Level};
use tracing_subscriber::EnvFilter;

use chatbot::ChatbotGateway;
use config::Config;
use controller::TodoController;
use datastore::MemoryTodoStore;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::load().context("loading config")?;
    let env_filter = EnvFilter::try_from_env("TODOBOT_LOG");
    log::setup(env_filter, &config.log)?;

    event!(Level::INFO, "Starting todobot: {}", env!("FULL_VERSION"));
    event!(
        Level::INFO,
        "Chatbot api key loaded: {}",
        config.chatbot.api_key.is_some()
    );

    let term = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGTERM, Arc::clone(&term))?;
    signal_hook::flag::register(SIGINT, Arc::clone(&term))?;

    let addr = config.listen.socket_addr()?;
    let controller = TodoController::start(
        MemoryTodoStore::new(),
        ChatbotGateway::new(&config.chatbot),
        addr,
    )?;

    while !term.load(Ordering::Acquire) {
        std::thread::park_timeout(Duration::from_millis(200));
    }
    event!(Level::INFO, "Shutting down todobot");
    controller.stop();
    Ok(())
}

#[cfg(all(test, feature = "e2e"))]
mod e2e_tests;
