mod config;
mod db;
mod models;
mod run;
mod service;
mod suggest;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SMARTBUDGET_LOG";
const DEFAULT_LOG_FILTER: &str = "smartbudget=warn";

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    config.ensure_data_dir()?;
    let suggester = suggest::Suggester::new(config.load_dictionary()?, config.suggest);
    let mut db = db::Database::open(&config.db_path)?;
    tracing::debug!(db = %config.db_path.display(), "opened database");

    match args.len() {
        0 | 1 => run::as_prompt(&db, &suggester),
        _ => run::as_cli(&args, &mut db, &suggester),
    }
}

/// Logs go to stderr so command output stays pipeable.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
