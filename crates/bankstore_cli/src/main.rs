//! Command-line entry point for the bank store walkthroughs.
//!
//! # Responsibility
//! - Build store settings from flags and environment.
//! - Run one walkthrough once, printing its results to stdout.

use bankstore_core::config::{
    DEFAULT_COLLECTION, DEFAULT_DATABASE, DEFAULT_MONGODB_URI, DEFAULT_SQLITE_PATH,
};
use bankstore_core::{
    db, default_log_level, init_logging, ClientDocument, DocumentStore, DocumentStoreConfig,
    DocumentWalkthrough, RelationalStoreConfig, RelationalWalkthrough,
};
use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "bankstore",
    version,
    about = "Demo CRUD walkthroughs over MongoDB and SQLite"
)]
struct Cli {
    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; logging is off when omitted
    #[arg(long, global = true, env = "BANKSTORE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert, query and delete sample clients in a MongoDB collection
    Documents {
        #[arg(long, env = "BANKSTORE_MONGODB_URI", default_value = DEFAULT_MONGODB_URI)]
        uri: String,

        #[arg(long, default_value = DEFAULT_DATABASE)]
        database: String,

        #[arg(long, default_value = DEFAULT_COLLECTION)]
        collection: String,

        /// Seconds to wait for a reachable server
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Create the SQLite schema, insert sample clients/accounts and query them
    Relational {
        #[arg(long, env = "BANKSTORE_DB_PATH", default_value = DEFAULT_SQLITE_PATH)]
        db_path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = log_dir.to_str().ok_or("log dir must be valid UTF-8")?;
        init_logging(level, log_dir)?;
    }

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Documents {
            uri,
            database,
            collection,
            timeout_secs,
        } => {
            let config = DocumentStoreConfig {
                uri,
                database,
                collection,
                server_selection_timeout: Duration::from_secs(timeout_secs),
                ..DocumentStoreConfig::default()
            };
            info!(
                "event=cli_run module=cli command=documents database={} collection={}",
                config.database, config.collection
            );

            let store = DocumentStore::connect_with(&config)?;
            let collection = store
                .database(&config.database)
                .collection::<ClientDocument>(&config.collection);
            DocumentWalkthrough::new(&collection).run(&mut stdout)?;
            store.close();
        }
        Command::Relational { db_path } => {
            let config = RelationalStoreConfig { path: db_path };
            info!(
                "event=cli_run module=cli command=relational path={}",
                config.path.display()
            );

            let mut conn = db::open_db(&config.path)?;
            RelationalWalkthrough::new(&mut conn).run(&mut stdout)?;
        }
    }

    Ok(())
}
