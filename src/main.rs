//! `daemon`: the graindb server binary (§6 CLI surface).
//!
//! Replaces the teacher's `structopt`-based CLI (`src/_teacher_ref/bin_rdms/main.rs`)
//! with `clap` v4 derive, matching this crate's `Cargo.toml`.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use graindb::config::DbConfig;
use graindb::db::Database;
use graindb::dispatch::transport::TcpFrontend;
use graindb::dispatch::Dispatcher;

/// graindb search daemon.
#[derive(Parser)]
#[command(name = "daemon", version)]
struct Opt {
    /// Path to the database's base directory.
    database_file: String,

    /// Bind address for the request/reply transport.
    #[arg(default_value_t = graindb::config::DEFAULT_BIND.to_string())]
    bind_address: String,

    /// Number of worker threads.
    #[arg(long, default_value_t = graindb::config::DEFAULT_WORKERS)]
    workers: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let config = DbConfig::new().set_workers(opt.workers).set_bind(opt.bind_address.clone());
    let db = match Database::open(opt.database_file.as_str(), config) {
        Ok(db) => Arc::new(db),
        Err(err) => {
            eprintln!("failed to open database at {}: {}", opt.database_file, err);
            return ExitCode::FAILURE;
        }
    };

    let frontend = match TcpFrontend::bind(&opt.bind_address) {
        Ok(frontend) => Arc::new(frontend),
        Err(err) => {
            eprintln!("failed to bind {}: {}", opt.bind_address, err);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(bind = %opt.bind_address, workers = opt.workers, "graindb daemon listening");
    let dispatcher = Dispatcher::run(frontend, db, opt.workers);
    dispatcher.join();
    ExitCode::SUCCESS
}
