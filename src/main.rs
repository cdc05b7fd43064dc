use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use libris::api::LibraryApi;
use libris::config::LibrisConfig;
use libris::error::{LibrisError, Result};
use libris::store::fs::FileStore;

mod args;
mod shell;

use args::Cli;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(&cli)?;
    let config = LibrisConfig::load(&data_dir).unwrap_or_default();

    let store = FileStore::with_paths(
        data_dir.join(&config.books_file),
        data_dir.join(&config.members_file),
        data_dir.join(&config.issued_file),
    );
    let (mut api, warnings) = LibraryApi::open(store);
    shell::print_messages(&warnings);

    shell::run(&mut api)
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    let proj_dirs = ProjectDirs::from("org", "libris", "libris")
        .ok_or_else(|| LibrisError::Store("Could not determine a data directory".to_string()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    // Diagnostics go to stderr so the menus on stdout stay readable.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
