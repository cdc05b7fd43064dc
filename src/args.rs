use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(version)]
#[command(about = "A file-backed library catalog manager for the command line", long_about = None)]
pub struct Cli {
    /// Directory holding the catalog documents (defaults to the platform
    /// data directory)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
