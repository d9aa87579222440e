use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "stoat-view", about = "Render chat transcripts with message grouping")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Replay a JSON transcript and print the grouped channel view
    Render {
        /// Transcript file
        file: PathBuf,
        /// Compute days and times in UTC instead of the configured zone
        #[arg(long)]
        utc: bool,
        /// Sign in with this email before replaying; the password is read
        /// from STOAT_PASSWORD
        #[arg(long, value_name = "EMAIL")]
        login: Option<String>,
        /// Send a message as the signed-in user before rendering
        #[arg(long, value_name = "TEXT")]
        send: Option<String>,
    },
}
