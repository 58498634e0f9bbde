use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "termtube", version, about = "Search and play videos from the terminal")]
pub struct Cli {
    /// YAML config file. Without it `termtube.yaml` is read when present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Write log files as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Interactive search UI (default).
    Tui,
    /// Print the records of a search.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Print at most this many records.
        #[arg(short, long)]
        limit: Option<usize>,
        /// One JSON object per line.
        #[arg(long)]
        json: bool,
    },
    /// Print the direct stream URL of a watch page.
    Playback { url: String },
    /// Launch the configured player on a video.
    Play {
        /// Video id, watch path or full URL.
        target: String,
    },
}

impl Cli {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Tui)
    }
}
