pub mod campaigns;
pub mod demo;
pub mod details;
pub mod export;
pub mod ingest;
pub mod init;
pub mod status;
pub mod teams;

use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};

pub(crate) fn colorize_status(status: &str) -> ColoredString {
    match status {
        "Confirmed" => status.green(),
        "Cancelled" => status.red(),
        "OnHold" => status.yellow(),
        _ => status.normal(),
    }
}

#[derive(Parser)]
#[command(name = "maribel", about = "Campaign CSV intake CLI for marketing back offices.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Maribel: choose a data directory and initialize the database.
    Init {
        /// Path for Maribel data (default: ~/Documents/maribel)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Ingest campaign and detail files as one atomic batch.
    Ingest {
        /// Paths to delimited files; campaign files load before detail files
        files: Vec<String>,
        /// Field separator, a single ASCII character (default: from settings)
        #[arg(long)]
        separator: Option<String>,
        /// Creator name stamped on every loaded entity (default: from settings)
        #[arg(long = "created-by")]
        created_by: Option<String>,
    },
    /// List stored campaigns.
    Campaigns,
    /// List stored expenses or budgets.
    Details {
        /// Entity kind: expense or budget
        kind: String,
    },
    /// List sales teams and their campaign counts.
    Teams,
    /// Export stored entities to a delimited file.
    Export {
        /// Entity kind: campaign, expense, or budget
        entity: String,
        /// Output path (default: <data_dir>/exports/<table>-YYYY-MM-DD.csv)
        #[arg(long)]
        output: Option<String>,
        /// Field separator, a single ASCII character (default: from settings)
        #[arg(long)]
        separator: Option<String>,
    },
    /// Load sample campaign and detail files to explore Maribel.
    Demo,
    /// Show current database and summary statistics.
    Status,
}
