mod builder;
mod cli;
mod coerce;
mod db;
mod error;
mod export;
mod fmt;
mod models;
mod parser;
mod pipeline;
mod seeder;
mod sequence;
mod settings;
mod synth;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Ingest { files, separator, created_by } => {
            cli::ingest::run(&files, separator.as_deref(), created_by.as_deref())
        }
        Commands::Campaigns => cli::campaigns::run(),
        Commands::Details { kind } => cli::details::run(&kind),
        Commands::Teams => cli::teams::run(),
        Commands::Export { entity, output, separator } => {
            cli::export::run(&entity, output, separator.as_deref())
        }
        Commands::Demo => cli::demo::run(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
