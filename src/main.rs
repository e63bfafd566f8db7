//! NDB command-line client
//!
//! Prints search results and nutrient reports as JSON on stdout.

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ndb::cli::{Cli, Commands};
use ndb::commands;
use ndb::config::Config;

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logging goes to stderr so stdout stays parseable
    let directive = if cli.debug { "ndb=debug" } else { "ndb=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = cli.apply(Config::from_env());

    match &cli.command {
        Commands::Search { term } => {
            let client = config.client()?;
            print_json(&commands::search(&client, term)?)?;
        }
        Commands::Report { ndbnos, normalize } => {
            // Unit definitions are loaded before any request so a bad file fails fast
            let registry = if *normalize {
                Some(config.unit_registry()?)
            } else {
                None
            };
            let client = config.client()?;

            let response = commands::report(&client, ndbnos, registry.as_ref())?;
            print_json(&response)?;

            if !response.misses.is_empty() {
                eprintln!("{} of {} foods not found:", response.misses.len(), ndbnos.len());
                for miss in &response.misses {
                    eprintln!("  NDB={}: {}", miss.ndbno, miss.reason);
                }
            }
        }
        Commands::Convert { quantity, unit } => {
            let registry = config.unit_registry()?;
            print_json(&commands::convert(&registry, quantity, unit)?)?;
        }
    }

    Ok(())
}
