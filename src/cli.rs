//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

/// NDB - Nutrition DataBase client
///
/// Searches foods, fetches nutrient reports and normalizes nutrient units.
#[derive(Parser, Debug)]
#[command(name = "ndb")]
#[command(version)]
#[command(about = "Nutrition DataBase client")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// API key (overrides NDB_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Search endpoint (overrides NDB_SEARCH_URL)
    #[arg(long, global = true)]
    pub search_url: Option<String>,

    /// Report endpoint (overrides NDB_REPORT_URL)
    #[arg(long, global = true)]
    pub report_url: Option<String>,

    /// Unit definitions file (overrides NDB_UNITS_PATH)
    #[arg(long, global = true)]
    pub units: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search foods by name
    Search {
        /// Search term
        term: String,
    },
    /// Fetch nutrient reports for one or more foods
    Report {
        /// NDB food identifiers
        #[arg(required = true)]
        ndbnos: Vec<String>,
        /// Add quantities normalized to hectograms or deciliters
        #[arg(short, long)]
        normalize: bool,
    },
    /// Normalize a single quantity to hectograms or deciliters
    Convert {
        /// Quantity, e.g. 200
        quantity: String,
        /// Unit code, e.g. g, mg, ml
        unit: String,
    },
}

impl Cli {
    /// Apply command-line overrides on top of `config`
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(url) = &self.search_url {
            config.search_url = url.clone();
        }
        if let Some(url) = &self.report_url {
            config.report_url = url.clone();
        }
        if let Some(path) = &self.units {
            config.units_path = path.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_with_overrides() {
        let cli = Cli::parse_from([
            "ndb",
            "report",
            "01009",
            "01001",
            "--normalize",
            "--api-key",
            "k",
            "--units",
            "/tmp/units.txt",
        ]);

        match &cli.command {
            Commands::Report { ndbnos, normalize } => {
                assert_eq!(ndbnos, &vec!["01009".to_string(), "01001".to_string()]);
                assert!(*normalize);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let config = cli.apply(Config::default());
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.units_path, PathBuf::from("/tmp/units.txt"));
        assert_eq!(config.search_url, Config::default().search_url);
    }

    #[test]
    fn test_report_requires_ndbno() {
        assert!(Cli::try_parse_from(["ndb", "report"]).is_err());
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from(["ndb", "convert", "50", "ml"]);
        assert!(matches!(
            cli.command,
            Commands::Convert { ref quantity, ref unit } if quantity == "50" && unit == "ml"
        ));
    }
}
