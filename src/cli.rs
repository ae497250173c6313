use std::path::PathBuf;

use clap::Parser;

/// Hotel Dashboard – interactive report over a hotel bookings table
///
/// Examples:
///   hotel-dashboard hotels.csv
///   hotel-dashboard bookings.tsv --top 15
///   hotel-dashboard --config ./dashboard.toml -v
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Bookings file (.csv, .tsv, .parquet or .json)
    ///
    /// Falls back to `[data] path` from the config file.
    #[arg(value_name = "FILE", env = "HOTEL_DASHBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for hotel-dashboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Field delimiter for text files (single character, `\t` for tab)
    #[arg(short, long, value_name = "CHAR")]
    pub delimiter: Option<String>,

    /// Number of countries in the ADR bar chart
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Default log filter; `RUST_LOG` still wins.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_and_flags() {
        let args = Args::try_parse_from(["hotel-dashboard", "hotels.csv", "--top", "5", "-v"])
            .unwrap();
        assert_eq!(args.data, Some(PathBuf::from("hotels.csv")));
        assert_eq!(args.top, Some(5));
        assert!(args.verbose);
        assert_eq!(args.log_filter(), "debug");
    }

    #[test]
    fn test_defaults() {
        let args = Args::default();
        assert_eq!(args.log_filter(), "info");
        assert!(args.config.is_none());
    }
}
