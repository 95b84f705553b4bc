//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browse BOOTH listings, inspect products and download their files.
#[derive(Parser, Debug)]
#[command(name = "booth-client")]
#[command(author, version, about)]
pub struct Args {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as pretty JSON instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List products from the item listing
    List {
        /// Page number, starting at 1
        #[arg(short, long)]
        page: Option<u32>,

        /// Sort order: New, Popularity or Loves
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Search products by keyword
    Search {
        term: String,

        /// Sort order: New, Popularity or Loves
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show one product's details
    Get { id: String },

    /// Download a product's files
    Download {
        id: String,

        /// Target directory (defaults to `download.default_directory`/<id>)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

impl Args {
    /// Log level implied by `-v` flags, if any
    pub fn verbosity_level(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_list_with_options() {
        let args =
            Args::try_parse_from(["booth-client", "list", "--page", "3", "--filter", "Loves"]).unwrap();
        assert_eq!(
            args.command,
            Command::List {
                page: Some(3),
                filter: Some("Loves".to_string())
            }
        );
        assert!(!args.json);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["booth-client", "get", "123", "--json", "-vv"]).unwrap();
        assert!(args.json);
        assert_eq!(args.verbosity_level(), Some("trace"));
        assert_eq!(args.command, Command::Get { id: "123".to_string() });
    }

    #[test]
    fn test_cli_download_out_dir() {
        let args = Args::try_parse_from(["booth-client", "download", "9", "-o", "/tmp/x"]).unwrap();
        assert_eq!(
            args.command,
            Command::Download {
                id: "9".to_string(),
                out: Some(PathBuf::from("/tmp/x"))
            }
        );
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Args::try_parse_from(["booth-client"]).is_err());
    }
}
