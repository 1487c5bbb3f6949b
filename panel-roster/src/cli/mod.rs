//! Command-line interface

pub mod commands;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::store::TableKind;

#[derive(Debug, Parser)]
#[command(
    name = "panel-roster",
    version,
    about = "Interview panel profiles and slots backed by spreadsheets"
)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the table workbooks
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },

    /// Merge a workbook into a table by Panel Email ID
    Import {
        /// Target table (profiles or slots)
        #[arg(long, default_value = "profiles")]
        table: TableKind,

        /// Workbook to merge (.xlsx)
        file: PathBuf,
    },

    /// Write a table as CSV
    Export {
        /// Table to export
        #[arg(long)]
        table: TableKind,

        /// Output CSV file
        #[arg(long, short, value_name = "FILE")]
        output: PathBuf,
    },

    /// Prompt for a password and print a credential hash for the Password column
    HashPassword,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "panel-roster",
            "export",
            "--table",
            "slots",
            "-o",
            "out.csv",
            "--data-dir",
            "/srv/panel",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/panel")));
        match cli.command {
            Commands::Export { table, output } => {
                assert_eq!(table, TableKind::Slots);
                assert_eq!(output, PathBuf::from("out.csv"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_import_defaults_to_profiles() {
        let cli = Cli::try_parse_from(["panel-roster", "import", "panel.xlsx"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Import {
                table: TableKind::Profiles,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_table() {
        assert!(Cli::try_parse_from(["panel-roster", "export", "--table", "x", "-o", "a"]).is_err());
    }
}
