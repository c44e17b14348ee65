use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bold-todo")]
#[command(about = "Highlight TODO/HACK markers inside source comments")]
#[command(version)]
pub struct Cli {
    /// Disable colored and bold output
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every marker found in comments under a path
    Scan {
        /// Path to scan (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Print a file with its markers in bold
    Show {
        /// File to print
        file: PathBuf,
    },
}
