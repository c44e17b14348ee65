mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Scan { path } => {
            commands::scan::run(&path)?;
        }
        Command::Show { file } => {
            commands::show::run(&file)?;
        }
    }

    Ok(())
}
