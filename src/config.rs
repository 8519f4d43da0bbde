//! Command line configuration.

use anyhow::{Result, bail};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Input path meaning standard input.
const STDIN_PATH: &str = "-";

/// Command line configuration for ghblocks.
#[derive(Debug, Clone, Parser)]
#[command(name = "ghblocks", version, about, long_about = None)]
pub struct Config {
    /// Markdown file to convert, `-` reads standard input
    #[arg(default_value = STDIN_PATH)]
    pub input: PathBuf,

    /// JSON array of managers used to resolve @mentions
    #[arg(short, long)]
    pub managers: Option<PathBuf>,

    /// Pretty print the message JSON
    #[arg(long)]
    pub pretty: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Returns whether markdown is read from standard input.
    pub fn reads_stdin(&self) -> bool {
        self.input == Path::new(STDIN_PATH)
    }

    /// Returns default log filter directive for the verbosity level.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the input file or manager list does not exist.
    pub fn validate(&self) -> Result<()> {
        if !self.reads_stdin() && !self.input.exists() {
            bail!("Input file does not exist: {}", self.input.display());
        }

        if let Some(managers) = &self.managers
            && !managers.exists()
        {
            bail!("Manager list does not exist: {}", managers.display());
        }

        Ok(())
    }
}
