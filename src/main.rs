use anyhow::{Context, Result};
use ghblocks::{Config, MarkdownConverter, Managers, Message, to_json, to_json_pretty};
use std::io::{self, Read, Write};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_level());

    config.validate()?;

    let source = read_input(&config)?;
    let managers = match &config.managers {
        Some(path) => Managers::from_path(path)?,
        None => Managers::new(),
    };
    tracing::debug!(managers = managers.len(), "Loaded manager directory");

    let blocks = MarkdownConverter::with_directory(&managers).convert(&source);
    let message = Message::new(blocks);

    let json = if config.pretty {
        to_json_pretty(&message)?
    } else {
        to_json(&message)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write output")?;

    Ok(())
}

/// Installs stderr logging, `RUST_LOG` overrides the verbosity flag.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Reads markdown bytes from the configured file or standard input.
fn read_input(config: &Config) -> Result<Vec<u8>> {
    if config.reads_stdin() {
        let mut source = Vec::new();
        io::stdin()
            .read_to_end(&mut source)
            .context("Failed to read markdown from stdin")?;
        return Ok(source);
    }

    std::fs::read(&config.input)
        .with_context(|| format!("Failed to read markdown file: {}", config.input.display()))
}
