// Headless sketchpad host: reads one command per line from stdin and prints
// replies to stdout. Logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sketch_history::{FileStore, KeyValueStore, MemoryStore};
use sketch_ui::{Command, PadConfig, Reply, Sketchpad, CONFIG_ENV};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sketchpad", about = "Headless sketchpad driven by line commands on stdin")]
struct Args {
    /// JSON config file; defaults apply when omitted.
    #[arg(env = CONFIG_ENV)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = match args.config {
        Some(path) => PadConfig::load(&path)?,
        None => {
            info!("no config given, using defaults");
            PadConfig::default()
        }
    };

    match &config.storage.dir {
        Some(dir) => {
            let store = FileStore::open(dir)
                .with_context(|| format!("open storage dir: {}", dir.display()))?;
            run(&config, store)
        }
        None => {
            let store = config
                .storage
                .quota_bytes
                .map_or_else(MemoryStore::new, MemoryStore::with_quota);
            run(&config, store)
        }
    }
}

fn run<S: KeyValueStore>(config: &PadConfig, store: S) -> anyhow::Result<()> {
    let mut pad = Sketchpad::open(config, store).context("open sketchpad")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("read command")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => match pad.apply(command) {
                Reply::Ack => {}
                reply => writeln!(stdout, "{reply}").context("write reply")?,
            },
            Err(e) => warn!(line, error = %e, "command rejected"),
        }
    }

    if !pad.is_durable() {
        warn!("session ended with unsaved changes");
    }
    info!(black_pixels = pad.black_pixel_count(), "sketchpad closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_config_path_is_positional() {
        let args = Args::try_parse_from(["sketchpad", "pad.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("pad.json")));

        assert!(Args::try_parse_from(["sketchpad", "a.json", "b.json"]).is_err());
    }
}
