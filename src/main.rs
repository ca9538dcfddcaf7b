use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cimille_uci::UciEngine;

fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    info!("cimille starting");
    UciEngine::new().run()?;
    Ok(())
}
