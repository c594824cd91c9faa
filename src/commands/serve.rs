//! Serve command implementation.

use crate::config::Config;
use crate::server;
use anyhow::Result;
use tracing::info;

/// Runs the HTTP endpoint.
pub struct ServeCommand {
    config: Config,
}

impl ServeCommand {
    /// Creates a new serve command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Serves requests until the process is stopped.
    pub async fn execute(&self) -> Result<()> {
        info!("Starting scrape server (inclusion policy: {})", self.config.inclusion);
        server::serve(&self.config).await
    }
}
