//! shop-scraper - Stateless e-commerce search-result scraper
//!
//! Serves `POST /api/scrape` or runs a single scrape from a JSON payload.

use anyhow::Result;
use clap::{Parser, Subcommand};
use shop_scraper::commands::{ScrapeCommand, ServeCommand};
use shop_scraper::config::{Config, OutputFormat};
use shop_scraper::scrape::{InclusionPolicy, ScrapeRequest};
use shop_scraper::sites;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shop-scraper",
    version,
    about = "Stateless e-commerce search-result scraper",
    long_about = "Fetches a search-results page from a supported shop and extracts product listings \
                  (title, price, rating, image, link) as JSON."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SHOP_PROXY")]
    proxy: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "SHOP_TIMEOUT")]
    timeout: Option<u64>,

    /// Which records to return (keep-all, require-title-and-link)
    #[arg(long, global = true)]
    inclusion: Option<InclusionPolicy>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the scrape endpoint over HTTP
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Include error chains in 500 responses
        #[arg(long)]
        dev: bool,
    },

    /// Run one scrape and print `{ query, results }`
    #[command(alias = "s")]
    Scrape {
        /// JSON payload file with productName/category/site/maxResults ("-" for stdin)
        #[arg(long, conflicts_with_all = ["product", "category"])]
        input: Option<PathBuf>,

        /// Product name to search for
        product: Option<String>,

        /// Category to search in
        #[arg(long)]
        category: Option<String>,

        /// Site identifier
        #[arg(long)]
        site: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        max: Option<usize>,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// List supported sites
    Sites,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let floor = match cli.command {
        Commands::Serve { .. } => Level::INFO,
        _ => Level::WARN,
    };
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(floor.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(inclusion) = cli.inclusion {
        config.inclusion = inclusion;
    }

    match cli.command {
        Commands::Serve { host, port, dev } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            config.dev_mode |= dev;

            ServeCommand::new(config).execute().await?;
        }

        Commands::Scrape { input, product, category, site, max, format } => {
            if let Some(format) = format {
                config.format = format;
            }

            let mut request = match input {
                Some(path) => ScrapeCommand::read_payload(&path)?,
                None => ScrapeRequest { product_name: product, category, ..Default::default() },
            };
            if site.is_some() {
                request.site = site;
            }
            if max.is_some() {
                request.max_results = max;
            }

            let output = ScrapeCommand::new(config).execute(request).await?;
            println!("{}", output);
        }

        Commands::Sites => {
            println!("Supported sites:\n");
            println!("{:<10} {:<30}", "Site", "Base origin");
            println!("{:-<10} {:-<30}", "", "");

            for site in sites::all() {
                println!("{:<10} {:<30}", site.id, site.base_origin);
            }
        }
    }

    Ok(())
}
