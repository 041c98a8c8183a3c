//! # Dada Relay
//!
//! Public relay server for the dada printer installation.
//!
//! ## Usage
//!
//! ```bash
//! # Configuration comes from the environment (or a .env file):
//! #   RELAY_URL       - printer gateway endpoint
//! #   SECRET_KEY      - shared secret for the gateway
//! #   GEMINI_API_KEY  - art generation API key
//! #   ALLOWED_ORIGIN  - front-end origin allowed by CORS
//! #   PORT            - listen port (default 3001)
//! dada-relay
//!
//! # Override the listen address on the command line
//! dada-relay --listen 127.0.0.1:8080
//! ```

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use dada_relay::{Config, DadaError, server};

/// Dada Relay - public print relay server
#[derive(Parser, Debug)]
#[command(name = "dada-relay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Listen address, overriding the PORT environment variable
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DadaError> {
    // .env is a development convenience; absence is fine in production
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }

    server::serve(config).await
}
