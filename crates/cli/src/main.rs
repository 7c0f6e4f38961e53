use burrow_dns_domain::{CliOverrides, Config};
use clap::Parser;
use tracing::info;

mod bootstrap;
mod server;

#[derive(Parser)]
#[command(name = "burrow-dns")]
#[command(version)]
#[command(about = "Burrow DNS - UDP DNS forwarding resolver")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Port where the server will listen for incoming requests
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Host where the server will listen for incoming requests
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream resolver queries are forwarded to (IP:PORT)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        port: cli.port,
        bind_address: cli.bind.clone(),
        upstream: cli.upstream.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = Config::load(cli.config.as_deref(), cli_overrides)?;
    config.validate()?;

    bootstrap::init_logging(&config);

    info!("Starting Burrow DNS forwarder v{}", env!("CARGO_PKG_VERSION"));

    server::run(config).await?;

    info!("Server shutdown complete");
    Ok(())
}
