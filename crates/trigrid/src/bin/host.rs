//! The trigrid host binary: seat challengers, answer every move.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use trigrid::{SessionHost, TrigridError};

/// Host tic-tac-toe games over the network.
#[derive(Parser, Debug)]
#[command(name = "trigrid-host")]
#[command(about = "Multiplexed tic-tac-toe session host", long_about = None)]
#[command(version)]
struct Args {
    /// TCP port for game sessions (0 picks an ephemeral port, which
    /// discovery announces to challengers)
    #[arg(short, long, default_value = "0")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), TrigridError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let host = SessionHost::bind(args.port).await?;
    host.run().await
}
