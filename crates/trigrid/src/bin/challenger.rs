//! The trigrid challenger binary: find a host, play a game.

use std::net::IpAddr;

use clap::Parser;
use tokio::net::TcpStream;
use tracing_subscriber::EnvFilter;
use trigrid::{Challenger, HumanPrompt, TrigridError};
use trigrid_discovery::DiscoveryContext;

/// Challenge a tic-tac-toe host.
#[derive(Parser, Debug)]
#[command(name = "trigrid-challenger")]
#[command(about = "Interactive tic-tac-toe challenger", long_about = None)]
#[command(version)]
struct Args {
    /// Connect directly to this host instead of discovering one
    #[arg(long, requires = "port")]
    host: Option<IpAddr>,

    /// Session port of the host given with --host
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), TrigridError> {
    // Logs to stderr so the board rendering owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rendezvous = DiscoveryContext::bind().await?;
    let stream = match (args.host, args.port) {
        (Some(host), Some(port)) => {
            match TcpStream::connect((host, port)).await {
                Ok(stream) => stream,
                Err(err) => {
                    // Fall back to finding any willing host.
                    tracing::warn!(%host, port, error = %err, "direct connect failed, discovering");
                    rendezvous.find_host().await?
                }
            }
        }
        _ => rendezvous.find_host().await?,
    };

    let winner = Challenger::new(stream, HumanPrompt::new())
        .with_rendezvous(rendezvous)
        .play()
        .await?;
    println!("Result: {winner}");
    Ok(())
}
