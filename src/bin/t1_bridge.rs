use std::{
    error::Error,
    net::{SocketAddr, TcpStream},
    path::PathBuf,
    process,
    time::Duration,
};

use clap::Parser;
use log::info;
use t1_bridge::{
    FrameTransport, TransportConfig, TransportError, load_requests, parse_hex,
    protocol::{ByteStream, FrameLogger, LogLogger, hex_str},
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Serial-over-TCP endpoint the bridge is attached to
    address: SocketAddr,
    /// Blocks to send, hex encoded. Example: "00 90 00 90"
    requests: Vec<String>,
    /// Read more blocks from a file, one per line
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Time allowed to receive a whole response block
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,
    /// Pause before every request
    #[arg(long, default_value_t = 200)]
    pacing_ms: u64,
    /// Do not reset the card before the first request
    #[arg(long)]
    no_reset: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let mut requests = Vec::new();
    for request in &cli.requests {
        requests.push(parse_hex(request)?);
    }
    if let Some(path) = &cli.file {
        requests.extend(load_requests(path)?);
    }

    // Waiting for an ack has no deadline; let the user bail out.
    ctrlc::set_handler(|| {
        eprintln!("interrupted");
        process::exit(130);
    })?;

    let stream = TcpStream::connect(cli.address)?;
    stream.set_nodelay(true)?;
    info!("connected to {}", cli.address);

    let config = TransportConfig {
        timeout: Duration::from_millis(cli.timeout_ms),
        pacing: Duration::from_millis(cli.pacing_ms),
    };
    let mut transport = FrameTransport::new(stream, LogLogger, config);
    let config = transport.config();
    info!(
        "receive timeout {:?}, pacing {:?}",
        config.timeout, config.pacing
    );

    match exchange(&mut transport, &requests, !cli.no_reset) {
        Ok(responses) => {
            for response in responses {
                println!("{}", hex_str(&response));
            }
            Ok(())
        }
        Err(e) => {
            LogLogger.log_error(&format!("exchange failed: {e}"));
            Err(e.into())
        }
    }
}

fn exchange<S: ByteStream>(
    transport: &mut FrameTransport<S, LogLogger>,
    requests: &[Vec<u8>],
    reset: bool,
) -> Result<Vec<Vec<u8>>, TransportError> {
    if reset {
        transport.reset()?;
    }
    transport.run_batch(requests)
}
