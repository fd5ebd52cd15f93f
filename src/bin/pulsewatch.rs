use anyhow::Result;
use clap::Parser;

use pulsewatch::clock::SystemClock;
use pulsewatch::config::Config;
use pulsewatch::monitor::{Callbacks, MonitorSession, SessionOptions, ShutdownToken};
use pulsewatch::server::pulse::PulseServer;

#[derive(Parser, Debug)]
#[command(name = "pulsewatch")]
#[command(about = "Watch one output and one input device's volume and mute state", long_about = None)]
struct Cli {
    #[arg(short, long)]
    verbose: bool,
    #[arg(long)]
    config: Option<String>,
    /// Tick period in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Sink index to watch.
    #[arg(long)]
    output: Option<u32>,
    /// Source index to watch.
    #[arg(long)]
    input: Option<u32>,
    /// Explicit server address.
    #[arg(long)]
    server: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path.into())?,
        None => Config::load().unwrap_or_else(|_| Config::default()),
    };

    if let Some(tick_ms) = cli.tick_ms {
        config.monitor.tick_ms = tick_ms;
    }
    if let Some(output) = cli.output {
        config.devices.output = output;
    }
    if let Some(input) = cli.input {
        config.devices.input = input;
    }
    if cli.server.is_some() {
        config.monitor.server = cli.server;
    }

    let period = config.period()?;

    let shutdown = ShutdownToken::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.shutdown())?;
    }

    let callbacks = Callbacks::new(
        |volume, mute| print_line("output", volume, mute),
        |volume, mute| print_line("input", volume, mute),
    );

    let server = PulseServer::new()?;
    let options = SessionOptions {
        period,
        server_address: config.monitor.server.clone(),
        output_index: config.devices.output,
        input_index: config.devices.input,
    };

    let mut session = MonitorSession::new(server, SystemClock, options, callbacks, shutdown);
    session.run()?;

    Ok(())
}

/// Raw normalized volume to the rounded percentage a status line shows.
fn print_line(label: &str, volume: f32, mute: bool) {
    let percent = (volume * 100.0).round() as u32;
    if mute {
        println!("{label} {percent}% muted");
    } else {
        println!("{label} {percent}%");
    }
}
