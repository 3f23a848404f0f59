//! Ventlink — sensor/actuator TCP bridge.
//!
//! ```text
//! ┌──────────────┐  "t,co"  ┌────────────────────────────┐ "FAN;WINDOW" ┌────────────────┐
//! │ sensor (A)   │────────▶│          Session           │─────────────▶│ actuator (B)   │
//! │ :4444        │          │ codec · policy · history   │◀─────────────│ :5555          │
//! └──────────────┘          └─────────────┬──────────────┘     ack      └────────────────┘
//!                                         │ AppEvent
//!                                         ▼
//!                           ChannelSink ─▶ telemetry-sink thread ─▶ log / JSON lines
//! ```
//!
//! Startup: load config, bind both listeners, wait for both devices, then
//! run cycles until Ctrl-C.  Bind or accept failures exit non-zero.
#![deny(unused_must_use)]

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use log::{error, info};

use ventlink::adapters::channel_sink::{self, ChannelSink, SinkWorker};
use ventlink::adapters::config_file::JsonConfigStore;
use ventlink::adapters::json_sink::JsonLinesSink;
use ventlink::adapters::log_sink::LogEventSink;
use ventlink::adapters::time::MonotonicClock;
use ventlink::app::ports::EventSink;
use ventlink::config::BridgeConfig;
use ventlink::fsm::SessionFsm;
use ventlink::link::acceptor::{Acceptor, configure_stream};
use ventlink::session::Session;
use ventlink::shutdown::ShutdownSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SinkKind {
    /// One log line per event.
    Log,
    /// One JSON object per line on stdout.
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "ventlink", version, about = "Sensor/actuator TCP bridge")]
struct Args {
    /// JSON config file; missing fields and a missing file use defaults
    #[arg(short, long, default_value = "ventlink.json")]
    config: PathBuf,

    /// Address both listeners bind to
    #[arg(short, long)]
    address: Option<String>,

    /// Listening port for the sensor device (link A)
    #[arg(long)]
    port_a: Option<u16>,

    /// Listening port for the actuator device (link B)
    #[arg(long)]
    port_b: Option<u16>,

    /// Read timeout on both links in milliseconds
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// Telemetry output
    #[arg(long, value_enum, default_value_t = SinkKind::Log)]
    sink: SinkKind,
}

impl Args {
    fn apply(&self, config: &mut BridgeConfig) {
        if let Some(address) = &self.address {
            config.server_address.clone_from(address);
        }
        if let Some(port) = self.port_a {
            config.port_a = port;
        }
        if let Some(port) = self.port_b {
            config.port_b = port;
        }
        if self.read_timeout_ms.is_some() {
            config.read_timeout_ms = self.read_timeout_ms;
        }
    }

    /// Config file (or defaults), then command-line overrides, validated.
    fn resolve_config(&self) -> Result<BridgeConfig> {
        let store = JsonConfigStore::new(&self.config);
        let mut config = store
            .load_or_default()
            .with_context(|| format!("loading {}", store.path().display()))?;
        self.apply(&mut config);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Ventlink v{} starting", env!("CARGO_PKG_VERSION"));

    // ── Configuration ─────────────────────────────────────────
    let config = args.resolve_config()?;

    // ── Shutdown ──────────────────────────────────────────────
    let shutdown = ShutdownSignal::new();
    shutdown
        .install_ctrlc()
        .context("installing Ctrl-C handler")?;

    // ── Links ─────────────────────────────────────────────────
    let acceptor = Acceptor::bind(config.address_a(), config.address_b()).map_err(|e| {
        error!("Startup failed: {}", e);
        anyhow!(e)
    })?;
    let mut lifecycle = SessionFsm::new();
    let Some(links) = acceptor.accept(&shutdown).context("waiting for devices")? else {
        info!("Shutdown before both devices connected");
        lifecycle.shut_down();
        return Ok(());
    };

    let read_timeout = config.read_timeout_ms.map(Duration::from_millis);
    for stream in [&links.sensor, &links.actuator] {
        configure_stream(stream, read_timeout).context("configuring link")?;
        shutdown.watch(stream).context("registering link for shutdown")?;
    }

    // ── Telemetry ─────────────────────────────────────────────
    let channel = channel_sink::new_channel();
    let inner: Box<dyn EventSink + Send> = match args.sink {
        SinkKind::Log => Box::new(LogEventSink::new()),
        SinkKind::Json => Box::new(JsonLinesSink::new(io::stdout())),
    };
    let worker = SinkWorker::spawn(channel.clone(), inner).context("spawning sink thread")?;
    let mut sink = ChannelSink::new(channel);

    // ── Session ───────────────────────────────────────────────
    let mut session = Session::with_fsm(
        links.sensor,
        links.actuator,
        MonotonicClock::new(),
        &config,
        shutdown,
        lifecycle,
    );
    let stats = session.run(&mut sink);
    drop(session);

    if worker.join().is_err() {
        error!("Sink thread panicked");
    }
    if sink.dropped() > 0 {
        info!("{} telemetry event(s) dropped by slow sink", sink.dropped());
    }
    info!(
        "Bridge stopped after {} cycle(s), {} completed",
        stats.attempted(),
        stats.completed
    );
    Ok(())
}
