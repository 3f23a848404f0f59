//! End-to-end scenarios over loopback TCP.
//!
//! Both listeners bind port 0; device threads connect as plain clients.
//! A watchdog triggers shutdown after a few seconds so a broken test
//! fails instead of hanging.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::{Duration, Instant};

use crate::mock_link::RecordingSink;

use ventlink::adapters::time::MonotonicClock;
use ventlink::app::events::AppEvent;
use ventlink::app::ports::EventSink;
use ventlink::config::BridgeConfig;
use ventlink::diagnostics::CycleStage;
use ventlink::link::acceptor::{AcceptedLinks, Acceptor, configure_stream};
use ventlink::session::Session;
use ventlink::shutdown::ShutdownSignal;

const WATCHDOG: Duration = Duration::from_secs(5);

fn arm_watchdog(shutdown: &ShutdownSignal) {
    let signal = shutdown.clone();
    thread::spawn(move || {
        thread::sleep(WATCHDOG);
        signal.trigger();
    });
}

fn watch_links(links: &AcceptedLinks, shutdown: &ShutdownSignal) {
    for stream in [&links.sensor, &links.actuator] {
        configure_stream(stream, None).unwrap();
        shutdown.watch(stream).unwrap();
    }
}

/// Stops the session after a given number of completed cycles.
struct StopAfterUpdates {
    inner: RecordingSink,
    remaining: usize,
    shutdown: ShutdownSignal,
}

impl EventSink for StopAfterUpdates {
    fn emit(&mut self, event: &AppEvent) {
        if matches!(event, AppEvent::Update(_)) {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.shutdown.trigger();
            }
        }
        self.inner.emit(event);
    }
}

#[test]
fn bridges_readings_to_commands_over_tcp() {
    let acceptor = Acceptor::bind("127.0.0.1:0", "127.0.0.1:0").unwrap();
    let (addr_a, addr_b) = (acceptor.sensor_addr(), acceptor.actuator_addr());
    let shutdown = ShutdownSignal::new();
    arm_watchdog(&shutdown);

    let actuator = thread::spawn(move || {
        let mut stream = TcpStream::connect(addr_b).unwrap();
        let mut buf = [0u8; 64];
        let mut received = Vec::new();
        for _ in 0..2 {
            let n = stream.read(&mut buf).unwrap();
            received.push(String::from_utf8_lossy(&buf[..n]).into_owned());
            stream.write_all(b"ack").unwrap();
        }
        received
    });

    let sensor = thread::spawn(move || {
        let mut stream = TcpStream::connect(addr_a).unwrap();
        // Spaced out so each payload arrives as its own read.
        for payload in ["40.0,5.0", "abc", "30.0,5.0"] {
            stream.write_all(payload.as_bytes()).unwrap();
            thread::sleep(Duration::from_millis(100));
        }
        stream
    });

    let links = acceptor.accept(&shutdown).unwrap().expect("both devices");
    watch_links(&links, &shutdown);

    let mut session = Session::new(
        links.sensor,
        links.actuator,
        MonotonicClock::new(),
        &BridgeConfig::default(),
        shutdown.clone(),
    );
    let mut sink = StopAfterUpdates {
        inner: RecordingSink::default(),
        remaining: 2,
        shutdown,
    };
    let stats = session.run(&mut sink);

    assert_eq!(actuator.join().unwrap(), vec!["ON;CLOSE", "OFF;OPEN"]);
    let _sensor_stream = sensor.join().unwrap();

    assert_eq!(stats.completed, 2);
    assert_eq!(stats.decode_failures, 1);

    let updates = sink.inner.updates();
    assert_eq!(updates[0].sample.fan_state, 1);
    assert_eq!(updates[0].sample.window_state, 0);
    assert_eq!(updates[1].sample.fan_state, 0);
    assert_eq!(updates[1].sample.window_state, 1);
    assert_eq!(updates[1].history.len(), 2);
    assert!(updates[0].sample.timestamp <= updates[1].sample.timestamp);
}

#[test]
fn shutdown_unblocks_pending_read_and_closes_links() {
    let acceptor = Acceptor::bind("127.0.0.1:0", "127.0.0.1:0").unwrap();
    let (addr_a, addr_b) = (acceptor.sensor_addr(), acceptor.actuator_addr());
    let shutdown = ShutdownSignal::new();
    arm_watchdog(&shutdown);

    let mut sensor_client = TcpStream::connect(addr_a).unwrap();
    let mut actuator_client = TcpStream::connect(addr_b).unwrap();
    let links = acceptor.accept(&shutdown).unwrap().expect("both devices");
    watch_links(&links, &shutdown);

    let signal = shutdown.clone();
    let worker = thread::spawn(move || {
        let mut session = Session::new(
            links.sensor,
            links.actuator,
            MonotonicClock::new(),
            &BridgeConfig::default(),
            signal,
        );
        let mut sink = RecordingSink::default();
        let stats = session.run(&mut sink);
        (stats, sink)
    });

    // The sensor never sends: the session is parked in a blocking read.
    thread::sleep(Duration::from_millis(100));
    let started = Instant::now();
    shutdown.trigger();
    let (stats, sink) = worker.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(stats.attempted(), 0, "an interrupted read is not a failure");
    assert_eq!(shutdown.release(), 0, "closing the session releases its links");
    assert!(matches!(sink.events.last(), Some(AppEvent::Closed(_))));

    // Both devices observe the close.
    let mut buf = [0u8; 8];
    assert_eq!(sensor_client.read(&mut buf).unwrap_or(0), 0);
    assert_eq!(actuator_client.read(&mut buf).unwrap_or(0), 0);
}

#[test]
fn shutdown_during_ack_wait_completes_no_cycle() {
    let acceptor = Acceptor::bind("127.0.0.1:0", "127.0.0.1:0").unwrap();
    let (addr_a, addr_b) = (acceptor.sensor_addr(), acceptor.actuator_addr());
    let shutdown = ShutdownSignal::new();
    arm_watchdog(&shutdown);

    let mut sensor_client = TcpStream::connect(addr_a).unwrap();
    let mut actuator_client = TcpStream::connect(addr_b).unwrap();
    let links = acceptor.accept(&shutdown).unwrap().expect("both devices");
    watch_links(&links, &shutdown);

    let signal = shutdown.clone();
    let worker = thread::spawn(move || {
        let mut session = Session::new(
            links.sensor,
            links.actuator,
            MonotonicClock::new(),
            &BridgeConfig::default(),
            signal,
        );
        let mut sink = RecordingSink::default();
        let stats = session.run(&mut sink);
        (stats, sink)
    });

    sensor_client.write_all(b"40.0,5.0").unwrap();
    // The actuator takes the command but never acknowledges it.
    let mut buf = [0u8; 16];
    let n = actuator_client.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"ON;CLOSE");
    thread::sleep(Duration::from_millis(50));

    shutdown.trigger();
    let (stats, sink) = worker.join().unwrap();

    assert_eq!(stats.completed, 0, "interrupted cycle must not count as completed");
    assert_eq!(stats.failures(), 0);
    assert!(sink.updates().is_empty());
    assert!(matches!(sink.events.last(), Some(AppEvent::Closed(_))));
}

#[test]
fn sensor_disconnect_is_reported_without_ending_session() {
    let acceptor = Acceptor::bind("127.0.0.1:0", "127.0.0.1:0").unwrap();
    let (addr_a, addr_b) = (acceptor.sensor_addr(), acceptor.actuator_addr());
    let shutdown = ShutdownSignal::new();
    arm_watchdog(&shutdown);

    let sensor_client = TcpStream::connect(addr_a).unwrap();
    let _actuator_client = TcpStream::connect(addr_b).unwrap();
    let links = acceptor.accept(&shutdown).unwrap().expect("both devices");
    watch_links(&links, &shutdown);
    drop(sensor_client);

    let config = BridgeConfig {
        failure_backoff_ms: 10,
        ..BridgeConfig::default()
    };
    let signal = shutdown.clone();
    let worker = thread::spawn(move || {
        let mut session = Session::new(
            links.sensor,
            links.actuator,
            MonotonicClock::new(),
            &config,
            signal,
        );
        let mut sink = RecordingSink::default();
        let stats = session.run(&mut sink);
        (stats, sink)
    });

    thread::sleep(Duration::from_millis(200));
    shutdown.trigger();
    let (stats, sink) = worker.join().unwrap();

    assert!(stats.receive_failures >= 1);
    assert_eq!(stats.completed, 0);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::CycleFailed {
            stage: CycleStage::Receive,
            ..
        }
    )));
}
