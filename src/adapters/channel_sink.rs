//! Channel-backed event sink: decouples telemetry consumers from the
//! session loop.
//!
//! Uses an `embassy-sync` bounded channel between the session thread and
//! a dedicated sink thread.  The session never waits on a slow consumer:
//! when the channel is full the oldest queued event is discarded to make
//! room, so the consumer always catches up to the newest state.
//!
//! ```text
//! ┌──────────────┐  AppEvent  ┌───────────────┐  emit  ┌───────────┐
//! │ Session loop │──────────▶│ telemetry-sink │──────▶│ inner sink │
//! │ (ChannelSink)│  depth 16  │    thread      │        │ (log/json) │
//! └──────────────┘            └───────────────┘        └───────────┘
//! ```

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::{debug, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Events buffered between the session and the sink thread.
pub const SINK_QUEUE_DEPTH: usize = 16;

/// Shared session → sink-thread queue.
pub type EventChannel = Channel<CriticalSectionRawMutex, AppEvent, SINK_QUEUE_DEPTH>;

pub fn new_channel() -> Arc<EventChannel> {
    Arc::new(Channel::new())
}

/// Producer side, handed to the session.
pub struct ChannelSink {
    channel: Arc<EventChannel>,
    dropped: u64,
}

impl ChannelSink {
    pub fn new(channel: Arc<EventChannel>) -> Self {
        Self {
            channel,
            dropped: 0,
        }
    }

    /// Events discarded because the consumer fell behind.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: &AppEvent) {
        let event = match self.channel.try_send(event.clone()) {
            Ok(()) => return,
            Err(TrySendError::Full(event)) => event,
        };

        // Drop-oldest: make room for the newest event.
        if self.channel.try_receive().is_ok() {
            self.dropped += 1;
            if self.dropped == 1 || self.dropped % 100 == 0 {
                warn!("Sink queue full, {} event(s) dropped so far", self.dropped);
            }
        }
        if self.channel.try_send(event).is_err() {
            warn!("Sink queue still full, event lost");
        }
    }
}

/// Consumer thread draining the channel into an inner sink.  Exits after
/// forwarding [`AppEvent::Closed`].
pub struct SinkWorker<S: EventSink + Send + 'static> {
    handle: JoinHandle<S>,
}

impl<S: EventSink + Send + 'static> SinkWorker<S> {
    pub fn spawn(channel: Arc<EventChannel>, mut sink: S) -> io::Result<Self> {
        let handle = thread::Builder::new()
            .name("telemetry-sink".to_string())
            .spawn(move || {
                loop {
                    let event = futures_lite::future::block_on(channel.receive());
                    sink.emit(&event);
                    if matches!(event, AppEvent::Closed(_)) {
                        break;
                    }
                }
                debug!("Sink worker exiting");
                sink
            })?;
        Ok(Self { handle })
    }

    /// Wait for the worker to drain through `Closed` and hand back the
    /// inner sink.
    pub fn join(self) -> thread::Result<S> {
        self.handle.join()
    }
}
