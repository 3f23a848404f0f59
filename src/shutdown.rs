//! Cooperative shutdown signal.
//!
//! A clonable flag plus a set of watched sockets.  [`trigger`] sets the
//! flag and shuts down every watched `TcpStream`, which unblocks any
//! read parked on it.  Loops check [`is_requested`] between steps, so a
//! shutdown is observed within one read or one poll interval.
//!
//! [`trigger`]: ShutdownSignal::trigger
//! [`is_requested`]: ShutdownSignal::is_requested

use std::io;
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

/// Granularity of [`ShutdownSignal::sleep`].
const SLEEP_SLICE: Duration = Duration::from_millis(10);

#[derive(Default)]
struct Inner {
    requested: AtomicBool,
    watched: Mutex<Vec<TcpStream>>,
}

/// Shared shutdown request.  Cheap to clone; all clones observe the same
/// flag.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::Acquire)
    }

    /// Request shutdown and interrupt every watched socket.  Safe to call
    /// repeatedly and from any thread (including the Ctrl-C handler).
    pub fn trigger(&self) {
        let first = !self.inner.requested.swap(true, Ordering::AcqRel);
        if first {
            info!("Shutdown requested");
        }
        let watched = self.inner.watched.lock().unwrap_or_else(|e| e.into_inner());
        for stream in watched.iter() {
            // Already-closed sockets report NotConnected; nothing to do.
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    /// Register a socket to be shut down on [`trigger`](Self::trigger).
    /// If shutdown was already requested the socket is shut down now.
    pub fn watch(&self, stream: &TcpStream) -> io::Result<()> {
        let handle = stream.try_clone()?;
        if self.is_requested() {
            let _ = handle.shutdown(Shutdown::Both);
        }
        self.inner
            .watched
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(handle);
        Ok(())
    }

    /// Drop every watched handle.  Called once the links are closed so the
    /// duplicated descriptors do not outlive the session; a later
    /// [`trigger`](Self::trigger) then only sets the flag.
    pub fn release(&self) -> usize {
        let mut watched = self.inner.watched.lock().unwrap_or_else(|e| e.into_inner());
        let released = watched.len();
        watched.clear();
        if released > 0 {
            debug!("Released {} watched link(s)", released);
        }
        released
    }

    /// Sleep for up to `duration`, waking early on shutdown.
    /// Returns `true` if shutdown was requested.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_requested() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }

    /// Route Ctrl-C to [`trigger`](Self::trigger).
    pub fn install_ctrlc(&self) -> Result<(), ctrlc::Error> {
        let signal = self.clone();
        ctrlc::set_handler(move || {
            debug!("Received interrupt signal");
            signal.trigger();
        })
    }
}
