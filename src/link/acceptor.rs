//! Connection acceptor — one listener per link, one connection per listener.
//!
//! Both listeners are polled non-blocking so the devices may connect in
//! either order and a shutdown request is noticed while waiting.  As soon
//! as a listener has produced its connection it is dropped; later callers
//! on that port are refused.
//!
//! `std::net::TcpListener` does not expose the listen backlog, so the
//! kernel default applies until the first connection is taken.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::error::{Error, Link, Result};
use crate::shutdown::ShutdownSignal;

/// Poll period while neither listener has a pending connection.
const ACCEPT_POLL: Duration = Duration::from_millis(10);

/// The two established device connections.
#[derive(Debug)]
pub struct AcceptedLinks {
    pub sensor: TcpStream,
    pub sensor_peer: SocketAddr,
    pub actuator: TcpStream,
    pub actuator_peer: SocketAddr,
}

/// A listener waiting for its single connection.
struct Endpoint {
    link: Link,
    local: SocketAddr,
    listener: Option<TcpListener>,
    accepted: Option<(TcpStream, SocketAddr)>,
}

impl Endpoint {
    fn bind(link: Link, addr: impl ToSocketAddrs) -> Result<Self> {
        let listener = TcpListener::bind(addr).map_err(|e| Error::Bind(link, e))?;
        listener
            .set_nonblocking(true)
            .map_err(|e| Error::Bind(link, e))?;
        let local = listener.local_addr().map_err(|e| Error::Bind(link, e))?;
        Ok(Self {
            link,
            local,
            listener: Some(listener),
            accepted: None,
        })
    }

    /// Try once to take the pending connection.  Returns `true` once this
    /// endpoint has its connection.
    fn poll(&mut self) -> Result<bool> {
        let Some(listener) = &self.listener else {
            return Ok(true);
        };
        match listener.accept() {
            Ok((stream, peer)) => {
                stream
                    .set_nonblocking(false)
                    .map_err(|e| Error::Accept(self.link, e))?;
                info!("{} connected from {}", self.link, peer);
                self.accepted = Some((stream, peer));
                // Single connection per endpoint: stop listening.
                self.listener = None;
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
            Err(e) => Err(Error::Accept(self.link, e)),
        }
    }
}

/// Binds both link endpoints and waits for one device on each.
pub struct Acceptor {
    sensor: Endpoint,
    actuator: Endpoint,
}

impl Acceptor {
    /// Bind both endpoints.  Fails with [`Error::Bind`] if either address
    /// is unavailable (e.g. already in use).
    pub fn bind(sensor_addr: impl ToSocketAddrs, actuator_addr: impl ToSocketAddrs) -> Result<Self> {
        let sensor = Endpoint::bind(Link::Sensor, sensor_addr)?;
        let actuator = Endpoint::bind(Link::Actuator, actuator_addr)?;
        Ok(Self { sensor, actuator })
    }

    /// Actual bound address of link A (useful after binding port 0).
    pub fn sensor_addr(&self) -> SocketAddr {
        self.sensor.local
    }

    /// Actual bound address of link B.
    pub fn actuator_addr(&self) -> SocketAddr {
        self.actuator.local
    }

    /// Block until both devices have connected.
    ///
    /// Returns `Ok(None)` if `shutdown` is requested first; any connection
    /// already taken is closed by drop.
    pub fn accept(mut self, shutdown: &ShutdownSignal) -> Result<Option<AcceptedLinks>> {
        info!("Waiting for {} on {}...", self.sensor.link, self.sensor.local);
        info!("Waiting for {} on {}...", self.actuator.link, self.actuator.local);

        loop {
            if shutdown.is_requested() {
                warn!("Shutdown requested before both links connected");
                return Ok(None);
            }

            let sensor_ready = self.sensor.poll()?;
            let actuator_ready = self.actuator.poll()?;
            if sensor_ready && actuator_ready {
                break;
            }
            thread::sleep(ACCEPT_POLL);
        }

        match (self.sensor.accepted.take(), self.actuator.accepted.take()) {
            (Some((sensor, sensor_peer)), Some((actuator, actuator_peer))) => {
                Ok(Some(AcceptedLinks {
                    sensor,
                    sensor_peer,
                    actuator,
                    actuator_peer,
                }))
            }
            // Both endpoints reported ready, so both hold a connection.
            _ => Err(Error::Accept(
                Link::Sensor,
                io::Error::other("acceptor lost an accepted connection"),
            )),
        }
    }
}

/// Apply the configured read timeout (`None` blocks indefinitely).
pub fn configure_stream(stream: &TcpStream, read_timeout: Option<Duration>) -> io::Result<()> {
    stream.set_read_timeout(read_timeout)?;
    stream.set_nodelay(true)
}
