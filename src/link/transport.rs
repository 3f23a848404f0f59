//! Transport abstraction — any blocking, bidirectional byte stream.
//!
//! Concrete implementations:
//! - `TcpStream` (both device links in production)
//! - scripted in-memory links (tests)
//!
//! The session is generic over `Transport`, so the cycle logic is
//! exercised without sockets.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

/// Blocking byte-oriented link to one device.
pub trait Transport {
    /// Read up to `buf.len()` bytes.  Blocks until data arrives, the peer
    /// closes (`Ok(0)`), or a configured timeout expires (`WouldBlock` /
    /// `TimedOut`).
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Deliver all of `data` or fail.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Close both directions.  Idempotent and best-effort: errors are
    /// ignored.
    fn close(&mut self);

    /// Human-readable peer description for logs.
    fn peer(&self) -> String {
        "unknown".to_string()
    }
}

impl Transport for TcpStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        Write::write_all(self, data)?;
        Write::flush(self)
    }

    fn close(&mut self) {
        let _ = self.shutdown(Shutdown::Both);
    }

    fn peer(&self) -> String {
        self.peer_addr()
            .map_or_else(|_| "disconnected".to_string(), |a| a.to_string())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_all(data)
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn peer(&self) -> String {
        (**self).peer()
    }
}

/// Whether `e` is a read timeout rather than a link failure.
pub fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
