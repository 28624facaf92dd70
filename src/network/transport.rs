//! Transport
//!
//! The byte stream a session runs over.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

/// Bidirectional, ordered byte stream
///
/// Anything providing these operations can carry a session, so an
/// encrypted stream slots in without touching framing or session code.
pub trait Transport: Read + Write + Send + Sized {
    /// Second handle on the same stream (used by `Session::into_split`)
    fn try_clone(&self) -> io::Result<Self>;

    /// Close both directions
    fn shutdown(&self) -> io::Result<()>;

    /// Peer description for logging
    fn peer_label(&self) -> String {
        "unknown".to_string()
    }
}

impl Transport for TcpStream {
    fn try_clone(&self) -> io::Result<Self> {
        TcpStream::try_clone(self)
    }

    fn shutdown(&self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }

    fn peer_label(&self) -> String {
        self.peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
