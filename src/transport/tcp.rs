//! Blocking TCP connection for a single request/reply exchange.
//!
//! One connection carries exactly one exchange: connect, write the whole
//! request, read until the server closes, close.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use zabbix_sender::protocol::build_frame;
//! use zabbix_sender::transport::Connection;
//!
//! fn exchange() -> zabbix_sender::Result<()> {
//!     let frame = build_frame(1, br#"{"request":"sender data","data":[]}"#);
//!     let mut conn = Connection::connect("127.0.0.1", 10051, Duration::from_secs(30))?;
//!     conn.write_all(&frame)?;
//!     let reply = conn.read_all()?;
//!     conn.close();
//!     println!("{} reply bytes", reply.len());
//!     Ok(())
//! }
//! ```

use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::{Bytes, BytesMut};

use crate::error::Result;

/// Read chunk size.
const READ_CHUNK_SIZE: usize = 8192;

/// A connected TCP stream to the server.
///
/// Closing is idempotent and also happens on drop.
pub struct Connection {
    stream: Option<TcpStream>,
    peer: String,
}

impl Connection {
    /// Resolve `host` and connect to the first address that answers within
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns a network error carrying the OS message when the name does
    /// not resolve or no address accepts the connection in time.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let peer = format!("{host}:{port}");
        tracing::debug!("Connecting to {} (timeout {:?})", peer, timeout);

        let mut last_err = None;
        for addr in (host, port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    tracing::debug!("Connected to {} via {}", peer, addr);
                    return Ok(Self {
                        stream: Some(stream),
                        peer,
                    });
                }
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| {
                io::Error::new(
                    ErrorKind::NotFound,
                    format!("no addresses resolved for {peer}"),
                )
            })
            .into())
    }

    /// Set a read deadline. `None` blocks until the server closes.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream()?.set_read_timeout(timeout)?;
        Ok(())
    }

    /// Write the whole buffer.
    pub fn write_all(&mut self, buf: &[u8]) -> Result<usize> {
        let written = write_fully(self.stream_mut()?, buf)?;
        tracing::trace!("Wrote {} bytes to {}", written, self.peer);
        Ok(written)
    }

    /// Read until the server closes the connection.
    pub fn read_all(&mut self) -> Result<Bytes> {
        let data = read_to_close(self.stream_mut()?)?;
        tracing::trace!("Read {} bytes from {}", data.len(), self.peer);
        Ok(data)
    }

    /// Close the connection. Errors are ignored; calling twice is a no-op.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            tracing::trace!("Closed connection to {}", self.peer);
        }
    }

    /// Check if the connection is still open.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Get the `host:port` this connection was opened to.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    fn stream(&self) -> io::Result<&TcpStream> {
        self.stream.as_ref().ok_or_else(closed)
    }

    fn stream_mut(&mut self) -> io::Result<&mut TcpStream> {
        self.stream.as_mut().ok_or_else(closed)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

fn closed() -> io::Error {
    io::Error::new(ErrorKind::NotConnected, "connection is closed")
}

/// Issue writes until every byte is accepted.
///
/// A write that accepts zero bytes means the peer is gone.
pub(crate) fn write_fully<W: Write>(writer: &mut W, buf: &[u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match writer.write(&buf[total..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    format!("connection accepted {} of {} bytes", total, buf.len()),
                ));
            }
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    writer.flush()?;
    Ok(total)
}

/// Read until end of stream, accumulating every chunk.
pub(crate) fn read_to_close<R: Read>(reader: &mut R) -> io::Result<Bytes> {
    let mut buffer = BytesMut::with_capacity(READ_CHUNK_SIZE);
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(buffer.freeze()),
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
