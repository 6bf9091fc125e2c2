//! Sender builder and submission session.
//!
//! The [`SenderBuilder`] provides a fluent API for the server address and
//! protocol settings. The [`Sender`] owns the queue of pending data points
//! and the snapshot of the last accepted reply. Each [`Sender::send`]:
//! 1. Encode the queue into a frame
//! 2. Connect to the server
//! 3. Write the frame, read until the server closes
//! 4. Close the connection
//! 5. Parse the reply and update queue and snapshot
//!
//! # Example
//!
//! ```no_run
//! use zabbix_sender::Sender;
//!
//! fn main() -> Result<(), zabbix_sender::SenderError> {
//!     let mut sender = Sender::builder().server("zabbix.example.com").build();
//!     sender
//!         .add_data("web01", "app.requests", 1520)
//!         .add_data_at("web01", "app.status", "ok", 1_700_000_000);
//!
//!     if sender.send()?.is_success() {
//!         println!("processed {:?}", sender.last_processed());
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use bytes::Bytes;
use serde_json::{Map, Value as JsonValue};

use crate::config::AgentConfig;
use crate::error::Result;
use crate::payload::{DataPoint, Payload, Value};
use crate::protocol::{
    encode_request, parse_response, ProcessingInfo, Response, ResponseStatus,
    DEFAULT_PROTOCOL_VERSION,
};
use crate::transport::Connection;

/// Default server host.
pub const DEFAULT_SERVER: &str = "localhost";

/// Default trapper port.
pub const DEFAULT_PORT: u16 = 10051;

/// Default connect timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection and framing settings shared by builder and sender.
#[derive(Debug, Clone)]
struct Settings {
    server: String,
    port: u16,
    timeout: Duration,
    read_timeout: Option<Duration>,
    protocol_version: u8,
}

impl Settings {
    /// Zero is ignored.
    fn set_timeout(&mut self, timeout: Duration) {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
    }

    /// `Some(0)` is ignored.
    fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        match timeout {
            Some(t) if t.is_zero() => {}
            other => self.read_timeout = other,
        }
    }

    /// Zero is ignored.
    fn set_protocol_version(&mut self, version: u8) {
        if version > 0 {
            self.protocol_version = version;
        }
    }

    fn import_agent_config(&mut self, config: &AgentConfig) {
        if let Some(server) = config.server() {
            self.server = server.to_string();
        }
        if let Some(port) = config.server_port() {
            self.port = port;
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            read_timeout: None,
            protocol_version: DEFAULT_PROTOCOL_VERSION,
        }
    }
}

/// Builder for configuring and creating a [`Sender`].
#[derive(Debug, Clone, Default)]
pub struct SenderBuilder {
    settings: Settings,
}

impl SenderBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server host name or address.
    ///
    /// Default: `localhost`
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.settings.server = server.into();
        self
    }

    /// Set the server port.
    ///
    /// Default: 10051
    pub fn port(mut self, port: u16) -> Self {
        self.settings.port = port;
        self
    }

    /// Set the connect timeout. Zero is ignored.
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.set_timeout(timeout);
        self
    }

    /// Set a deadline for reading the reply. Zero is ignored.
    ///
    /// Default: none, the read blocks until the server closes the
    /// connection.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.settings.set_read_timeout(Some(timeout));
        self
    }

    /// Set the protocol version byte. Zero is ignored.
    ///
    /// Default: 1
    pub fn protocol_version(mut self, version: u8) -> Self {
        self.settings.set_protocol_version(version);
        self
    }

    /// Take server and port from an agent configuration, where present.
    pub fn agent_config(mut self, config: &AgentConfig) -> Self {
        self.settings.import_agent_config(config);
        self
    }

    /// Build the sender with an empty queue.
    pub fn build(self) -> Sender {
        Sender {
            settings: self.settings,
            payload: Payload::new(),
            last: None,
        }
    }
}

/// A submission session against one server.
///
/// Not synchronized: share it across threads only behind your own lock, or
/// give each thread its own sender.
#[derive(Debug, Clone)]
pub struct Sender {
    settings: Settings,
    /// Data points waiting for the next successful send.
    payload: Payload,
    /// Last reply with status `success`.
    last: Option<Response>,
}

impl Sender {
    /// Create a sender for `server:port` with default settings.
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        SenderBuilder::new().server(server).port(port).build()
    }

    /// Create a new sender builder.
    pub fn builder() -> SenderBuilder {
        SenderBuilder::new()
    }

    // ------------------------------------------------------------------
    // Queue
    // ------------------------------------------------------------------

    /// Queue a data point without a timestamp.
    ///
    /// Values are not validated; the server decides what it accepts.
    pub fn add_data(
        &mut self,
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.push(DataPoint::new(host, key, value))
    }

    /// Queue a data point with a timestamp (epoch seconds).
    pub fn add_data_at(
        &mut self,
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
        clock: i64,
    ) -> &mut Self {
        self.push(DataPoint::new(host, key, value).with_clock(clock))
    }

    /// Queue a prepared data point.
    pub fn push(&mut self, point: DataPoint) -> &mut Self {
        self.payload.push(point);
        self
    }

    /// Drop every queued data point.
    pub fn reset_queue(&mut self) -> &mut Self {
        self.payload.clear();
        self
    }

    /// Queued data points in insertion order.
    pub fn data(&self) -> &[DataPoint] {
        self.payload.data()
    }

    /// Number of queued data points.
    pub fn pending_len(&self) -> usize {
        self.payload.len()
    }

    // ------------------------------------------------------------------
    // Exchange
    // ------------------------------------------------------------------

    /// Submit the queue in one request.
    ///
    /// An empty queue is sent as is. On [`ResponseStatus::Success`] the
    /// queue is cleared and the reply becomes the last-response snapshot.
    /// On [`ResponseStatus::Failed`] the queue is kept and the snapshot is
    /// cleared.
    ///
    /// # Errors
    ///
    /// - [`SenderError::Network`](crate::SenderError::Network) if connect,
    ///   write or read fails. Queue and snapshot are left untouched.
    /// - [`SenderError::Protocol`](crate::SenderError::Protocol) if the
    ///   reply has a bad header or an undecodable body. The queue is kept
    ///   and the snapshot is cleared.
    pub fn send(&mut self) -> Result<ResponseStatus> {
        let Settings {
            server,
            port,
            timeout,
            read_timeout,
            protocol_version,
        } = &self.settings;

        let frame = encode_request(&self.payload, *protocol_version)?;
        tracing::debug!(
            "Sending {} data points ({} bytes) to {}:{}",
            self.payload.len(),
            frame.len(),
            server,
            port
        );

        let mut conn = Connection::connect(server, *port, *timeout)?;
        let exchanged = exchange(&mut conn, &frame, *read_timeout);
        conn.close();
        let raw = exchanged?;

        let response = match parse_response(raw) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Undecodable reply from {}:{}: {}", server, port, e);
                self.clear_last_response();
                return Err(e);
            }
        };

        let status = response.status;
        match status {
            ResponseStatus::Success => {
                tracing::debug!("Server accepted batch: {:?}", response.info);
                self.payload.clear();
                self.last = Some(response);
            }
            ResponseStatus::Failed => {
                tracing::warn!("Server rejected batch: {:?}", response.info);
                self.clear_last_response();
            }
        }
        Ok(status)
    }

    fn clear_last_response(&mut self) {
        if self.last.take().is_some() {
            tracing::trace!("Cleared last response snapshot");
        }
    }

    // ------------------------------------------------------------------
    // Last response
    // ------------------------------------------------------------------

    /// The last accepted reply, if any.
    pub fn last_response(&self) -> Option<&Response> {
        self.last.as_ref()
    }

    /// Status of the last accepted reply.
    pub fn last_status(&self) -> Option<ResponseStatus> {
        self.last.as_ref().map(|r| r.status)
    }

    /// Full decoded body of the last accepted reply.
    pub fn last_response_body(&self) -> Option<&Map<String, JsonValue>> {
        self.last.as_ref().map(|r| &r.body)
    }

    /// Raw bytes of the last accepted reply.
    pub fn last_raw_response(&self) -> Option<&[u8]> {
        self.last.as_ref().map(|r| &r.raw[..])
    }

    /// The server's `info` text from the last accepted reply.
    pub fn last_info(&self) -> Option<&str> {
        self.last.as_ref()?.info.as_deref()
    }

    /// Items the server accepted in the last exchange.
    pub fn last_processed(&self) -> Option<u64> {
        self.last_counts().map(|c| c.processed)
    }

    /// Items the server rejected in the last exchange.
    pub fn last_failed(&self) -> Option<u64> {
        self.last_counts().map(|c| c.failed)
    }

    /// Items the server received in the last exchange.
    pub fn last_total(&self) -> Option<u64> {
        self.last_counts().map(|c| c.total)
    }

    /// Seconds spent as reported by the server, unparsed.
    pub fn last_spent(&self) -> Option<&str> {
        self.last_counts().map(|c| c.spent.as_str())
    }

    /// Seconds spent as a number, if the server reported one.
    pub fn last_spent_seconds(&self) -> Option<f64> {
        self.last_counts()?.spent_seconds()
    }

    fn last_counts(&self) -> Option<&ProcessingInfo> {
        self.last.as_ref()?.counts.as_ref()
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// Server host name or address.
    pub fn server(&self) -> &str {
        &self.settings.server
    }

    /// Server port.
    pub fn port(&self) -> u16 {
        self.settings.port
    }

    /// Connect timeout.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }

    /// Reply read deadline, `None` when reads block until close.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.settings.read_timeout
    }

    /// Protocol version byte written in request headers.
    pub fn protocol_version(&self) -> u8 {
        self.settings.protocol_version
    }

    /// Set the server host name or address.
    pub fn set_server(&mut self, server: impl Into<String>) -> &mut Self {
        self.settings.server = server.into();
        self
    }

    /// Set the server port.
    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.settings.port = port;
        self
    }

    /// Set the connect timeout. Zero is ignored.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.settings.set_timeout(timeout);
        self
    }

    /// Set or remove the reply read deadline. `Some(0)` is ignored.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.settings.set_read_timeout(timeout);
        self
    }

    /// Set the protocol version byte. Zero is ignored.
    pub fn set_protocol_version(&mut self, version: u8) -> &mut Self {
        self.settings.set_protocol_version(version);
        self
    }

    /// Take server and port from an agent configuration, where present.
    pub fn import_agent_config(&mut self, config: &AgentConfig) -> &mut Self {
        self.settings.import_agent_config(config);
        self
    }
}

/// Write one request and read the whole reply.
fn exchange(conn: &mut Connection, frame: &[u8], read_timeout: Option<Duration>) -> Result<Bytes> {
    conn.set_read_timeout(read_timeout)?;
    conn.write_all(frame)?;
    conn.read_all()
}

impl Default for Sender {
    fn default() -> Self {
        SenderBuilder::new().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(sender: &mut Sender) {
        sender
            .add_data("hostname1", "key1", "value1")
            .add_data("hostname2", "key2", "value2")
            .add_data_at("hostname3", "key3", "value3", 1234567890);
    }

    #[test]
    fn test_builder_defaults() {
        let sender = Sender::builder().build();
        assert_eq!(sender.server(), "localhost");
        assert_eq!(sender.port(), 10051);
        assert_eq!(sender.timeout(), Duration::from_secs(30));
        assert_eq!(sender.read_timeout(), None);
        assert_eq!(sender.protocol_version(), 1);
        assert_eq!(sender.pending_len(), 0);
        assert!(sender.last_response().is_none());
    }

    #[test]
    fn test_builder_configuration() {
        let sender = Sender::builder()
            .server("10.0.0.5")
            .port(10052)
            .timeout(Duration::from_secs(99))
            .read_timeout(Duration::from_secs(5))
            .protocol_version(2)
            .build();

        assert_eq!(sender.server(), "10.0.0.5");
        assert_eq!(sender.port(), 10052);
        assert_eq!(sender.timeout(), Duration::from_secs(99));
        assert_eq!(sender.read_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(sender.protocol_version(), 2);
    }

    #[test]
    fn test_zero_settings_ignored() {
        let mut sender = Sender::builder()
            .timeout(Duration::ZERO)
            .read_timeout(Duration::ZERO)
            .protocol_version(0)
            .build();
        assert_eq!(sender.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(sender.read_timeout(), None);
        assert_eq!(sender.protocol_version(), 1);

        sender
            .set_timeout(Duration::ZERO)
            .set_read_timeout(Some(Duration::ZERO))
            .set_protocol_version(0);
        assert_eq!(sender.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(sender.read_timeout(), None);
        assert_eq!(sender.protocol_version(), 1);

        sender.set_read_timeout(Some(Duration::from_secs(1)));
        assert_eq!(sender.read_timeout(), Some(Duration::from_secs(1)));
        sender.set_read_timeout(None);
        assert_eq!(sender.read_timeout(), None);
    }

    #[test]
    fn test_add_data_and_reset() {
        let mut sender = Sender::default();
        sample(&mut sender);
        assert_eq!(sender.pending_len(), 3);
        assert_eq!(sender.data()[2].clock, Some(1234567890));
        assert_eq!(sender.data()[0].clock, None);

        sender.reset_queue();
        assert_eq!(sender.pending_len(), 0);
        assert!(sender.data().is_empty());
    }

    #[test]
    fn test_agent_config_import() {
        let config = AgentConfig::parse("Server=192.0.2.7\nServerPort=20051\n");
        let sender = Sender::builder().agent_config(&config).build();
        assert_eq!(sender.server(), "192.0.2.7");
        assert_eq!(sender.port(), 20051);

        let mut sender = Sender::new("keep.me", 1234);
        sender.import_agent_config(&AgentConfig::parse("# nothing\n"));
        assert_eq!(sender.server(), "keep.me");
        assert_eq!(sender.port(), 1234);
    }

    #[test]
    fn test_accessors_empty_before_exchange() {
        let sender = Sender::default();
        assert_eq!(sender.last_status(), None);
        assert_eq!(sender.last_info(), None);
        assert_eq!(sender.last_processed(), None);
        assert_eq!(sender.last_failed(), None);
        assert_eq!(sender.last_total(), None);
        assert_eq!(sender.last_spent(), None);
        assert_eq!(sender.last_spent_seconds(), None);
        assert!(sender.last_response_body().is_none());
        assert!(sender.last_raw_response().is_none());
    }

    #[test]
    fn test_send_unresolvable_host_keeps_queue() {
        let mut sender = Sender::builder()
            .server("invalid-hostname.invalid")
            .timeout(Duration::from_secs(2))
            .build();
        sample(&mut sender);
        let before = sender.data().to_vec();

        let err = sender.send().unwrap_err();
        assert!(err.is_network());
        assert_eq!(sender.data(), &before[..]);
    }
}
