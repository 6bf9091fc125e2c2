//! # zabbix-sender
//!
//! Client for the Zabbix trapper protocol.
//!
//! Data points are queued on a [`Sender`], framed as a `"sender data"` JSON
//! request and pushed to the server over a fresh TCP connection per
//! [`Sender::send`]. The server's reply is decoded into a status and the
//! processed/failed/total counters of its `info` summary.
//!
//! ## Wire format
//!
//! ```text
//! "ZBXD" | version (1 byte) | body length (8 bytes, LE) | JSON body
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use zabbix_sender::{AgentConfig, Sender};
//!
//! let config = AgentConfig::load_default();
//! let mut sender = Sender::builder().agent_config(&config).build();
//! sender.add_data("web01", "app.latency", 0.25);
//!
//! match sender.send() {
//!     Ok(status) if status.is_success() => {
//!         println!("{:?}", sender.last_info());
//!     }
//!     Ok(_) => eprintln!("server rejected the batch"),
//!     Err(e) => eprintln!("send failed: {e}"),
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod payload;
pub mod protocol;
pub mod transport;

mod sender;

pub use config::AgentConfig;
pub use error::{Result, SenderError};
pub use payload::{DataPoint, Value};
pub use protocol::{ProcessingInfo, Response, ResponseStatus};
pub use sender::{Sender, SenderBuilder, DEFAULT_PORT, DEFAULT_SERVER, DEFAULT_TIMEOUT};
