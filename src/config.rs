//! Agent configuration file reader.
//!
//! Reads the `key=value` lines of a `zabbix_agentd.conf`-style file so a
//! [`Sender`](crate::Sender) can pick up the server address from it.
//!
//! A line counts only if its first non-blank character is a letter and it
//! contains `=`. The first `=` splits key from value, both are trimmed, and a
//! later key replaces an earlier one. Everything else (comments, blanks,
//! malformed lines) is skipped.
//!
//! # Example
//!
//! ```
//! use zabbix_sender::AgentConfig;
//!
//! let config = AgentConfig::parse("Server=127.0.0.1\n#comment\nServerPort=10051\n");
//! assert_eq!(config.server(), Some("127.0.0.1"));
//! assert_eq!(config.server_port(), Some(10051));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default agent configuration path.
pub const DEFAULT_AGENT_CONFIG_PATH: &str = "/etc/zabbix/zabbix_agentd.conf";

const SERVER_KEY: &str = "Server";
const SERVER_PORT_KEY: &str = "ServerPort";

/// Parsed agent configuration.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    path: Option<PathBuf>,
    entries: HashMap<String, String>,
}

impl AgentConfig {
    /// Load a configuration file.
    ///
    /// A missing or unreadable file gives an empty configuration.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let entries = match std::fs::read_to_string(path) {
            Ok(text) => parse_entries(&text),
            Err(e) => {
                tracing::debug!("Agent config {} not loaded: {}", path.display(), e);
                HashMap::new()
            }
        };
        Self {
            path: Some(path.to_path_buf()),
            entries,
        }
    }

    /// Load [`DEFAULT_AGENT_CONFIG_PATH`].
    pub fn load_default() -> Self {
        Self::load(DEFAULT_AGENT_CONFIG_PATH)
    }

    /// Parse configuration text that did not come from a file.
    pub fn parse(text: &str) -> Self {
        Self {
            path: None,
            entries: parse_entries(text),
        }
    }

    /// Value of `Server`.
    pub fn server(&self) -> Option<&str> {
        self.get(SERVER_KEY)
    }

    /// Value of `ServerPort`, if it is a valid port number.
    pub fn server_port(&self) -> Option<u16> {
        self.get(SERVER_PORT_KEY)?.parse().ok()
    }

    /// Value of any recognized key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// All recognized entries.
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    /// File this configuration was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of recognized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries were recognized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entries(text: &str) -> HashMap<String, String> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim_start();
    if !line.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}
