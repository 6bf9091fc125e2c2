//! Tokenizer for the server's `info` summary.
//!
//! The server reports processing results as free text:
//! ```text
//! Processed 1 Failed 2 Total 3 Seconds spent 0.000035
//! ```
//! The text is split on single spaces and tokens 1, 3, 5 and 8 are read as
//! processed, failed, total and seconds spent. Newer servers send
//! `processed: 1; failed: 2; total: 3; seconds spent: 0.000035`, which has
//! the counters at the same positions; only the leading digits of a counter
//! token are read, so both forms decode identically.
//!
//! The summary is informational, so tokenizing never fails: a missing or
//! non-numeric counter reads as 0 and a missing time reads as empty.

use std::convert::Infallible;
use std::str::FromStr;

const PROCESSED_AT: usize = 1;
const FAILED_AT: usize = 3;
const TOTAL_AT: usize = 5;
const SPENT_AT: usize = 8;

/// Counters parsed from an `info` string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessingInfo {
    /// Items accepted by the server.
    pub processed: u64,
    /// Items rejected by the server.
    pub failed: u64,
    /// Items received by the server.
    pub total: u64,
    /// Processing time as reported, unparsed. Empty when absent.
    pub spent: String,
}

impl ProcessingInfo {
    /// Processing time in seconds, if the reported text is a number.
    pub fn spent_seconds(&self) -> Option<f64> {
        self.spent.parse().ok()
    }
}

impl FromStr for ProcessingInfo {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_info(s))
    }
}

/// Parse an `info` string into counters.
///
/// # Example
///
/// ```
/// use zabbix_sender::protocol::parse_info;
///
/// let info = parse_info("Processed 1 Failed 2 Total 3 Seconds spent 0.000035");
/// assert_eq!((info.processed, info.failed, info.total), (1, 2, 3));
/// assert_eq!(info.spent, "0.000035");
/// ```
pub fn parse_info(info: &str) -> ProcessingInfo {
    let tokens: Vec<&str> = info.split(' ').collect();
    if tokens.len() <= SPENT_AT {
        tracing::debug!("Short info string: {:?}", info);
    }

    ProcessingInfo {
        processed: counter(&tokens, PROCESSED_AT),
        failed: counter(&tokens, FAILED_AT),
        total: counter(&tokens, TOTAL_AT),
        spent: tokens.get(SPENT_AT).copied().unwrap_or_default().to_string(),
    }
}

/// Read the leading decimal digits of the token at `index`, 0 if none.
fn counter(tokens: &[&str], index: usize) -> u64 {
    let Some(token) = tokens.get(index) else {
        return 0;
    };
    let digits = token.bytes().take_while(u8::is_ascii_digit).count();
    token[..digits].parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classic_format() {
        let info = parse_info("Processed 1 Failed 2 Total 3 Seconds spent 0.000035");
        assert_eq!(info.processed, 1);
        assert_eq!(info.failed, 2);
        assert_eq!(info.total, 3);
        assert_eq!(info.spent, "0.000035");
        assert_eq!(info.spent_seconds(), Some(0.000035));
    }

    #[test]
    fn test_parse_semicolon_format() {
        let info = parse_info("processed: 0; failed: 3; total: 3; seconds spent: 0.000055");
        assert_eq!(info.processed, 0);
        assert_eq!(info.failed, 3);
        assert_eq!(info.total, 3);
        assert_eq!(info.spent, "0.000055");
    }

    #[test]
    fn test_parse_large_counters() {
        let info = parse_info("Processed 250 Failed 0 Total 250 Seconds spent 1.5");
        assert_eq!(info.total, 250);
        assert_eq!(info.spent_seconds(), Some(1.5));
    }

    #[test]
    fn test_truncated_info_reads_present_counters() {
        let info = parse_info("Processed 1 Failed 0 Total 1");
        assert_eq!(info.processed, 1);
        assert_eq!(info.failed, 0);
        assert_eq!(info.total, 1);
        assert_eq!(info.spent, "");
        assert_eq!(info.spent_seconds(), None);
    }

    #[test]
    fn test_too_few_tokens_defaults_to_zero() {
        let info = parse_info("Processed 1 Failed");
        assert_eq!(info.processed, 1);
        assert_eq!(info.failed, 0);
        assert_eq!(info.total, 0);
        assert_eq!(parse_info(""), ProcessingInfo::default());
    }

    #[test]
    fn test_double_space_shifts_positions() {
        // An extra space moves every following token.
        let info = parse_info("Processed  1 Failed 2 Total 3 Seconds spent 0.1");
        assert_eq!(info.processed, 0);
        assert_eq!(info.failed, 0);
        assert_eq!(info.total, 0);
        assert_eq!(info.spent, "spent");
    }

    #[test]
    fn test_non_numeric_counter_reads_zero() {
        let info = parse_info("Processed many Failed 2 Total 3 Seconds spent 0.1");
        assert_eq!(info.processed, 0);
        assert_eq!(info.failed, 2);
        assert_eq!(info.total, 3);
    }

    #[test]
    fn test_spent_kept_verbatim() {
        let info = parse_info("Processed 1 Failed 0 Total 1 Seconds spent n/a");
        assert_eq!(info.spent, "n/a");
        assert_eq!(info.spent_seconds(), None);
    }

    #[test]
    fn test_from_str() {
        let info: ProcessingInfo = "Processed 4 Failed 1 Total 5 Seconds spent 0.2".parse().unwrap();
        assert_eq!(info.processed, 4);
    }
}
