//! Error types for configuration parsing.

use thiserror::Error;

/// Fatal error while reading a configuration document.
///
/// Every variant names the offending document and 1-based line number.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An `interface` line without a usable name.
    #[error("{document}:{line}: cannot extract interface name from '{text}'")]
    MissingInterfaceName {
        /// Document being parsed
        document: String,
        /// Line number
        line: usize,
        /// The offending line, trimmed
        text: String,
    },

    /// A `prefix` line without a usable address.
    #[error("{document}:{line}: cannot extract prefix address from '{text}'")]
    MissingPrefixAddress {
        /// Document being parsed
        document: String,
        /// Line number
        line: usize,
        /// The offending line, trimmed
        text: String,
    },

    /// A `prefix` address that is not an IPv6 network.
    #[error("{document}:{line}: invalid prefix '{prefix}': {reason}")]
    InvalidPrefix {
        /// Document being parsed
        document: String,
        /// Line number
        line: usize,
        /// The extracted address
        prefix: String,
        /// Why it was rejected
        reason: String,
    },
}
