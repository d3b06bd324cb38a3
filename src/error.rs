//! Unified error type.

/// The error type returned by the crate's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, and failed validation is data
/// ([`ValidationErrors`](crate::ValidationErrors)), not an `Error`. This type
/// surfaces infrastructure failures (binding, accepting connections) and
/// custom rules that cannot be registered.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`: {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("rule name must not be empty")]
    EmptyRuleName,

    #[error("rule name `{0}` is reserved")]
    ReservedRuleName(String),

    #[error("rule name `{0}` contains a separator or whitespace")]
    InvalidRuleName(String),
}
