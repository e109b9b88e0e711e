use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Query parameters the validator can reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Site,
    Lang,
    Keys,
}

impl Param {
    /// Name of the parameter on the query string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Lang => "lang",
            Self::Keys => "t",
        }
    }
}

impl fmt::Display for Param {
    // `t` repeats, so it is reported in the plural.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keys => write!(f, "{} params", self.name()),
            _ => write!(f, "{} param", self.name()),
        }
    }
}

/// Terminal outcome of a lookup request other than success.
///
/// The `Display` text is the response body sent to the client.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required query parameter was not supplied.
    #[error("{0} missing")]
    MissingParameter(Param),

    /// A query parameter was supplied but could not be parsed.
    #[error("{0} must be int")]
    InvalidParameter(Param),

    /// The store failed while issuing the query or streaming rows.
    #[error("{0}")]
    StoreUnavailable(String),
}

impl GatewayError {
    /// Whether the error was caused by the client's request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingParameter(_) | Self::InvalidParameter(_))
    }
}

impl From<StoreError> for GatewayError {
    fn from(e: StoreError) -> Self {
        Self::StoreUnavailable(e.to_string())
    }
}

/// Errors raised by a [`TranslationStore`](crate::traits::TranslationStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// A replica could not be reached.
    #[error("cannot connect to {node}: {message}")]
    Connect { node: String, message: String },

    /// The query failed on the replica; carries the driver's message.
    #[error("{0}")]
    Query(String),

    /// The replica did not answer within the configured timeout.
    #[error("no response received from store within {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config error: {0}")]
    Invalid(String),
}
