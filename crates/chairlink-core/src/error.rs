//! Common error types

use serde::Serialize;
use thiserror::Error;

/// Failure of one transport attempt against the device.
///
/// Variants carry plain data (no wrapped I/O types) so outcomes stay
/// comparable in tests and serializable for presentation layers; the client
/// crate maps its HTTP errors into this taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportError {
    /// The request never produced an HTTP answer (DNS failure, refused
    /// connection, broken pipe).
    #[error("request failed: {0}")]
    Request(String),

    /// The device answered with a non-success HTTP status.
    #[error("device returned HTTP {0}")]
    Status(u16),

    /// The reply arrived but did not carry a readable status payload.
    #[error("malformed device reply: {0}")]
    MalformedReply(String),

    /// The transport's deadline elapsed before the device answered.
    #[error("request timed out")]
    Timeout,

    /// The configured device address is not a valid URL.
    #[error("invalid device URL: {0}")]
    InvalidUrl(String),
}

/// Errors raised while loading controller configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Device URL failed validation
    #[error("invalid device URL '{url}': {source}")]
    InvalidDeviceUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Settings file could not be read
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Settings file could not be parsed
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Required environment variable is absent
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// An untrusted string was not one of the wire command tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}'")]
pub struct CommandParseError(pub String);
