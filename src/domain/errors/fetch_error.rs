//! Errors raised while talking to the catalog or image hosts.

use thiserror::Error;

/// Failure of a remote fetch or of decoding what it returned.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("server responded with HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("failed to decode response: {message}")]
    Decode { message: String },

    #[error("failed to build HTTP client: {message}")]
    Client { message: String },
}

impl FetchError {
    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates client construction error.
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Returns whether the failure happened on the wire.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }

    /// Returns whether the payload arrived but could not be decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::HttpStatus {
                status: status.as_u16(),
            }
        } else if e.is_timeout() {
            Self::transport("request timed out")
        } else if e.is_connect() {
            Self::transport(format!("failed to connect: {e}"))
        } else {
            Self::transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(FetchError::transport("reset").is_transport());
        assert!(FetchError::HttpStatus { status: 404 }.is_transport());
        assert!(FetchError::decode("bad png").is_decode());
        assert!(!FetchError::client("tls").is_transport());
    }

    #[test]
    fn test_display() {
        let err = FetchError::HttpStatus { status: 503 };
        assert_eq!(err.to_string(), "server responded with HTTP 503");
    }
}
