//! Probe failure taxonomy.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::probe::http_date::HttpDateError;

/// Failure of a single probe request.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// DNS, connect, TLS, timeout or request-construction failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Freshness probe answered with something other than 200.
    #[error("request failed with status code: {0}")]
    UnexpectedStatus(StatusCode),

    /// Missing or malformed `Last-Modified` header.
    #[error("invalid Last-Modified header: {0}")]
    Parse(#[from] HttpDateError),
}

impl ProbeError {
    pub fn kind(&self) -> ProbeErrorKind {
        match self {
            ProbeError::Transport(_) => ProbeErrorKind::Transport,
            ProbeError::UnexpectedStatus(_) => ProbeErrorKind::UnexpectedStatus,
            ProbeError::Parse(_) => ProbeErrorKind::Parse,
        }
    }
}

/// Coarse classification of a [`ProbeError`], used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeErrorKind {
    Transport,
    UnexpectedStatus,
    Parse,
}

impl ProbeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeErrorKind::Transport => "transport",
            ProbeErrorKind::UnexpectedStatus => "unexpected_status",
            ProbeErrorKind::Parse => "parse",
        }
    }
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message() {
        let err = ProbeError::UnexpectedStatus(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), ProbeErrorKind::UnexpectedStatus);
        assert_eq!(
            err.to_string(),
            "request failed with status code: 500 Internal Server Error"
        );
    }

    #[test]
    fn test_parse_kind() {
        let err = ProbeError::from(HttpDateError::Missing);
        assert_eq!(err.kind(), ProbeErrorKind::Parse);
        assert_eq!(err.kind().to_string(), "parse");
    }
}
