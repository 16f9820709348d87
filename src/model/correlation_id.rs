//! Correlation-ID ties together the log lines of a single HTTP request

use http::HeaderMap;
use serde_derive::{Deserialize, Serialize};
use std::convert::TryFrom;
use thiserror::*;
use uuid::Uuid;

#[derive(Clone, Debug, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CorrelationId(Uuid);

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(c: Uuid) -> Self {
        CorrelationId(c)
    }
}

impl From<CorrelationId> for Uuid {
    fn from(c: CorrelationId) -> Self {
        c.0
    }
}

impl<'a> TryFrom<&'a str> for CorrelationId {
    type Error = InvalidCorrelationId;

    fn try_from(input: &'a str) -> Result<Self, Self::Error> {
        Uuid::parse_str(input)
            .map(CorrelationId)
            .map_err(|_| InvalidCorrelationId::InvalidString(input.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidCorrelationId {
    #[error("correlation-id not found")]
    NotFound,
    #[error("Invalid correlation-id string {0}")]
    InvalidString(String),
}

impl CorrelationId {
    pub const HEADER_NAME: &'static str = "correlation-id";

    pub fn new() -> Self {
        CorrelationId(Uuid::new_v4())
    }

    /// Extract correlation-id from a set of HTTP headers
    pub fn from_header_map(h: &HeaderMap) -> Result<Self, InvalidCorrelationId> {
        h.get(Self::HEADER_NAME)
            .ok_or(InvalidCorrelationId::NotFound)
            .and_then(|x| {
                x.to_str()
                    .map_err(|err| InvalidCorrelationId::InvalidString(err.to_string()))
            })
            .and_then(CorrelationId::try_from)
    }

    /// Header value if it is a valid id, a fresh one otherwise.
    pub fn from_header_map_or_new(h: &HeaderMap) -> Self {
        Self::from_header_map(h).unwrap_or_else(|_| Self::new())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}
