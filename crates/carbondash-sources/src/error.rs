// SPDX-License-Identifier: Apache-2.0

use carbondash_core::MachineError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorCode {
    Network,
    MalformedPayload,
    NotFound,
    Unauthorized,
    Internal,
}

impl SourceErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network_error",
            Self::MalformedPayload => "malformed_payload",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Internal => "internal_error",
        }
    }
}

/// Failure of one upstream summary endpoint. Recovered locally: the fan-out
/// substitutes an empty placeholder and the reconciler proceeds as if the
/// source were unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    pub code: SourceErrorCode,
    pub message: String,
}

impl SourceError {
    #[must_use]
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Network, message)
    }

    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::MalformedPayload, message)
    }

    /// Machine-readable envelope for diagnostics surfaces.
    #[must_use]
    pub fn to_machine(&self, source: &str) -> MachineError {
        MachineError::new(self.code.as_str(), &self.message).with_detail("source", source)
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for SourceError {}

/// Local persistence failure for the recommendation store.
#[derive(Debug)]
pub struct StoreError(pub String);

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}
