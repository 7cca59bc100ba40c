// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures a single user action can end in. None of them are retried.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Malformed record '{id}': {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("Not logged in; run `spendwise login` first")]
    NotLoggedIn,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl TrackerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TrackerError::Validation(msg.into())
    }

    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        TrackerError::MalformedRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Network and backend failures are shown inline and leave the view intact.
    pub fn is_remote(&self) -> bool {
        matches!(self, TrackerError::Network(_) | TrackerError::Api { .. })
    }
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;

/// The backend failure behind a command error, if that is what ended it.
pub fn remote_cause(err: &anyhow::Error) -> Option<&TrackerError> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<TrackerError>())
        .find(|e| e.is_remote())
}
