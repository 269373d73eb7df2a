use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote collaborator a request was sent to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Tracker,
    Model,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Tracker => f.write_str("tracker"),
            Service::Model => f.write_str("model"),
        }
    }
}

/// Coarse failure class. Each maps to its own process exit status.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Config,
    Tracker,
    Model,
    DataShape,
    Io,
}

impl ErrorCategory {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCategory::Config => 2,
            ErrorCategory::Tracker => 3,
            ErrorCategory::Model => 4,
            ErrorCategory::DataShape => 5,
            ErrorCategory::Io => 6,
        }
    }
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("{service} request failed with status {status}: {body}")]
    Request {
        service: Service,
        status: u16,
        body: String,
    },
    #[error("{service} transport error: {message}")]
    Transport { service: Service, message: String },
    #[error("unexpected {service} response: {message}")]
    DataShape { service: Service, message: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StageError::Request { service, .. } | StageError::Transport { service, .. } => match service {
                Service::Tracker => ErrorCategory::Tracker,
                Service::Model => ErrorCategory::Model,
            },
            StageError::DataShape { .. } => ErrorCategory::DataShape,
            StageError::Config(_) => ErrorCategory::Config,
            StageError::Io { .. } => ErrorCategory::Io,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StageError::Io {
            path: path.into(),
            source,
        }
    }
}
