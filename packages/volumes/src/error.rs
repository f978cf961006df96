//! Error taxonomy for volume operations.

use serde::Deserialize;

/// Errors returned by [`Volumes`](crate::Volumes) operations.
///
/// `Transport`, `Api` and `Decode` together form the transport family
/// ([`VolumeError::is_transport`]). `NotFound` and `PartialCreation` are
/// split out so callers can build idempotent deletes and decide how to
/// recover from a half-finished create.
#[derive(thiserror::Error, Debug)]
pub enum VolumeError {
    #[error("transport error: {0}")]
    Transport(#[from] ifsvol_http::Error),

    #[error("array returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("volume {name} not found")]
    NotFound { name: String },

    /// The volume was created but its ownership could not be assigned.
    /// It exists on the array with its initial, public ACL.
    #[error("volume {name} created at {path} but ownership was not assigned: {source}")]
    PartialCreation {
        name: String,
        path: String,
        #[source]
        source: Box<VolumeError>,
    },

    #[error("invalid volume name: {reason}")]
    InvalidName { reason: String },

    #[error("unexpected response body: {message}")]
    Decode { message: String },
}

impl VolumeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, VolumeError::NotFound { .. })
    }

    pub fn is_partial_creation(&self) -> bool {
        matches!(self, VolumeError::PartialCreation { .. })
    }

    /// True for failures that came from the transport or the array's reply.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            VolumeError::Transport(_) | VolumeError::Api { .. } | VolumeError::Decode { .. }
        )
    }

    /// The error that stopped ownership assignment, for a partial creation.
    pub fn phase_two_error(&self) -> Option<&VolumeError> {
        match self {
            VolumeError::PartialCreation { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// The array's error document: `{"errors": [{"code": .., "message": ..}]}`.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ApiErrorBody {
    /// Joined error messages, or `fallback` when the body carried none.
    pub fn summary(&self, fallback: &str) -> String {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| match (e.code.is_empty(), e.message.is_empty()) {
                (false, false) => format!("{}: {}", e.code, e.message),
                (true, false) => e.message.clone(),
                (false, true) => e.code.clone(),
                (true, true) => String::new(),
            })
            .filter(|m| !m.is_empty())
            .collect();

        if messages.is_empty() {
            fallback.to_string()
        } else {
            messages.join("; ")
        }
    }
}
