//! Engine error taxonomy.
//!
//! Four failure families with distinct propagation rules: validation failures
//! block a save before any network effect, sub-resource write failures are
//! reported per-resource without rolling back siblings, stale reads are
//! suppressed once deletion is in progress, and remote reconciliation
//! failures are scoped to sync status rather than save status.

use thiserror::Error;

/// A single field-level validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Which of the three orchestrated sub-resources a write targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubResource {
    Agent,
    WorkspaceAssignment,
    EmbedSettings,
}

impl std::fmt::Display for SubResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent => write!(f, "agent"),
            Self::WorkspaceAssignment => write!(f, "workspace assignment"),
            Self::EmbedSettings => write!(f, "embed settings"),
        }
    }
}

/// Errors surfaced by the external resource stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The resource does not exist (or no longer exists).
    #[error("resource not found")]
    NotFound,

    /// The backing service answered with a non-success status.
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
}

impl StoreError {
    /// Whether this failure confirms the resource is gone.
    ///
    /// A 404/410 status, or an upstream message that names the resource as
    /// missing, means a retry cannot succeed.
    pub fn is_confirmed_gone(&self) -> bool {
        match self {
            Self::NotFound => true,
            Self::Upstream { status, message } => {
                matches!(status, 404 | 410)
                    || message.to_ascii_lowercase().contains("not found")
            }
            Self::Transport(_) => false,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 404 => Self::NotFound,
            Some(status) => Self::Upstream {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Self::Transport(err.to_string()),
        }
    }
}

/// Top-level engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Local, pre-network; blocks the save entirely.
    #[error("configuration validation failed ({} violation(s))", .0.len())]
    Validation(Vec<FieldViolation>),

    /// One of the orchestrated writes failed. Reported per-resource; sibling
    /// writes that succeeded stay applied.
    #[error("{resource} write failed: {source}")]
    SubResourceWrite {
        resource: SubResource,
        #[source]
        source: StoreError,
    },

    /// A read raced against deletion. Suppressed rather than surfaced once
    /// the deleting flag is set.
    #[error("read suppressed: deletion in progress")]
    StaleRead,

    /// Create-or-update against the external platform failed. Distinct from
    /// local save failures; never invalidates a prior successful local save.
    #[error("remote reconciliation failed: {0}")]
    RemoteReconciliation(#[source] StoreError),

    #[error("agent not found")]
    NotFound,

    /// A store read failed for a reason unrelated to deletion, after the
    /// retry budget was exhausted.
    #[error("read failed: {0}")]
    Read(#[source] StoreError),
}
