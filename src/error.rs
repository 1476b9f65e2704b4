//! Error types for diffscribe modules using thiserror.

use thiserror::Error;

/// Errors from the version-control adapter.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Bare repositories are not supported")]
    BareRepository,

    #[error("Failed to collect staged diff: {0}")]
    Diff(#[source] git2::Error),

    #[error("Failed to read HEAD commit: {0}")]
    ReadHead(#[source] git2::Error),

    #[error("Failed to run git {operation}: {source}")]
    Spawn {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed {
        operation: &'static str,
        stderr: String,
    },

    #[error("Failed to write commit message file: {0}")]
    MessageFile(#[source] std::io::Error),
}

/// Errors from the remote text-generation API.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Rate limited by the completion API (HTTP 429). Wait a moment and try again.")]
    RateLimited,

    #[error("Completion API returned HTTP {status}: {body}")]
    ApiHttp { status: u16, body: String },

    #[error("Completion API reported an error: {message}")]
    ApiLogical { message: String },

    #[error("Completion API returned no usable text")]
    EmptyGeneration,

    #[error("Request to completion API failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Completion API returned invalid JSON: {0}")]
    InvalidResponse(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Errors that end an interactive commit flow.
///
/// Every variant is fatal to the current invocation. None of them is raised
/// after a commit has been written except a failed push.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Required tool '{0}' was not found in PATH")]
    MissingTool(&'static str),

    #[error("No staged changes. Stage files with `git add` first.")]
    NoStagedChanges,

    #[error("Canceled by user")]
    UserCanceled,

    #[error("Edited commit message is empty; canceled")]
    EmptyEditedMessage,

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("Editor '{program}' failed: {reason}")]
    Editor { program: &'static str, reason: String },

    #[error("Failed to read from terminal: {0}")]
    Terminal(#[from] std::io::Error),
}

impl FlowError {
    /// Whether the flow ended because the user declined at a gate.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, FlowError::UserCanceled | FlowError::EmptyEditedMessage)
    }
}
