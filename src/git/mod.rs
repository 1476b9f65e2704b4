//! Version-control adapter.
//!
//! Reads (staged paths, diff text, HEAD message) go through git2. Writes
//! (commit, push) shell out to the system `git` binary so hooks, signing,
//! credentials and the user's config all apply.

pub mod cli;

pub use cli::GitCli;

use crate::commit::diff::{ExclusionRules, StagedChangeSet};
use crate::error::{FlowError, GitError};

/// Operations the commit flow needs from version control.
#[cfg_attr(test, mockall::automock)]
pub trait Vcs {
    /// Staged paths and the exclusion-filtered staged diff.
    fn staged_changes(&self, exclusions: &ExclusionRules) -> Result<StagedChangeSet, GitError>;

    /// Full message of the commit HEAD points to.
    fn head_message(&self) -> Result<String, GitError>;

    /// Commit the index with `message`, amending HEAD when `amend` is set.
    fn commit(&self, message: &str, amend: bool) -> Result<(), GitError>;

    /// Push the current branch, with a lease-protected force when `force` is set.
    fn push(&self, force: bool) -> Result<(), GitError>;
}

/// Check that the `git` binary is on PATH.
pub fn check_git_installed() -> Result<(), FlowError> {
    which::which("git")
        .map(|_| ())
        .map_err(|_| FlowError::MissingTool("git"))
}
