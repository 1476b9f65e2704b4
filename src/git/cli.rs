//! [`Vcs`] implementation backed by git2 and the `git` binary.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::commit::diff::{ExclusionRules, StagedChangeSet, collect_staged};
use crate::error::GitError;

use super::Vcs;

/// A repository work tree driven through git2 (reads) and `git` (writes).
pub struct GitCli {
    repo: Repository,
    workdir: PathBuf,
}

impl GitCli {
    /// Open the repository containing `path`.
    pub fn discover(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::discover(path).map_err(GitError::OpenRepository)?;
        Self::from_repository(repo)
    }

    /// Open the repository whose work tree is exactly `path`.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::open(path).map_err(GitError::OpenRepository)?;
        Self::from_repository(repo)
    }

    fn from_repository(repo: Repository) -> Result<Self, GitError> {
        let workdir = repo
            .workdir()
            .ok_or(GitError::BareRepository)?
            .to_path_buf();
        Ok(Self { repo, workdir })
    }

    /// Root of the work tree.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run a git command in the work tree and return its stdout.
    fn run_git(&self, args: &[&str], operation: &'static str) -> Result<String, GitError> {
        debug!("Running git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| GitError::Spawn { operation, source })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed {
                operation,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Vcs for GitCli {
    fn staged_changes(&self, exclusions: &ExclusionRules) -> Result<StagedChangeSet, GitError> {
        collect_staged(&self.repo, exclusions)
    }

    fn head_message(&self) -> Result<String, GitError> {
        let commit = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(GitError::ReadHead)?;
        Ok(String::from_utf8_lossy(commit.message_bytes()).into_owned())
    }

    fn commit(&self, message: &str, amend: bool) -> Result<(), GitError> {
        // Removed on drop, on every return path below
        let mut file = NamedTempFile::new().map_err(GitError::MessageFile)?;
        file.write_all(message.as_bytes())
            .and_then(|_| file.flush())
            .map_err(GitError::MessageFile)?;

        let path = file.path().to_string_lossy().into_owned();
        let mut args = vec!["commit", "--file", path.as_str()];
        if amend {
            args.push("--amend");
        }

        let stdout = self.run_git(&args, if amend { "commit --amend" } else { "commit" })?;
        debug!("{}", stdout.trim());
        Ok(())
    }

    fn push(&self, force: bool) -> Result<(), GitError> {
        let args: &[&str] = if force {
            &["push", "--force-with-lease"]
        } else {
            &["push"]
        };
        self.run_git(args, "push")?;
        Ok(())
    }
}
