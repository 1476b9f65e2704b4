//! Staged diff collection, exclusion rules and size capping.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use git2::{Delta, Diff, DiffDelta, DiffFormat, ErrorCode, Repository, Tree};
use glob::Pattern;
use tracing::{debug, warn};

use crate::error::GitError;

/// Maximum characters of diff text sent to the generator.
pub const MAX_DIFF_CHARS: usize = 8_000;

/// Name of the optional project-local exclusion file.
pub const EXCLUSION_FILE: &str = ".diffscribeignore";

/// Glob patterns for paths that are left out of the diff text.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    patterns: Vec<Pattern>,
}

impl ExclusionRules {
    /// Parse rules from file content: one pattern per line.
    ///
    /// Blank lines and `#` comments are ignored. Patterns that are not valid
    /// globs are skipped with a warning.
    pub fn parse(content: &str) -> Self {
        let patterns = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| match Pattern::new(line) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid exclusion pattern '{}': {}", line, e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Load rules from `<root>/.diffscribeignore`. A missing file yields an
    /// empty rule set.
    pub fn load(root: &Path) -> std::io::Result<Self> {
        let path = root.join(EXCLUSION_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let rules = Self::parse(&content);
                debug!("Loaded {} exclusion pattern(s) from {}", rules.len(), path.display());
                Ok(rules)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `path` matches any pattern, either as a whole repo-relative
    /// path or by its file name alone.
    pub fn is_excluded(&self, path: &str) -> bool {
        let file_name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.patterns
            .iter()
            .any(|p| p.matches(path) || p.matches(&file_name))
    }
}

/// Staged paths plus the exclusion-filtered unified diff.
#[derive(Debug, Clone, Default)]
pub struct StagedChangeSet {
    pub paths: Vec<String>,
    pub diff_text: String,
}

impl StagedChangeSet {
    /// True when nothing is staged. Excluded files still count as staged.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Diff text ready to be sent, never longer than its cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPayload {
    pub text: String,
    pub truncated: bool,
}

/// Cut `text` to at most `cap` characters.
///
/// This is a plain character cut, not aligned to lines or hunks.
pub fn truncate_diff(mut text: String, cap: usize) -> DiffPayload {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => {
            text.truncate(byte_idx);
            DiffPayload { text, truncated: true }
        }
        None => DiffPayload { text, truncated: false },
    }
}

/// Resolve the HEAD tree, treating an unborn branch as "no tree".
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::Diff(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::Diff)?;
    Ok(Some(tree))
}

/// Collect staged paths and the staged diff (HEAD tree vs index).
///
/// Files matching `exclusions` stay in `paths` but contribute no diff text.
pub fn collect_staged(
    repo: &Repository,
    exclusions: &ExclusionRules,
) -> Result<StagedChangeSet, GitError> {
    let head_tree = resolve_head_tree(repo)?;
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::Diff)?;

    let paths = staged_paths(&diff);
    let diff_text = render_patch(&diff, exclusions)?;

    Ok(StagedChangeSet { paths, diff_text })
}

fn delta_path(delta: &DiffDelta<'_>) -> Option<String> {
    delta
        .new_file()
        .path()
        .or_else(|| delta.old_file().path())
        .map(|p| p.to_string_lossy().to_string())
}

fn staged_paths(diff: &Diff<'_>) -> Vec<String> {
    diff.deltas()
        .filter(|d| d.status() != Delta::Unmodified)
        .filter_map(|d| delta_path(&d))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Render the diff as unified patch text, skipping excluded files.
fn render_patch(diff: &Diff<'_>, exclusions: &ExclusionRules) -> Result<String, GitError> {
    let mut text = String::new();

    diff.print(DiffFormat::Patch, |delta, _hunk, line| {
        if let Some(path) = delta_path(&delta)
            && exclusions.is_excluded(&path)
        {
            return true;
        }

        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .map_err(GitError::Diff)?;

    Ok(text)
}
