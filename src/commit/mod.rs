//! Staged diff collection and commit message construction.

pub mod diff;
pub mod message;
pub mod prompt;

pub use diff::{
    DiffPayload, EXCLUSION_FILE, ExclusionRules, MAX_DIFF_CHARS, StagedChangeSet, collect_staged,
    truncate_diff,
};
pub use message::{SECURITY_HEADING, annotate_with_security_report, clean_generated};
pub use prompt::{commit_message_request, security_review_request};
