//! diffscribe - Commit messages for staged changes, written by an LLM and
//! reviewed by you.
//!
//! # Overview
//!
//! diffscribe reads the staged diff, asks a chat-completions API for a commit
//! message, lets you review, edit or cancel it, commits, and offers to push.
//! The `secure` variant then asks for a security review of the same diff,
//! appends it under a `Security Analysis:` heading and amends the commit.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod review;
pub mod workflow;

// Re-export commonly used types
pub use commit::{DiffPayload, ExclusionRules, StagedChangeSet};
pub use config::Settings;
pub use error::{FlowError, GenerationError, GitError};
pub use git::{GitCli, Vcs};
pub use llm::{CompletionBackend, GenerationRequest, HttpCompletionClient};
pub use review::{EditorKind, ExternalEditor, MessageEditor, Prompter, TerminalPrompter};
pub use workflow::{CommitRun, FlowContext, run_commit_flow, run_security_flow};
