//! The two end-to-end flows: generate-and-commit, and the security-annotated
//! variant that amends the commit with a vulnerability review.
//!
//! Every step runs to completion before the next starts. Nothing is written
//! to the repository until every preceding gate has passed.

use tracing::{debug, info, warn};

use crate::commit::diff::{DiffPayload, ExclusionRules, MAX_DIFF_CHARS, truncate_diff};
use crate::commit::message::{annotate_with_security_report, clean_generated};
use crate::commit::prompt::{commit_message_request, security_review_request};
use crate::error::{FlowError, GenerationError};
use crate::git::Vcs;
use crate::llm::client::CompletionBackend;
use crate::review::{MessageEditor, Prompter, confirm, review_diff, review_message};

/// Collaborators and inputs for one run, passed explicitly through each step.
pub struct FlowContext<'a> {
    pub vcs: &'a dyn Vcs,
    pub backend: &'a dyn CompletionBackend,
    pub prompter: &'a mut dyn Prompter,
    pub editor: &'a dyn MessageEditor,
    pub exclusions: &'a ExclusionRules,
    pub model: &'a str,
}

/// Result of a completed (committed) run.
#[derive(Debug, Clone)]
pub struct CommitRun {
    /// Message that was committed.
    pub message: String,
    /// Diff text that was sent for generation.
    pub payload: DiffPayload,
    pub amended: bool,
    pub pushed: bool,
}

/// Collect the staged diff, apply exclusions and cap its size.
///
/// Fails with [`FlowError::NoStagedChanges`] when nothing is staged.
pub fn collect_payload(
    vcs: &dyn Vcs,
    exclusions: &ExclusionRules,
    prompter: &mut dyn Prompter,
) -> Result<DiffPayload, FlowError> {
    let changes = vcs.staged_changes(exclusions)?;
    if changes.is_empty() {
        return Err(FlowError::NoStagedChanges);
    }

    info!(
        files = changes.paths.len(),
        chars = changes.diff_text.chars().count(),
        "Collected staged changes"
    );
    prompter.say(&format!("Staged files ({}):", changes.paths.len()));
    for path in &changes.paths {
        prompter.say(&format!("  {}", path));
    }

    if changes.diff_text.is_empty() {
        warn!("All staged files are excluded; the diff sent for generation is empty");
    }

    let payload = truncate_diff(changes.diff_text, MAX_DIFF_CHARS);
    if payload.truncated {
        prompter.warn(&format!(
            "Diff is larger than {} characters and was truncated; the message may miss some changes.",
            MAX_DIFF_CHARS
        ));
    }

    Ok(payload)
}

/// Commit `message`, then offer a push. Declining the push is not an error.
///
/// Returns whether a push happened.
pub fn commit_and_maybe_push(
    vcs: &dyn Vcs,
    prompter: &mut dyn Prompter,
    message: &str,
    amend: bool,
) -> Result<bool, FlowError> {
    vcs.commit(message, amend)?;
    prompter.say(if amend { "Amended the last commit." } else { "Committed." });

    let question = if amend {
        "Force-push the amended commit? [y/N] "
    } else {
        "Push to remote? [y/N] "
    };
    if !confirm(prompter, question)? {
        prompter.say("Not pushed; the commit is kept locally.");
        return Ok(false);
    }

    vcs.push(amend)?;
    prompter.say("Pushed.");
    Ok(true)
}

/// Generate a commit message for the staged changes, review it, commit it and
/// optionally push.
pub async fn run_commit_flow(ctx: &mut FlowContext<'_>) -> Result<CommitRun, FlowError> {
    let payload = collect_payload(ctx.vcs, ctx.exclusions, ctx.prompter)?;
    review_diff(ctx.prompter, &payload.text)?;

    ctx.prompter.say("Generating commit message...");
    let request = commit_message_request(ctx.model, &payload.text);
    let generated = ctx.backend.complete(&request).await?;

    let message = clean_generated(&generated);
    if message.is_empty() {
        return Err(GenerationError::EmptyGeneration.into());
    }
    debug!("Generated message: {}", message);

    let message = review_message(ctx.prompter, ctx.editor, message)?;
    let pushed = commit_and_maybe_push(ctx.vcs, ctx.prompter, &message, false)?;

    Ok(CommitRun {
        message,
        payload,
        amended: false,
        pushed,
    })
}

/// Run [`run_commit_flow`], then ask for a security review of the same diff,
/// append it to the commit message and amend the commit.
///
/// The second pass repeats every review gate: diff review, action and final
/// confirmation. If the base run fails or is canceled, or the diff gate is
/// declined, no review request is made.
pub async fn run_security_flow(ctx: &mut FlowContext<'_>) -> Result<CommitRun, FlowError> {
    let base = run_commit_flow(ctx).await?;

    let committed = ctx.vcs.head_message()?;
    let committed = committed.trim_end();

    // The annotated message gets its own full review, diff gate included
    review_diff(ctx.prompter, &base.payload.text)?;

    ctx.prompter.say("Running security analysis...");
    let request = security_review_request(ctx.model, &base.payload.text, committed);
    let report = ctx.backend.complete(&request).await?;

    let annotated = annotate_with_security_report(committed, &report);
    let message = review_message(ctx.prompter, ctx.editor, annotated)?;
    let pushed = commit_and_maybe_push(ctx.vcs, ctx.prompter, &message, true)?;

    Ok(CommitRun {
        message,
        payload: base.payload,
        amended: true,
        pushed,
    })
}
