//! Prompt text and request presets for commit messages and security reviews.

use crate::llm::client::{ChatMessage, GenerationRequest};

/// Output budget and sampling for commit message generation.
pub const COMMIT_MAX_TOKENS: u32 = 300;
pub const COMMIT_TEMPERATURE: f32 = 0.5;

/// Output budget and sampling for the security review.
pub const REVIEW_MAX_TOKENS: u32 = 1_000;
pub const REVIEW_TEMPERATURE: f32 = 0.3;

/// System instruction for commit message generation.
pub const COMMIT_SYSTEM_PROMPT: &str = "You are an expert software engineer who writes \
clear, concise Git commit messages following the Conventional Commits specification. \
Write a subject line of at most 72 characters in the form `type(scope): description`, \
using the imperative mood. If the change needs explanation, add a blank line and a short \
body explaining why the change was made. Respond with the commit message only: no \
markdown fences, no quotes, no commentary.";

const EMPTY_DIFF_NOTE: &str =
    "(No diff content is available: every staged file is excluded from the diff.)";

fn diff_or_note(diff: &str) -> &str {
    if diff.trim().is_empty() { EMPTY_DIFF_NOTE } else { diff }
}

/// Build the two-message (system + user) commit message request.
pub fn commit_message_request(model: &str, diff: &str) -> GenerationRequest {
    let user = format!(
        "Generate a commit message for the following staged changes:\n\n{}",
        diff_or_note(diff)
    );

    GenerationRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::system(COMMIT_SYSTEM_PROMPT), ChatMessage::user(user)],
        max_tokens: COMMIT_MAX_TOKENS,
        temperature: COMMIT_TEMPERATURE,
    }
}

/// Build the single-message (user only) security review request.
pub fn security_review_request(model: &str, diff: &str, commit_message: &str) -> GenerationRequest {
    let user = format!(
        r#"Review the following code changes for security vulnerabilities.

Look for injection flaws, unsafe handling of untrusted input, hard-coded secrets or
credentials, broken authentication or authorization, insecure cryptography, path
traversal, and unsafe deserialization. For each finding give the file, the risk and a
suggested fix. Keep the report short and plain text, suitable for a commit message
body. If there are no issues, reply exactly: No issues found.

Commit message:
{commit_message}

Diff:
{diff}"#,
        diff = diff_or_note(diff),
    );

    GenerationRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(user)],
        max_tokens: REVIEW_MAX_TOKENS,
        temperature: REVIEW_TEMPERATURE,
    }
}
