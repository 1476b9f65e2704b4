//! Interactive review gates for diffs and commit messages.
//!
//! Each gate reads one keystroke. Only `y`/`Y` counts as yes at a
//! confirmation; any other key declines. At the action gate `c` cancels,
//! `e` edits, and any other key moves on to the final confirmation.

pub mod editor;
pub mod terminal;

use std::io;

use crate::error::FlowError;

pub use editor::{EditorKind, EditorRejection, ExternalEditor, MessageEditor};
pub use terminal::TerminalPrompter;

/// User-facing output and single-keystroke input.
pub trait Prompter {
    fn say(&mut self, text: &str);
    fn warn(&mut self, text: &str);
    /// Show `prompt` and return the key pressed.
    fn read_key(&mut self, prompt: &str) -> io::Result<char>;
}

/// Choice at the action gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    Cancel,
    Confirm,
}

impl Action {
    pub fn from_key(key: char) -> Self {
        match key {
            'e' => Action::Edit,
            'c' => Action::Cancel,
            _ => Action::Confirm,
        }
    }
}

pub fn is_yes(key: char) -> bool {
    matches!(key, 'y' | 'Y')
}

/// Ask a yes/no question; `Ok(true)` only for `y`/`Y`.
pub fn confirm(prompter: &mut dyn Prompter, prompt: &str) -> Result<bool, FlowError> {
    Ok(is_yes(prompter.read_key(prompt)?))
}

/// Offer to show the diff before generation.
///
/// Declining to review skips straight on. Reviewing and then declining to
/// proceed cancels the flow.
pub fn review_diff(prompter: &mut dyn Prompter, diff: &str) -> Result<(), FlowError> {
    if !confirm(prompter, "Review the diff before generating? [y/N] ")? {
        return Ok(());
    }

    if diff.is_empty() {
        prompter.say("(diff is empty: all staged files are excluded)");
    } else {
        prompter.say(diff);
    }

    if confirm(prompter, "Proceed with generating a commit message? [y/N] ")? {
        Ok(())
    } else {
        Err(FlowError::UserCanceled)
    }
}

/// Let the user edit, cancel or accept `message`, then require a final `y`.
///
/// Returns the message to commit. Edited messages are trimmed and must not be
/// empty.
pub fn review_message(
    prompter: &mut dyn Prompter,
    editor: &dyn MessageEditor,
    message: String,
) -> Result<String, FlowError> {
    prompter.say("\nProposed commit message:\n");
    prompter.say(&message);
    prompter.say("");

    let key = prompter.read_key("(e)dit, (c)ancel, or any other key to continue: ")?;
    let message = match Action::from_key(key) {
        Action::Cancel => return Err(FlowError::UserCanceled),
        Action::Confirm => message,
        Action::Edit => {
            let edited = editor.edit(prompter, &message)?;
            let edited = edited.trim();
            if edited.is_empty() {
                return Err(FlowError::EmptyEditedMessage);
            }
            prompter.say("\nEdited commit message:\n");
            prompter.say(edited);
            prompter.say("");
            edited.to_string()
        }
    };

    if confirm(prompter, "Commit with this message? [y/N] ")? {
        Ok(message)
    } else {
        Err(FlowError::UserCanceled)
    }
}
