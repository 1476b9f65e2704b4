//! External editor selection and invocation.
//!
//! The configured editor is never executed directly. Its base name is looked
//! up in a closed set of known editors and the matching known program is
//! launched instead; anything else falls back to [`EditorKind::FALLBACK`].

use std::env;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::FlowError;

use super::Prompter;

/// Environment variable naming the user's editor.
pub const EDITOR_ENV_VAR: &str = "EDITOR";

/// Editors that may be launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Nano,
    Vim,
    Vi,
    Emacs,
    Code,
    Subl,
    Gedit,
}

/// Why a configured editor was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorRejection {
    Unset,
    NotAllowed(String),
}

impl fmt::Display for EditorRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorRejection::Unset => write!(f, "${} is not set", EDITOR_ENV_VAR),
            EditorRejection::NotAllowed(name) => {
                write!(f, "editor '{}' is not in the list of supported editors", name)
            }
        }
    }
}

impl EditorKind {
    /// Always present on POSIX systems.
    pub const FALLBACK: EditorKind = EditorKind::Vi;

    pub const ALL: [EditorKind; 7] = [
        EditorKind::Nano,
        EditorKind::Vim,
        EditorKind::Vi,
        EditorKind::Emacs,
        EditorKind::Code,
        EditorKind::Subl,
        EditorKind::Gedit,
    ];

    /// Program name launched for this editor.
    pub fn program(&self) -> &'static str {
        match self {
            EditorKind::Nano => "nano",
            EditorKind::Vim => "vim",
            EditorKind::Vi => "vi",
            EditorKind::Emacs => "emacs",
            EditorKind::Code => "code",
            EditorKind::Subl => "subl",
            EditorKind::Gedit => "gedit",
        }
    }

    /// Extra arguments so GUI editors block until the file is closed.
    fn wait_args(&self) -> &'static [&'static str] {
        match self {
            EditorKind::Code | EditorKind::Subl => &["--wait"],
            _ => &[],
        }
    }

    /// Match a configured editor value (e.g. `/usr/bin/vim` or `code --wait`)
    /// by the base name of its first word.
    pub fn from_configured(value: Option<&str>) -> Result<EditorKind, EditorRejection> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let Some(value) = value else {
            return Err(EditorRejection::Unset);
        };

        let command = value.split_whitespace().next().unwrap_or(value);
        let base = Path::new(command)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let base = base.strip_suffix(".exe").unwrap_or(&base);

        EditorKind::ALL
            .into_iter()
            .find(|kind| kind.program() == base)
            .ok_or_else(|| EditorRejection::NotAllowed(base.to_string()))
    }

    /// Resolve a configured value, substituting the fallback on rejection.
    pub fn resolve(value: Option<&str>) -> EditorKind {
        EditorKind::from_configured(value).unwrap_or(EditorKind::FALLBACK)
    }

    /// Build the command that opens `path` in this editor.
    pub fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(self.wait_args()).arg(path);
        cmd
    }
}

/// Something that lets the user rewrite a message.
pub trait MessageEditor {
    /// Return the edited text (untrimmed). Notices go through `prompter`.
    fn edit(&self, prompter: &mut dyn Prompter, initial: &str) -> Result<String, FlowError>;
}

/// Edits messages in a validated external editor via a scoped temp file.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    kind: EditorKind,
    rejection: Option<EditorRejection>,
}

impl ExternalEditor {
    pub fn new(kind: EditorKind) -> Self {
        Self { kind, rejection: None }
    }

    /// Validate a configured editor value. A rejected value keeps the
    /// reason so the fallback can be reported when the editor is opened.
    pub fn from_configured(value: Option<&str>) -> Self {
        match EditorKind::from_configured(value) {
            Ok(kind) => Self::new(kind),
            Err(rejection) => Self {
                kind: EditorKind::FALLBACK,
                rejection: Some(rejection),
            },
        }
    }

    /// Resolve the editor from `$EDITOR`.
    pub fn from_env() -> Self {
        let configured = env::var(EDITOR_ENV_VAR).ok();
        Self::from_configured(configured.as_deref())
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn rejection(&self) -> Option<&EditorRejection> {
        self.rejection.as_ref()
    }
}

impl MessageEditor for ExternalEditor {
    fn edit(&self, prompter: &mut dyn Prompter, initial: &str) -> Result<String, FlowError> {
        let program = self.kind.program();
        if let Some(rejection) = &self.rejection {
            prompter.warn(&format!("{}; falling back to {}", rejection, program));
        }
        let editor_err = |reason: String| FlowError::Editor { program, reason };

        let mut file = tempfile::Builder::new()
            .prefix("diffscribe-msg-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| editor_err(format!("could not create message file: {e}")))?;
        write_initial(&mut file, initial)
            .map_err(|e| editor_err(format!("could not write message file: {e}")))?;

        debug!("Opening {} with {}", file.path().display(), program);

        let status = self
            .kind
            .command(file.path())
            .status()
            .map_err(|e| editor_err(format!("could not launch: {e}")))?;

        if !status.success() {
            return Err(editor_err(format!("exited with {status}")));
        }

        std::fs::read_to_string(file.path())
            .map_err(|e| editor_err(format!("could not read message file: {e}")))
    }
}

fn write_initial(file: &mut NamedTempFile, initial: &str) -> std::io::Result<()> {
    file.write_all(initial.as_bytes())?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_allowed_name_resolves() {
        for name in ["nano", "vim", "vi", "emacs", "code", "subl", "gedit"] {
            let kind = EditorKind::from_configured(Some(name)).unwrap();
            assert_eq!(kind.program(), name);
        }
    }

    #[test]
    fn test_resolves_by_base_name() {
        assert_eq!(
            EditorKind::from_configured(Some("/usr/local/bin/vim")),
            Ok(EditorKind::Vim)
        );
        assert_eq!(
            EditorKind::from_configured(Some("code --wait")),
            Ok(EditorKind::Code)
        );
    }

    #[test]
    fn test_unset_is_rejected() {
        assert_eq!(EditorKind::from_configured(None), Err(EditorRejection::Unset));
        assert_eq!(EditorKind::from_configured(Some("  ")), Err(EditorRejection::Unset));
    }

    #[test]
    fn test_unknown_is_rejected() {
        assert_eq!(
            EditorKind::from_configured(Some("/tmp/evil.sh")),
            Err(EditorRejection::NotAllowed("evil.sh".to_string()))
        );
        // Allowed name as a suffix of something else is still unknown
        assert!(EditorKind::from_configured(Some("notvim")).is_err());
    }

    #[test]
    fn test_resolve_falls_back() {
        assert_eq!(EditorKind::resolve(Some("rm -rf /")), EditorKind::FALLBACK);
        assert_eq!(EditorKind::resolve(None), EditorKind::FALLBACK);
        assert_eq!(EditorKind::resolve(Some("nano")), EditorKind::Nano);
    }

    #[test]
    fn test_command_runs_known_program_not_configured_path() {
        let kind = EditorKind::resolve(Some("/opt/weird/bin/vim"));
        let cmd = kind.command(Path::new("/tmp/msg.txt"));
        assert_eq!(cmd.get_program(), "vim");
    }

    #[test]
    fn test_gui_editors_wait() {
        let cmd = EditorKind::Code.command(Path::new("/tmp/msg.txt"));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args[0], "--wait");
    }

    #[test]
    fn test_external_editor_keeps_rejection() {
        let editor = ExternalEditor::from_configured(Some("/tmp/evil.sh"));
        assert_eq!(editor.kind(), EditorKind::FALLBACK);
        assert_eq!(
            editor.rejection(),
            Some(&EditorRejection::NotAllowed("evil.sh".to_string()))
        );

        let editor = ExternalEditor::from_configured(Some("emacs"));
        assert_eq!(editor.kind(), EditorKind::Emacs);
        assert!(editor.rejection().is_none());
    }
}
