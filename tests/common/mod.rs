//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::time::Duration;

use git2::{Oid, Repository, Signature};

use diffscribe::config::ApiKey;
use diffscribe::{FlowError, HttpCompletionClient, MessageEditor, Prompter, Settings};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new git repository in a temp directory with identity configured
    /// for the `git` binary.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config.set_str("user.name", "Test User").expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");
        config
            .set_bool("commit.gpgsign", false)
            .expect("Failed to disable signing");

        Self { dir, repo }
    }

    /// Create a new repository with one initial commit.
    pub fn with_initial_commit() -> Self {
        let repo = Self::new();
        repo.stage("README.md", "# test\n");
        repo.commit("chore: initial commit");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write a file and add it to the index.
    pub fn stage(&self, name: &str, content: &str) {
        let file_path = self.dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Commit the current index. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let sig = self.signature();
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Number of commits reachable from HEAD (0 for an unborn branch).
    pub fn commit_count(&self) -> usize {
        if self.repo.head().is_err() {
            return 0;
        }
        let mut walk = self.repo.revwalk().expect("Failed to create revwalk");
        walk.push_head().expect("Failed to push HEAD");
        walk.count()
    }

    pub fn head_id(&self) -> Oid {
        self.repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map(|c| c.id())
            .expect("Failed to resolve HEAD")
    }

    /// HEAD message with git's trailing newline removed.
    pub fn head_message(&self) -> String {
        let commit = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("Failed to resolve HEAD");
        commit.message().unwrap_or_default().trim_end().to_string()
    }
}

/// Prompter that replays a fixed sequence of keystrokes.
pub struct ScriptedPrompter {
    keys: VecDeque<char>,
    pub output: Vec<String>,
    pub warnings: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(keys: &str) -> Self {
        Self {
            keys: keys.chars().collect(),
            output: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn say(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn warn(&mut self, text: &str) {
        self.warnings.push(text.to_string());
    }

    fn read_key(&mut self, _prompt: &str) -> io::Result<char> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted keys"))
    }
}

/// Editor that replaces the message with fixed text and records its input.
pub struct FixedEditor {
    result: String,
    pub seen: RefCell<Vec<String>>,
}

impl FixedEditor {
    pub fn returning(result: &str) -> Self {
        Self {
            result: result.to_string(),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl MessageEditor for FixedEditor {
    fn edit(&self, _prompter: &mut dyn Prompter, initial: &str) -> Result<String, FlowError> {
        self.seen.borrow_mut().push(initial.to_string());
        Ok(self.result.clone())
    }
}

/// Settings pointing at a mock server's completion route.
pub fn mock_settings(base_uri: &str) -> Settings {
    Settings {
        api_url: format!("{}/v1/chat/completions", base_uri),
        api_key: ApiKey::new("test-key"),
        model: "test-model".to_string(),
        timeout: Duration::from_secs(5),
    }
}

pub fn mock_client(base_uri: &str) -> HttpCompletionClient {
    HttpCompletionClient::new(&mock_settings(base_uri)).expect("Failed to build client")
}

/// A successful chat-completions response body.
pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
}
