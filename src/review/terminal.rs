//! Terminal-backed [`Prompter`].

use std::io::{self, BufRead};

use dialoguer::console::{Term, style};

use super::Prompter;

/// Reads single keystrokes from the attended terminal.
///
/// When stdin is not a terminal (piped input), one line is read per prompt
/// and its first character is used.
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self { term: Term::stdout() }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn say(&mut self, text: &str) {
        println!("{}", text);
    }

    fn warn(&mut self, text: &str) {
        eprintln!("{} {}", style("Warning:").yellow().bold(), text);
    }

    fn read_key(&mut self, prompt: &str) -> io::Result<char> {
        if self.term.is_term() {
            self.term.write_str(prompt)?;
            let key = self.term.read_char()?;
            self.term.write_line(&key.to_string())?;
            return Ok(key);
        }

        print!("{}", prompt);
        io::Write::flush(&mut io::stdout())?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.chars().next().unwrap_or('\n'))
    }
}
