//! Blocking dialogs (`alert` / `prompt`).

use std::collections::VecDeque;
use std::fmt::Debug;
use std::io::{self, BufRead, Write};
use std::sync::{Mutex, PoisonError};

/// Modal dialogs the page can raise.
///
/// Both calls block the calling handler until the user answers, just like
/// the browser functions they stand in for.
pub trait Dialogs: Send + Sync + Debug {
    /// Show a message and wait for acknowledgement.
    fn alert(&self, message: &str);

    /// Ask for a line of text. `None` means the dialog was cancelled.
    fn prompt(&self, message: &str) -> Option<String>;
}

/// Dialogs answered from a queue of canned responses.
///
/// Every alert and prompt text is recorded for inspection.
#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    answers: Mutex<VecDeque<Option<String>>>,
    alerts: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next `prompt` call.
    #[must_use]
    pub fn with_answer(self, answer: Option<&str>) -> Self {
        self.push_answer(answer.map(str::to_string));
        self
    }

    pub fn push_answer(&self, answer: Option<String>) {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    /// Alert messages in the order they were raised.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Prompt messages in the order they were raised.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Dialogs for ScriptedDialogs {
    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }

    fn prompt(&self, message: &str) -> Option<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
        // An empty queue behaves like pressing Cancel.
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .flatten()
    }
}

/// Dialogs on the terminal: alerts go to stdout, prompts read a line from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDialogs;

impl Dialogs for ConsoleDialogs {
    fn alert(&self, message: &str) {
        println!("[alert] {message}");
    }

    fn prompt(&self, message: &str) -> Option<String> {
        print!("[prompt] {message} ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_in_order() {
        let dialogs = ScriptedDialogs::new()
            .with_answer(Some("a@example.com"))
            .with_answer(None);

        assert_eq!(dialogs.prompt("first").as_deref(), Some("a@example.com"));
        assert_eq!(dialogs.prompt("second"), None);
        assert_eq!(dialogs.prompt("third"), None);
        assert_eq!(dialogs.prompts(), ["first", "second", "third"]);
    }
}
