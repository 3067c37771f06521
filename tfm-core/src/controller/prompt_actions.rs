//! ``src/controller/prompt_actions.rs``
//!
//! Keys while a prompt is open: line editing, Esc to cancel and Enter to
//! submit. Submission routes the text by [`PromptKind`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::controller::session::{Flow, Session};
use crate::drives::mount_controller::MountOp;
use crate::model::ui_state::{Prompt, PromptKind};

impl Session {
    pub(crate) async fn handle_prompt_key(&mut self, key: KeyEvent) -> Flow {
        let Some(prompt) = self.ui.prompt.as_mut() else {
            return Flow::Continue;
        };

        match key.code {
            KeyCode::Esc => {
                if let Some(prompt) = self.ui.take_prompt() {
                    self.cancel_prompt(prompt);
                }
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.ui.take_prompt() {
                    return self.submit_prompt(prompt).await;
                }
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(prompt) = self.ui.take_prompt() {
                    self.cancel_prompt(prompt);
                }
            }
            KeyCode::Char(c) => prompt.insert_char(c),
            KeyCode::Backspace => {
                prompt.delete_char_before();
            }
            KeyCode::Delete => {
                prompt.delete_char_at();
            }
            KeyCode::Left => prompt.move_left(),
            KeyCode::Right => prompt.move_right(),
            KeyCode::Home => prompt.move_home(),
            KeyCode::End => prompt.move_end(),
            _ => {}
        }
        Flow::Continue
    }

    fn cancel_prompt(&mut self, prompt: Prompt) {
        debug!(marker = "PROMPT_CANCEL", "{:?}", prompt.kind);
        if let PromptKind::Credential { op, .. } = prompt.kind {
            self.credential_cancelled(op);
        }
    }

    fn credential_cancelled(&mut self, op: MountOp) {
        self.ui.show_warning(match op {
            MountOp::Mount => "Mount cancelled: no password given",
            MountOp::Unmount => "Unmount cancelled: no password given",
        });
    }

    async fn submit_prompt(&mut self, prompt: Prompt) -> Flow {
        let kind = prompt.kind.clone();
        let text = prompt.into_text();

        match kind {
            PromptKind::Create => self.create_entry(&text),
            PromptKind::Rename { from } => self.rename_entry(from, &text),
            PromptKind::Search => self.tree.set_search(&text),
            PromptKind::Command { file } => return Self::command_step(&text, &file),
            PromptKind::Credential { device, op } => {
                if text.is_empty() {
                    self.credential_cancelled(op);
                } else {
                    self.retry_with_credential(&device, op, text).await;
                }
            }
        }
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::controller::session::tests::{Script, press, session_in};

    #[tokio::test]
    async fn prompt_swallows_bound_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(dir.path(), Script::new(vec![])).await;

        session.handle_key(press(KeyCode::Char('/'))).await;
        session.handle_key(press(KeyCode::Char('q'))).await;
        session.handle_key(press(KeyCode::Tab)).await;

        let prompt = session.ui().prompt.as_ref().expect("still open");
        assert_eq!(prompt.text(), "q");
    }

    #[tokio::test]
    async fn cursor_editing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(dir.path(), Script::new(vec![])).await;

        session.handle_key(press(KeyCode::Char('/'))).await;
        for code in [
            KeyCode::Char('a'),
            KeyCode::Char('c'),
            KeyCode::Left,
            KeyCode::Char('b'),
            KeyCode::Home,
            KeyCode::Delete,
            KeyCode::End,
            KeyCode::Char('d'),
        ] {
            session.handle_key(press(code)).await;
        }
        assert_eq!(session.ui().prompt.as_ref().map(|p| p.text()), Some("bcd"));

        session
            .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .await;
        assert!(session.ui().prompt.is_none());
        assert_eq!(session.tree().search(), None);
    }

    #[tokio::test]
    async fn empty_search_clears_the_filter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(dir.path(), Script::new(vec![])).await;
        session.tree.set_search("x");

        session.handle_key(press(KeyCode::Char('/'))).await;
        for _ in 0..3 {
            session.handle_key(press(KeyCode::Backspace)).await;
        }
        session.handle_key(press(KeyCode::Enter)).await;
        assert_eq!(session.tree().search(), None);
    }
}
