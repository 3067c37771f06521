//! ``src/controller/file_actions.rs``
//!
//! Tree-panel operations on the selected entry. Failures end up on the
//! status line; nothing here aborts the session.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::controller::external::{ExternalStep, build_command, resolve_editor};
use crate::controller::session::{Flow, Session};
use crate::error::AppError;
use crate::fs::file_ops;
use crate::fs::object_info::DirectoryEntry;
use crate::model::ui_state::{ClipMode, Clipboard, Prompt, PromptKind};

impl Session {
    /// Selected tree entry, never the `..` row.
    fn selected_target(&self) -> Option<&DirectoryEntry> {
        self.tree.selected_entry().filter(|e| !e.is_parent())
    }

    fn report(&mut self, result: Result<String, AppError>) {
        match result {
            Ok(message) => self.ui.show_success(message),
            Err(e) => {
                warn!(marker = "FILE_OP_FAILED", "{e}");
                self.ui.show_error(e.to_string());
            }
        }
        self.tree.refresh(true);
        self.preview.invalidate();
    }

    pub(crate) fn delete_selected(&mut self) {
        let Some(entry) = self.selected_target() else {
            return;
        };
        let (path, name) = (entry.path.clone(), entry.name.clone());
        let result = file_ops::delete(&path).map(|()| format!("Deleted: {name}"));
        self.report(result);
    }

    pub(crate) fn edit_selected(&mut self) -> Flow {
        let Some((is_dir, path)) = self.selected_target().map(|e| (e.is_dir, e.path.clone())) else {
            return Flow::Continue;
        };
        if is_dir {
            self.ui.show_warning("Cannot edit a directory");
            return Flow::Continue;
        }
        match resolve_editor(self.config.editor.as_deref()) {
            Some(editor) => Flow::Suspend(ExternalStep::Edit { editor, path }),
            None => {
                self.ui.show_error("No editor found (set `editor` or install nvim, vim or nano)");
                Flow::Continue
            }
        }
    }

    pub(crate) fn copy_selected(&mut self) {
        self.clip(ClipMode::Copy);
    }

    pub(crate) fn cut_selected(&mut self) {
        self.clip(ClipMode::Cut);
    }

    fn clip(&mut self, mode: ClipMode) {
        let Some(entry) = self.selected_target() else {
            return;
        };
        let (path, name) = (entry.path.clone(), entry.name.clone());
        self.ui.clipboard = Some(Clipboard { path, mode });
        self.ui.show_info(match mode {
            ClipMode::Copy => format!("Copied: {name}"),
            ClipMode::Cut => format!("Cut: {name}"),
        });
    }

    /// Paste into the working directory under a name that does not exist
    /// yet. A cut clipboard is consumed.
    pub(crate) fn paste(&mut self) {
        let Some(clipboard) = self.ui.clipboard.clone() else {
            self.ui.show_warning("Clipboard is empty");
            return;
        };
        let target = file_ops::unique_destination(self.tree.cwd(), &clipboard.path);
        let shown = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(marker = "PASTE", "{:?} {} -> {}", clipboard.mode, clipboard.path.display(), target.display());

        let result = match clipboard.mode {
            ClipMode::Copy => file_ops::copy(&clipboard.path, &target).map(|()| format!("Pasted: {shown}")),
            ClipMode::Cut => file_ops::move_to(&clipboard.path, &target).map(|()| {
                self.ui.clipboard = None;
                format!("Moved: {shown}")
            }),
        };
        self.report(result);
    }

    pub(crate) fn prompt_rename(&mut self) {
        let Some(entry) = self.selected_target() else {
            return;
        };
        let prompt = Prompt::new(PromptKind::Rename { from: entry.path.clone() }, "Rename to")
            .with_text(entry.name.as_str());
        self.ui.open_prompt(prompt);
    }

    pub(crate) fn prompt_command(&mut self) {
        let Some(entry) = self.selected_target() else {
            return;
        };
        let kind = PromptKind::Command { file: entry.path.clone() };
        self.ui
            .open_prompt(Prompt::new(kind, "Execute command (use {file} for path)"));
    }

    // ------------------------------------------------------------------------
    // Prompt submissions
    // ------------------------------------------------------------------------

    pub(crate) fn create_entry(&mut self, request: &str) {
        let result = file_ops::parse_new_request(request).and_then(|(kind, name)| {
            file_ops::create(&self.tree.cwd().join(name), kind).map(|()| format!("Created: {name}"))
        });
        self.report(result);
    }

    pub(crate) fn rename_entry(&mut self, from: PathBuf, new_name: &str) {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name.contains('/') {
            self.ui.show_error("Invalid name");
            return;
        }
        let to = from.parent().map_or_else(|| PathBuf::from(new_name), |p| p.join(new_name));
        if to == from {
            return;
        }
        if to.exists() {
            self.ui.show_error(format!("{new_name} already exists"));
            return;
        }
        let result = file_ops::move_to(&from, &to).map(|()| format!("Renamed to {new_name}"));
        self.report(result);
    }

    pub(crate) fn command_step(template: &str, file: &std::path::Path) -> Flow {
        let template = template.trim();
        if template.is_empty() {
            return Flow::Continue;
        }
        Flow::Suspend(ExternalStep::RunCommand {
            command: build_command(template, file),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crossterm::event::KeyCode;

    use crate::controller::external::ExternalStep;
    use crate::controller::session::tests::{Script, press, session_in};
    use crate::controller::session::{Flow, Session};
    use crate::model::panel_focus::Panel;
    use crate::util::humanize::shell_quote;

    async fn session(dir: &std::path::Path) -> Session {
        session_in(dir, Script::new(vec![])).await
    }

    fn select(session: &mut Session, name: &str) {
        let index = session
            .tree()
            .entries()
            .iter()
            .position(|e| e.name == name)
            .expect("entry listed");
        session.tree.select(index);
    }

    async fn type_line(session: &mut Session, text: &str) -> Flow {
        for c in text.chars() {
            session.handle_key(press(KeyCode::Char(c))).await;
        }
        session.handle_key(press(KeyCode::Enter)).await
    }

    #[tokio::test]
    async fn delete_removes_without_confirmation() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "x").expect("write");
        fs::create_dir_all(dir.path().join("sub/inner")).expect("mkdir");
        let mut session = session(dir.path()).await;

        select(&mut session, "sub");
        session.handle_key(press(KeyCode::Char('d'))).await;
        assert!(!dir.path().join("sub").exists());

        select(&mut session, "a.txt");
        session.handle_key(press(KeyCode::Char('d'))).await;
        assert!(!dir.path().join("a.txt").exists());
        assert_eq!(session.tree().entries().len(), 1);
    }

    #[tokio::test]
    async fn delete_skips_the_parent_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session(dir.path()).await;
        session.handle_key(press(KeyCode::Char('d'))).await;
        assert!(dir.path().exists());
    }

    #[tokio::test]
    async fn file_keys_need_tree_focus() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "x").expect("write");
        let mut session = session(dir.path()).await;
        select(&mut session, "a.txt");

        session.focus.set_active(Panel::Shortcuts);
        session.handle_key(press(KeyCode::Char('d'))).await;
        assert!(dir.path().join("a.txt").exists());
    }

    #[tokio::test]
    async fn create_file_and_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session(dir.path()).await;

        session.handle_key(press(KeyCode::Char('n'))).await;
        type_line(&mut session, "f todo.md").await;
        assert!(dir.path().join("todo.md").is_file());

        session.handle_key(press(KeyCode::Char('n'))).await;
        type_line(&mut session, "d build").await;
        assert!(dir.path().join("build").is_dir());

        session.handle_key(press(KeyCode::Char('n'))).await;
        type_line(&mut session, "oops").await;
        assert!(session.ui().notification.is_some());
        assert_eq!(session.tree().entries().len(), 3);
    }

    #[tokio::test]
    async fn copy_twice_gets_a_numbered_name() {
        let src = tempfile::tempdir().expect("src");
        fs::write(src.path().join("report.txt"), "data").expect("write");
        let mut session = session(src.path()).await;

        select(&mut session, "report.txt");
        session.handle_key(press(KeyCode::Char('c'))).await;
        session.handle_key(press(KeyCode::Char('v'))).await;

        assert_eq!(fs::read_to_string(src.path().join("report_1.txt")).expect("copy"), "data");
        assert!(session.ui().clipboard.is_some());
    }

    #[tokio::test]
    async fn cut_and_paste_moves_and_clears() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "x").expect("write");
        fs::create_dir(dir.path().join("dest")).expect("mkdir");
        let mut session = session(dir.path()).await;

        select(&mut session, "a.txt");
        session.handle_key(press(KeyCode::Char('x'))).await;
        select(&mut session, "dest");
        session.handle_key(press(KeyCode::Enter)).await;
        session.handle_key(press(KeyCode::Char('v'))).await;

        assert!(dir.path().join("dest/a.txt").exists());
        assert!(!dir.path().join("a.txt").exists());
        assert!(session.ui().clipboard.is_none());
    }

    #[tokio::test]
    async fn rename_prefills_the_current_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("old.txt"), "x").expect("write");
        let mut session = session(dir.path()).await;

        select(&mut session, "old.txt");
        session.handle_key(press(KeyCode::Char('r'))).await;
        assert_eq!(session.ui().prompt.as_ref().map(|p| p.text()), Some("old.txt"));

        for _ in 0.."old.txt".len() {
            session.handle_key(press(KeyCode::Backspace)).await;
        }
        type_line(&mut session, "new.txt").await;
        assert!(dir.path().join("new.txt").exists());
        assert!(!dir.path().join("old.txt").exists());
    }

    #[tokio::test]
    async fn command_prompt_suspends_with_the_quoted_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "x").expect("write");
        let mut session = session(dir.path()).await;

        select(&mut session, "a.txt");
        session.handle_key(press(KeyCode::Char(':'))).await;
        let flow = type_line(&mut session, "wc -l {file}").await;

        let file = dir.path().join("a.txt");
        let expected = format!("wc -l {}", shell_quote(&file.to_string_lossy()));
        assert_eq!(flow, Flow::Suspend(ExternalStep::RunCommand { command: expected }));
    }

    #[tokio::test]
    async fn edit_refuses_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        let mut session = session(dir.path()).await;

        select(&mut session, "sub");
        assert_eq!(session.handle_key(press(KeyCode::Char('e'))).await, Flow::Continue);
        assert!(session.ui().notification.is_some());
    }
}
