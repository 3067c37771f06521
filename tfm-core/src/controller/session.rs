//! ``src/controller/session.rs``
//! ============================================================================
//! # `Session`: the interactive state machine
//!
//! One value owns every piece of mutable state: the directory cache, panel
//! focus, pointer state, drive controller, prompt, clipboard and status
//! line. Each input is applied to completion by one `handle_*` call, which
//! ends by re-establishing the scroll invariant of every panel and returns a
//! [`Flow`] telling the loop whether to keep going, quit, or hand the
//! terminal to an [`ExternalStep`].
//!
//! File operations live in `file_actions.rs`, drive operations in
//! `drive_actions.rs` and prompt handling in `prompt_actions.rs`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::config::Config;
use crate::controller::actions::Action;
use crate::controller::external::ExternalStep;
use crate::controller::keymap::Keymap;
use crate::controller::pointer::{Gesture, PanelHit, PointerAction, PointerDisambiguator, PointerKind, hot_word_at};
use crate::drives::drive::Drive;
use crate::drives::helper::HelperRunner;
use crate::drives::mount_controller::MountController;
use crate::drives::usage::{DiskUsage, disk_usage_for};
use crate::error::AppError;
use crate::fs::dir_scanner::OsDirSource;
use crate::fs::preview::Preview;
use crate::model::dir_cache::DirectoryCache;
use crate::model::panel_focus::{Panel, PanelFocus, ScrollState};
use crate::model::shortcut::Shortcut;
use crate::model::ui_state::{Prompt, PromptKind, UIState};
use crate::view::layout::ScreenLayout;

/// What the event loop does after an input was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// Release the terminal, run the step, then call [`Session::resume`].
    Suspend(ExternalStep),
}

pub struct Session {
    pub(crate) config: Config,
    pub(crate) tree: DirectoryCache,
    pub(crate) focus: PanelFocus,
    pointer: PointerDisambiguator,
    pub(crate) mounts: MountController,
    pub(crate) shortcuts: Vec<Shortcut>,
    pub(crate) ui: UIState,
    keymap: Keymap,
    area: Rect,
    layout: ScreenLayout,
    pub(crate) preview: Preview,
    disk_usage: Option<DiskUsage>,
    last_background_refresh: Instant,
    pub(crate) home: PathBuf,
}

impl Session {
    /// Load `start_dir`, enumerate drives and measure disk usage.
    pub async fn new(
        config: Config,
        start_dir: PathBuf,
        home: PathBuf,
        runner: Arc<dyn HelperRunner>,
    ) -> Self {
        info!(marker = "SESSION_START", "starting in {}", start_dir.display());

        let tree = DirectoryCache::new(OsDirSource, start_dir, config.show_hidden);
        let mounts = MountController::new(
            runner,
            config.mount.clone(),
            config.timing.drive_refresh_interval,
        );
        let shortcuts = Shortcut::resolve_all(&config.shortcuts, &home);

        let mut session = Self {
            pointer: PointerDisambiguator::new(config.timing.double_click_window),
            ui: UIState::new(config.timing.message_duration),
            config,
            tree,
            focus: PanelFocus::default(),
            mounts,
            shortcuts,
            keymap: Keymap::new(),
            area: Rect::default(),
            layout: ScreenLayout::default(),
            preview: Preview::default(),
            disk_usage: None,
            last_background_refresh: Instant::now(),
            home,
        };

        session.mounts.list_drives(true).await;
        session.refresh_disk_usage();
        session.settle();
        session
    }

    // ------------------------------------------------------------------------
    // Read access for the renderer
    // ------------------------------------------------------------------------

    #[must_use]
    pub const fn tree(&self) -> &DirectoryCache {
        &self.tree
    }

    #[must_use]
    pub const fn focus(&self) -> &PanelFocus {
        &self.focus
    }

    #[must_use]
    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    #[must_use]
    pub fn drives(&self) -> &[Drive] {
        self.mounts.drives()
    }

    #[must_use]
    pub const fn ui(&self) -> &UIState {
        &self.ui
    }

    #[must_use]
    pub const fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    #[must_use]
    pub const fn preview(&self) -> &Preview {
        &self.preview
    }

    #[must_use]
    pub const fn disk_usage(&self) -> Option<&DiskUsage> {
        self.disk_usage.as_ref()
    }

    // ------------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------------

    pub async fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        let flow = if self.ui.prompt.is_some() {
            self.handle_prompt_key(key).await
        } else {
            match self.keymap.lookup(&key) {
                Some(action) => self.dispatch(action).await,
                None => Flow::Continue,
            }
        };

        self.settle();
        flow
    }

    pub async fn handle_mouse(&mut self, event: MouseEvent) -> Flow {
        let flow = self.route_mouse(event).await;
        self.settle();
        flow
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        self.settle();
    }

    /// Called once per loop iteration; does the periodic background refresh
    /// when it is due and expires the status message.
    pub async fn tick(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_background_refresh) >= self.config.timing.background_refresh {
            self.last_background_refresh = now;
            if self.tree.refresh(false) {
                self.preview.invalidate();
            }
            self.mounts.list_drives(false).await;
            self.refresh_disk_usage();
            debug!(marker = "BACKGROUND_REFRESH", "periodic refresh done");
        }

        self.ui.update_notification(now);
        self.settle();
    }

    /// Back from an external step: report it and reload everything it may
    /// have changed.
    pub fn resume(&mut self, outcome: Result<String, AppError>) {
        match outcome {
            Ok(message) => self.ui.show_info(message),
            Err(e) => self.ui.show_error(e.to_string()),
        }
        self.tree.refresh(true);
        self.preview.invalidate();
        self.refresh_disk_usage();
        self.settle();
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    pub async fn dispatch(&mut self, action: Action) -> Flow {
        let active = self.focus.active();
        debug!(marker = "ACTION", "{action:?} on {active:?}");

        if action.needs_tree_focus() && active != Panel::Tree {
            return Flow::Continue;
        }

        match action {
            Action::Quit => return Flow::Quit,
            Action::CycleFocus => self.focus.cycle_focus(),
            Action::MoveSelectionUp => self.move_selection(active, -1),
            Action::MoveSelectionDown => self.move_selection(active, 1),
            Action::Activate => return self.activate(active).await,
            Action::GoToParent => {
                if active == Panel::Tree {
                    self.tree.ascend();
                }
            }

            Action::Delete => self.delete_selected(),
            Action::CreateEntry => self
                .ui
                .open_prompt(Prompt::new(PromptKind::Create, "Create (f:file d:directory) name")),
            Action::Edit => return self.edit_selected(),
            Action::Copy => self.copy_selected(),
            Action::Cut => self.cut_selected(),
            Action::Paste => self.paste(),
            Action::Rename => self.prompt_rename(),
            Action::RunCommand => self.prompt_command(),

            Action::Search => {
                let current = self.tree.search().unwrap_or_default().to_string();
                self.ui
                    .open_prompt(Prompt::new(PromptKind::Search, "Search files").with_text(current));
            }
            Action::ClearSearch => {
                if self.tree.search().is_some() {
                    self.tree.set_search("");
                }
            }
            Action::ToggleHidden => {
                self.tree.toggle_hidden();
                let state = if self.tree.show_hidden() { "shown" } else { "hidden" };
                self.ui.show_info(format!("Hidden files: {state}"));
            }

            Action::Unmount => {
                if active == Panel::Drives {
                    self.unmount_selected().await;
                }
            }
            Action::CheckForUpdate => return self.check_for_update(),
        }

        Flow::Continue
    }

    /// Enter / double-click on the selected item of `panel`.
    async fn activate(&mut self, panel: Panel) -> Flow {
        match panel {
            Panel::Tree => {
                self.tree.enter();
            }
            Panel::Shortcuts => self.open_selected_shortcut(),
            Panel::Drives => self.activate_selected_drive().await,
        }
        Flow::Continue
    }

    fn open_selected_shortcut(&mut self) {
        let Some(shortcut) = self.shortcuts.get(self.focus.shortcuts().selected).cloned() else {
            return;
        };
        if shortcut.exists() {
            self.tree.open(shortcut.path);
        } else {
            self.ui.show_warning(format!("Path does not exist: {}", shortcut.label));
        }
    }

    fn check_for_update(&mut self) -> Flow {
        match self.config.update_command.as_deref().map(str::trim) {
            Some(command) if !command.is_empty() => Flow::Suspend(ExternalStep::CheckForUpdates {
                command: command.to_string(),
            }),
            _ => {
                self.ui.show_warning("No update command configured");
                Flow::Continue
            }
        }
    }

    // ------------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------------

    async fn route_mouse(&mut self, event: MouseEvent) -> Flow {
        if self.ui.prompt.is_some() {
            return Flow::Continue;
        }
        let Some(kind) = PointerKind::from_mouse(event.kind) else {
            return Flow::Continue;
        };
        let (column, row) = (event.column, event.row);
        let gesture = self.pointer.gesture(kind);
        let clicked = matches!(gesture, Some(Gesture::Click { .. }));

        let status = self.layout.status_line;
        if status.height > 0 && row == status.y {
            if let Some(c) = hot_word_at(status.x, status.width, column) {
                return match self.keymap.for_char(c) {
                    Some(action) if clicked => self.dispatch(action).await,
                    _ => Flow::Continue,
                };
            }
        }

        if self.layout.in_update_button(column, row) {
            return if clicked {
                self.dispatch(Action::CheckForUpdate).await
            } else {
                Flow::Continue
            };
        }

        let Some(panel) = self.layout.panel_at(column, row) else {
            return Flow::Continue;
        };
        self.focus.set_active(panel);

        let len = self.list_len(panel);
        let scroll = *self.scroll(panel);
        let item = self
            .layout
            .list_row(panel, row)
            .and_then(|r| scroll.item_at(r, len));

        let action = self
            .pointer
            .classify_gesture(Some(PanelHit { panel, item }), gesture, Instant::now());
        match action {
            PointerAction::Hover(i) => self.scroll(panel).select(i, len),
            PointerAction::Activate(i) => {
                self.scroll(panel).select(i, len);
                return self.activate(panel).await;
            }
            PointerAction::ScrollUp => self.move_selection(panel, -1),
            PointerAction::ScrollDown => self.move_selection(panel, 1),
            PointerAction::None => {}
        }
        Flow::Continue
    }

    // ------------------------------------------------------------------------
    // Panel helpers
    // ------------------------------------------------------------------------

    pub(crate) fn list_len(&self, panel: Panel) -> usize {
        match panel {
            Panel::Tree => self.tree.entries().len(),
            Panel::Shortcuts => self.shortcuts.len(),
            Panel::Drives => self.mounts.drives().len(),
        }
    }

    fn scroll(&mut self, panel: Panel) -> &mut ScrollState {
        self.focus.scroll_mut(panel, &mut self.tree.scroll)
    }

    fn move_selection(&mut self, panel: Panel, delta: isize) {
        let len = self.list_len(panel);
        self.scroll(panel).move_by(delta, len);
    }

    pub(crate) fn selected_drive(&self) -> Option<Drive> {
        self.mounts.drives().get(self.focus.drives().selected).cloned()
    }

    /// Go back to the home directory if the working directory lives under
    /// `mount_point`. Returns whether it did.
    pub(crate) fn leave_mount_point(&mut self, mount_point: &Path) -> bool {
        if self.tree.cwd().starts_with(mount_point) {
            self.tree.open(self.home.clone());
            return true;
        }
        false
    }

    pub(crate) fn refresh_disk_usage(&mut self) {
        self.disk_usage = disk_usage_for(self.tree.cwd());
    }

    /// Re-establish every invariant the renderer relies on.
    fn settle(&mut self) {
        self.layout = ScreenLayout::compute(self.area, self.tree.search().is_some());
        self.tree.scroll.visible_height = self.layout.visible_height(Panel::Tree);
        self.focus.set_visible_heights(
            self.layout.visible_height(Panel::Shortcuts),
            self.layout.visible_height(Panel::Drives),
        );

        for panel in [Panel::Shortcuts, Panel::Drives] {
            let len = self.list_len(panel);
            self.scroll(panel).clamp(len);
        }
        self.focus.ensure_all_visible(&mut self.tree.scroll);
        self.preview.sync(self.tree.selected_entry());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};

    use crate::drives::helper::{HelperInvocation, HelperOutput, RunError};

    pub(crate) const LSBLK: &str = r#"{"blockdevices":[{"name":"sdb","type":"disk","size":8,
        "children":[{"name":"sdb1","type":"part","size":8,"mountpoint":null,"label":"USB"}]}]}"#;

    /// Replays scripted helper results; unscripted calls fail.
    #[derive(Default)]
    pub(crate) struct Script {
        results: Mutex<VecDeque<Result<HelperOutput, RunError>>>,
        pub(crate) calls: Mutex<Vec<HelperInvocation>>,
    }

    impl Script {
        pub(crate) fn new(results: Vec<Result<HelperOutput, RunError>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.into()),
                calls: Mutex::default(),
            })
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl HelperRunner for Script {
        async fn run(&self, invocation: &HelperInvocation) -> Result<HelperOutput, RunError> {
            self.calls.lock().expect("calls").push(invocation.clone());
            self.results
                .lock()
                .expect("results")
                .pop_front()
                .unwrap_or_else(|| Ok(output(false, "", "unscripted")))
        }
    }

    pub(crate) fn output(success: bool, stdout: &str, stderr: &str) -> HelperOutput {
        HelperOutput {
            success,
            code: Some(i32::from(!success)),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    pub(crate) async fn session_in(dir: &Path, script: Arc<Script>) -> Session {
        let mut session = Session::new(Config::default(), dir.to_path_buf(), dir.to_path_buf(), script).await;
        session.resize(120, 40);
        session
    }

    pub(crate) fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub(crate) fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("alpha")).expect("mkdir");
        std::fs::create_dir(dir.path().join("beta")).expect("mkdir");
        std::fs::write(dir.path().join("notes.txt"), "hello\nworld\n").expect("write");
        dir
    }

    #[tokio::test]
    async fn tab_cycles_focus_and_q_quits() {
        let dir = fixture();
        let mut session = session_in(dir.path(), Script::new(vec![Ok(output(true, LSBLK, ""))])).await;

        assert_eq!(session.focus().active(), Panel::Tree);
        session.handle_key(press(KeyCode::Tab)).await;
        assert_eq!(session.focus().active(), Panel::Drives);
        session.handle_key(press(KeyCode::Tab)).await;
        assert_eq!(session.focus().active(), Panel::Shortcuts);

        assert_eq!(session.handle_key(press(KeyCode::Char('q'))).await, Flow::Quit);
    }

    #[tokio::test]
    async fn arrows_move_the_active_panel_only() {
        let dir = fixture();
        let mut session = session_in(dir.path(), Script::new(vec![Ok(output(true, LSBLK, ""))])).await;

        session.handle_key(press(KeyCode::Up)).await;
        assert_eq!(session.tree().selected(), session.tree().entries().len() - 1);
        assert_eq!(session.focus().shortcuts().selected, 0);

        session.focus.set_active(Panel::Shortcuts);
        session.handle_key(press(KeyCode::Down)).await;
        assert_eq!(session.focus().shortcuts().selected, 1);
    }

    #[tokio::test]
    async fn enter_and_left_navigate_the_tree() {
        let dir = fixture();
        let mut session = session_in(dir.path(), Script::new(vec![])).await;

        let names: Vec<&str> = session.tree().entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["..", "alpha", "beta", "notes.txt"]);

        session.handle_key(press(KeyCode::Down)).await;
        session.handle_key(press(KeyCode::Enter)).await;
        assert_eq!(session.tree().cwd(), dir.path().join("alpha"));

        session.handle_key(press(KeyCode::Left)).await;
        assert_eq!(session.tree().cwd(), dir.path());
    }

    #[tokio::test]
    async fn double_click_enters_a_directory() {
        let dir = fixture();
        let mut session = session_in(dir.path(), Script::new(vec![])).await;
        let row = session.layout().list_area(Panel::Tree).y + 2;

        session.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40, row)).await;
        assert_eq!(session.tree().selected(), 2);
        assert_eq!(session.tree().cwd(), dir.path());

        session.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40, row)).await;
        assert_eq!(session.tree().cwd(), dir.path().join("beta"));
    }

    #[tokio::test]
    async fn pointer_focuses_the_panel_under_it() {
        let dir = fixture();
        let mut session = session_in(dir.path(), Script::new(vec![])).await;

        session.handle_mouse(mouse(MouseEventKind::Moved, 3, 2)).await;
        assert_eq!(session.focus().active(), Panel::Shortcuts);

        session.handle_mouse(mouse(MouseEventKind::ScrollDown, 40, 10)).await;
        assert_eq!(session.focus().active(), Panel::Tree);
        assert_eq!(session.tree().selected(), 1);
    }

    #[tokio::test]
    async fn clicking_a_hot_word_runs_its_command() {
        let dir = fixture();
        let mut session = session_in(dir.path(), Script::new(vec![])).await;
        assert!(!session.tree().show_hidden());

        let h_column = crate::controller::pointer::hot_words(0, 120)
            .into_iter()
            .find(|w| w.key == 'h')
            .map(|w| w.columns.start)
            .expect("hidden hint fits");
        session.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), h_column, 39)).await;
        assert!(session.tree().show_hidden());
    }

    #[tokio::test]
    async fn search_prompt_filters_and_escape_clears() {
        let dir = fixture();
        let mut session = session_in(dir.path(), Script::new(vec![])).await;

        session.handle_key(press(KeyCode::Char('/'))).await;
        for c in "ALP".chars() {
            session.handle_key(press(KeyCode::Char(c))).await;
        }
        session.handle_key(press(KeyCode::Enter)).await;

        assert_eq!(session.tree().search(), Some("ALP"));
        assert_eq!(session.tree().entries().len(), 2);
        assert_eq!(session.layout().tree_header_rows, 3);

        session.handle_key(press(KeyCode::Esc)).await;
        assert_eq!(session.tree().search(), None);
        assert_eq!(session.tree().entries().len(), 4);
    }

    #[tokio::test]
    async fn missing_shortcut_reports_instead_of_opening() {
        let dir = fixture();
        let mut session = session_in(dir.path(), Script::new(vec![])).await;
        session.focus.set_active(Panel::Shortcuts);

        session.handle_key(press(KeyCode::Enter)).await;
        assert_eq!(session.tree().cwd(), dir.path());
        let message = session.ui().notification.as_ref().map(|n| n.message.to_string());
        assert_eq!(message.as_deref(), Some("Path does not exist: Downloads"));
    }

    #[tokio::test]
    async fn update_without_command_is_a_message() {
        let dir = fixture();
        let mut session = session_in(dir.path(), Script::new(vec![])).await;
        assert_eq!(session.handle_key(press(KeyCode::Char('U'))).await, Flow::Continue);
        assert!(session.ui().notification.is_some());

        session.config.update_command = Some("git pull".to_string());
        assert_eq!(
            session.handle_key(press(KeyCode::Char('U'))).await,
            Flow::Suspend(ExternalStep::CheckForUpdates {
                command: "git pull".to_string()
            })
        );
    }

    #[tokio::test]
    async fn resume_reloads_and_reports() {
        let dir = fixture();
        let mut session = session_in(dir.path(), Script::new(vec![])).await;
        std::fs::write(dir.path().join("zz.txt"), "").expect("write");

        session.resume(Ok("Edited with vim".to_string()));
        assert_eq!(session.tree().entries().len(), 5);
        let message = session.ui().notification.as_ref().map(|n| n.message.to_string());
        assert_eq!(message.as_deref(), Some("Edited with vim"));
    }

    #[tokio::test]
    async fn selection_stays_visible_after_every_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        for i in 0..40 {
            std::fs::write(dir.path().join(format!("f{i:02}")), "").expect("write");
        }
        let mut session = session_in(dir.path(), Script::new(vec![])).await;

        session.handle_key(press(KeyCode::Up)).await;
        let scroll = session.tree().scroll;
        assert_eq!(scroll.selected, 40);
        assert!(scroll.offset <= scroll.selected && scroll.selected < scroll.offset + scroll.visible_height);

        session.resize(120, 20);
        let scroll = session.tree().scroll;
        assert!(scroll.offset <= scroll.selected && scroll.selected < scroll.offset + scroll.visible_height);
    }

    #[tokio::test]
    async fn background_refresh_waits_for_its_interval() {
        let dir = fixture();
        let script = Script::new(vec![Ok(output(true, LSBLK, "")), Ok(output(true, LSBLK, ""))]);
        let mut session = session_in(dir.path(), script.clone()).await;

        session.tick().await;
        assert_eq!(script.call_count(), 1);

        session.config.timing.background_refresh = Duration::ZERO;
        session.mounts = MountController::new(script.clone(), Default::default(), Duration::ZERO);
        session.tick().await;
        assert_eq!(script.call_count(), 2);
    }
}
