//! src/view/ui.rs
//! ============================================================
//! Frame renderer that draws the entire TUI from a borrowed
//! `Session`. Geometry comes from the session's `ScreenLayout`, the same
//! one pointer hit-testing uses. Painting never touches the disk.

use std::time::{Duration, Instant};

use ratatui::prelude::*;
use tracing::{instrument, trace};

use crate::{
    controller::session::Session,
    model::panel_focus::Panel,
    view::components::{
        file_info::FileInfo, input_prompt_overlay::InputPromptOverlay, object_table::ObjectTable,
        preview_pane::PreviewPane, side_panels::SidePanels, status_bar::StatusBar,
    },
};

const SLOW_FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Default)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

#[derive(Debug, Default)]
pub struct UIRenderer {
    stats: RenderStats,
}

impl UIRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, session: &Session) {
        let start = Instant::now();
        let layout = session.layout();
        let focus = session.focus();
        let active = focus.active();

        SidePanels::render_shortcuts(
            f,
            session.shortcuts(),
            *focus.shortcuts(),
            layout,
            active == Panel::Shortcuts,
        );
        SidePanels::render_drives(f, session.drives(), *focus.drives(), layout, active == Panel::Drives);
        ObjectTable::render(f, session.tree(), layout, active == Panel::Tree);
        FileInfo::render(
            f,
            session.tree().selected_entry(),
            session.ui().clipboard.as_ref(),
            layout.info,
        );
        PreviewPane::render(f, session.preview(), layout.preview);
        StatusBar::render(f, layout, session.disk_usage(), session.ui().notification.as_ref());

        if let Some(prompt) = session.ui().prompt.as_ref() {
            InputPromptOverlay::render(f, prompt, layout.area);
        }

        let elapsed = start.elapsed();
        self.stats.frames += 1;
        self.stats.total += elapsed;
        if elapsed > SLOW_FRAME {
            self.stats.slow += 1;
            trace!("slow frame: {:?}", elapsed);
        }
    }
}
