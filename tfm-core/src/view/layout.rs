//! ``src/view/layout.rs``
//!
//! Screen geometry shared by the renderer and pointer hit-testing, so a
//! click always resolves against what was actually drawn.
//!
//! ```text
//! ┌Shortcuts──┐┌Directory Tree─────────────┐┌File Info──┐
//! │           ││ /path                     ││           │
//! ├Drives─────┤│───────────────────────────││           │
//! │           ││ entries…                  ││           │
//! └───────────┘└───────────────────────────┘└───────────┘
//! ┌Preview──────────────────────────────────────────────┐
//! └─────────────────────────────────────────┌───────────┐
//!  disk usage                               │ U: Update │
//!  hot words                                └───────────┘
//! ```

use ratatui::layout::{Position, Rect};

use crate::model::panel_focus::Panel;

pub const SHORTCUTS_WIDTH: u16 = 25;
pub const INFO_WIDTH: u16 = 30;
pub const MAX_SHORTCUTS_HEIGHT: u16 = 8;
pub const UPDATE_BUTTON_WIDTH: u16 = 21;
pub const UPDATE_BUTTON_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub area: Rect,
    pub shortcuts: Rect,
    /// Zero height when the top half is too short for it.
    pub drives: Rect,
    pub tree: Rect,
    pub info: Rect,
    pub preview: Rect,
    pub disk_line: Rect,
    pub status_line: Rect,
    pub update_button: Rect,
    /// Rows between the tree's top border and its first entry row: the
    /// path, the search line when a search is active, and a separator.
    pub tree_header_rows: u16,
}

impl ScreenLayout {
    #[must_use]
    pub fn compute(area: Rect, search_active: bool) -> Self {
        let Rect { x, y, width, height } = area;

        let top_height = height / 2;
        let shortcuts_height = top_height.min(MAX_SHORTCUTS_HEIGHT);
        let drives_height = match top_height - shortcuts_height {
            h if h > 2 => h,
            _ => 0,
        };

        let tree_width = width.saturating_sub(SHORTCUTS_WIDTH + INFO_WIDTH + 3);
        let tree_x = x + SHORTCUTS_WIDTH + 1;
        let info_x = tree_x + tree_width + 1;

        let bottom_y = y + top_height;
        let preview_height = height.saturating_sub(top_height + 3);

        Self {
            area,
            shortcuts: Rect::new(x, y, SHORTCUTS_WIDTH.min(width), shortcuts_height),
            drives: Rect::new(x, y + shortcuts_height, SHORTCUTS_WIDTH.min(width), drives_height),
            tree: Rect::new(tree_x, y, tree_width, top_height),
            info: Rect::new(info_x, y, INFO_WIDTH.min(width.saturating_sub(info_x - x)), top_height),
            preview: Rect::new(x, bottom_y, width, preview_height),
            disk_line: Rect::new(x, y + height.saturating_sub(2), width, height.min(2) / 2),
            status_line: Rect::new(x, y + height.saturating_sub(1), width, height.min(1)),
            update_button: Rect::new(
                x + width.saturating_sub(UPDATE_BUTTON_WIDTH),
                y + height.saturating_sub(UPDATE_BUTTON_HEIGHT),
                UPDATE_BUTTON_WIDTH.min(width),
                UPDATE_BUTTON_HEIGHT.min(height),
            ),
            tree_header_rows: if search_active { 3 } else { 2 },
        }
    }

    #[must_use]
    pub const fn panel_rect(&self, panel: Panel) -> Rect {
        match panel {
            Panel::Tree => self.tree,
            Panel::Shortcuts => self.shortcuts,
            Panel::Drives => self.drives,
        }
    }

    /// Rows where list items are drawn inside `panel`.
    #[must_use]
    pub fn list_area(&self, panel: Panel) -> Rect {
        let rect = self.panel_rect(panel);
        let top = 1 + if panel == Panel::Tree { self.tree_header_rows } else { 0 };
        let height = rect.height.saturating_sub(top + 1);
        Rect::new(
            rect.x.saturating_add(1),
            rect.y + top.min(rect.height),
            rect.width.saturating_sub(2),
            height,
        )
    }

    #[must_use]
    pub fn visible_height(&self, panel: Panel) -> usize {
        usize::from(self.list_area(panel).height)
    }

    /// Panel under the cursor.
    #[must_use]
    pub fn panel_at(&self, column: u16, row: u16) -> Option<Panel> {
        let pos = Position::new(column, row);
        [Panel::Shortcuts, Panel::Drives, Panel::Tree]
            .into_iter()
            .find(|p| self.panel_rect(*p).contains(pos))
    }

    /// Item row (0-based, before scroll offset) under the cursor.
    #[must_use]
    pub fn list_row(&self, panel: Panel, row: u16) -> Option<usize> {
        let list = self.list_area(panel);
        (row >= list.y && row < list.bottom()).then(|| usize::from(row - list.y))
    }

    #[must_use]
    pub fn in_update_button(&self, column: u16, row: u16) -> bool {
        self.update_button.contains(Position::new(column, row))
    }
}
