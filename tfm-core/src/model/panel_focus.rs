//! ``src/model/panel_focus.rs``
//! ============================================================================
//! # `PanelFocus`: which panel is active and where each one is scrolled
//!
//! Three independently focusable lists share one scroll model,
//! [`ScrollState`]. The tree panel's state lives inside the directory cache
//! (a reload replaces the listing but keeps the clamped selection), the
//! other two live here.

/// One of the three focusable panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Panel {
    #[default]
    Tree,
    Shortcuts,
    Drives,
}

impl Panel {
    /// Focus order used by Tab.
    pub const CYCLE: [Self; 3] = [Self::Tree, Self::Drives, Self::Shortcuts];

    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::CYCLE.iter().position(|p| *p == self).unwrap_or(0);
        Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Tree => "Directory Tree",
            Self::Shortcuts => "Shortcuts",
            Self::Drives => "Drives",
        }
    }
}

/// Selection and scroll window of one list.
///
/// Invariant after [`ScrollState::ensure_visible`]:
/// `offset <= selected < offset + max(visible_height, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub selected: usize,
    pub offset: usize,
    pub visible_height: usize,
}

impl ScrollState {
    #[inline]
    fn window(&self) -> usize {
        self.visible_height.max(1)
    }

    /// Scroll the minimum amount that brings `selected` into the window.
    pub fn ensure_visible(&mut self) {
        let window = self.window();
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + window {
            self.offset = self.selected + 1 - window;
        }
    }

    /// Move by `delta`, wrapping around both ends.
    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let len_i = len as isize;
        let current = self.selected.min(len - 1) as isize;
        self.selected = (current + delta).rem_euclid(len_i) as usize;
    }

    /// Keep `selected` inside `0..len` (0 for an empty list).
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn select(&mut self, index: usize, len: usize) {
        self.selected = index;
        self.clamp(len);
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Item index under row `row` of the list area, if there is one.
    #[must_use]
    pub fn item_at(&self, row: usize, len: usize) -> Option<usize> {
        let idx = self.offset + row;
        (row < self.window() && idx < len).then_some(idx)
    }
}

/// Active panel plus the scroll state of the non-tree panels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelFocus {
    active: Panel,
    shortcuts: ScrollState,
    drives: ScrollState,
}

impl PanelFocus {
    #[must_use]
    pub const fn active(&self) -> Panel {
        self.active
    }

    pub fn cycle_focus(&mut self) {
        self.active = self.active.next();
    }

    /// Pointer hover focuses the panel under the cursor.
    pub fn set_active(&mut self, panel: Panel) {
        self.active = panel;
    }

    /// Scroll state for `panel`; the tree's lives with the directory cache.
    pub fn scroll_mut<'a>(&'a mut self, panel: Panel, tree: &'a mut ScrollState) -> &'a mut ScrollState {
        match panel {
            Panel::Tree => tree,
            Panel::Shortcuts => &mut self.shortcuts,
            Panel::Drives => &mut self.drives,
        }
    }

    #[must_use]
    pub const fn shortcuts(&self) -> &ScrollState {
        &self.shortcuts
    }

    #[must_use]
    pub const fn drives(&self) -> &ScrollState {
        &self.drives
    }

    pub fn set_visible_heights(&mut self, shortcuts: usize, drives: usize) {
        self.shortcuts.visible_height = shortcuts;
        self.drives.visible_height = drives;
    }

    /// Re-establish the scroll invariant of one panel.
    pub fn ensure_visible(&mut self, panel: Panel, tree: &mut ScrollState) {
        self.scroll_mut(panel, tree).ensure_visible();
    }

    pub fn ensure_all_visible(&mut self, tree: &mut ScrollState) {
        for panel in Panel::CYCLE {
            self.ensure_visible(panel, tree);
        }
    }
}
