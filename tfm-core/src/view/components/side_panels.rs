//! src/view/components/side_panels.rs
//!
//! Shortcuts and drives: plain lists drawn from the scroll offset, the same
//! window the pointer hit-testing resolves rows against.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState},
};

use crate::{
    drives::drive::Drive,
    model::{
        panel_focus::{Panel, ScrollState},
        shortcut::Shortcut,
    },
    util::humanize::human_readable_size,
    view::{icons, layout::ScreenLayout, theme},
};

pub struct SidePanels;

impl SidePanels {
    pub fn render_shortcuts(
        frame: &mut Frame<'_>,
        shortcuts: &[Shortcut],
        scroll: ScrollState,
        layout: &ScreenLayout,
        active: bool,
    ) {
        let items = shortcuts.iter().map(|s| {
            let style = if s.exists() {
                theme::panel_style()
            } else {
                theme::hint_style()
            };
            ListItem::new(format!("{} {}", icons::SHORTCUT_ICON, s.label)).style(style)
        });
        Self::render_list(frame, Panel::Shortcuts, items, scroll, layout, active);
    }

    pub fn render_drives(
        frame: &mut Frame<'_>,
        drives: &[Drive],
        scroll: ScrollState,
        layout: &ScreenLayout,
        active: bool,
    ) {
        let items = drives.iter().map(|d| {
            if d.is_mounted() {
                ListItem::new(format!("{} {}", icons::MOUNTED_ICON, d.display_name()))
                    .style(theme::mounted_style())
            } else {
                ListItem::new(format!(
                    "{} {} ({})",
                    icons::DRIVE_ICON,
                    d.display_name(),
                    human_readable_size(d.size)
                ))
                .style(theme::panel_style())
            }
        });
        Self::render_list(frame, Panel::Drives, items, scroll, layout, active);
    }

    fn render_list<'a>(
        frame: &mut Frame<'_>,
        panel: Panel,
        items: impl Iterator<Item = ListItem<'a>>,
        scroll: ScrollState,
        layout: &ScreenLayout,
        active: bool,
    ) {
        let area = layout.panel_rect(panel);
        if area.width < 3 || area.height < 3 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", panel.title()))
            .title_style(theme::title_style(active))
            .border_style(theme::border_style(active))
            .style(theme::panel_style());
        frame.render_widget(block, area);

        let list_area = layout.list_area(panel);
        let visible: Vec<ListItem> = items
            .skip(scroll.offset)
            .take(usize::from(list_area.height))
            .collect();
        let empty = visible.is_empty();

        let list = List::new(visible)
            .highlight_style(theme::highlight_style(active))
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);
        let mut state = ListState::default()
            .with_selected((!empty).then(|| scroll.selected.saturating_sub(scroll.offset)));

        frame.render_stateful_widget(list, list_area, &mut state);
    }
}
