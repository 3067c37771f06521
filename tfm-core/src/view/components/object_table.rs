//! src/view/components/object_table.rs
//!
//! The directory tree panel: working directory, search line, then the
//! visible window of entries starting at the scroll offset.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState},
};

use crate::{
    model::{dir_cache::DirectoryCache, panel_focus::Panel},
    view::{icons, layout::ScreenLayout, theme},
};

pub struct ObjectTable;

impl ObjectTable {
    pub fn render(frame: &mut Frame<'_>, tree: &DirectoryCache, layout: &ScreenLayout, active: bool) {
        let area = layout.tree;
        if area.width < 3 || area.height < 3 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", Panel::Tree.title()))
            .title_style(theme::title_style(active))
            .border_style(theme::border_style(active))
            .style(theme::panel_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut header = vec![Line::styled(
            tree.cwd().display().to_string(),
            theme::label_style().add_modifier(Modifier::BOLD),
        )];
        if let Some(query) = tree.search() {
            header.push(Line::from(vec![
                Span::styled("Search: ", theme::hint_style()),
                Span::styled(query.to_string(), theme::label_style()),
            ]));
        }
        header.push(Line::styled(
            "─".repeat(usize::from(inner.width)),
            theme::hint_style(),
        ));
        let header_area = Rect {
            height: layout.tree_header_rows.min(inner.height),
            ..inner
        };
        frame.render_widget(Paragraph::new(header), header_area);

        let list = layout.list_area(Panel::Tree);
        let scroll = tree.scroll;
        let rows: Vec<Row> = tree
            .entries()
            .iter()
            .skip(scroll.offset)
            .take(usize::from(list.height))
            .map(|entry| {
                let style = if entry.is_dir {
                    theme::directory_style()
                } else if entry.is_executable {
                    theme::executable_style()
                } else if entry.is_hidden {
                    theme::hidden_style()
                } else {
                    theme::panel_style()
                };

                let size = if entry.is_dir {
                    String::new()
                } else {
                    crate::util::humanize::human_readable_size(entry.size)
                };

                Row::new(vec![
                    Cell::from(format!("{} {}", icons::entry_icon(entry), entry.name)),
                    Cell::from(Text::from(size).alignment(Alignment::Right)),
                ])
                .style(style)
            })
            .collect();

        let widths = [Constraint::Fill(1), Constraint::Length(10)];
        let mut table_state =
            TableState::default().with_selected(scroll.selected.checked_sub(scroll.offset));

        let table = Table::new(rows, widths)
            .row_highlight_style(theme::highlight_style(active))
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(table, list, &mut table_state);
    }
}
