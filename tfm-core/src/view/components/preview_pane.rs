//! src/view/components/preview_pane.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::{fs::preview::Preview, view::theme};

pub struct PreviewPane;

impl PreviewPane {
    pub fn render(frame: &mut Frame<'_>, preview: &Preview, area: Rect) {
        if area.width < 3 || area.height < 3 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Preview ")
            .title_style(theme::title_style(false))
            .border_style(theme::border_style(false))
            .style(theme::panel_style());

        let rows = usize::from(area.height.saturating_sub(2));
        let lines: Vec<Line> = preview
            .lines()
            .iter()
            .take(rows)
            .map(|l| Line::raw(l.as_str()))
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
