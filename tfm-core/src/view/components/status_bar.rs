//! src/view/components/status_bar.rs
//!
//! Bottom rows: disk usage, the clickable key hints with the transient
//! message over their right end, and the update button.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::{
    controller::pointer::{HELP_RESERVED_COLUMNS, hot_words, visible_help},
    drives::usage::DiskUsage,
    model::ui_state::Notification,
    view::{layout::ScreenLayout, theme},
};

const USAGE_BAR_CELLS: usize = 20;

pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame<'_>,
        layout: &ScreenLayout,
        usage: Option<&DiskUsage>,
        notification: Option<&Notification>,
    ) {
        Self::render_disk_line(frame, layout.disk_line, usage);
        Self::render_hints(frame, layout.status_line);
        if let Some(notification) = notification {
            Self::render_notification(frame, layout.status_line, notification);
        }
        Self::render_update_button(frame, layout.update_button);
    }

    fn render_disk_line(frame: &mut Frame<'_>, area: Rect, usage: Option<&DiskUsage>) {
        if area.height == 0 {
            return;
        }
        let line = match usage {
            Some(usage) => Line::from(vec![
                Span::styled(format!("{} ", usage.mount_point.display()), theme::label_style()),
                Span::styled(usage.summary(USAGE_BAR_CELLS), theme::panel_style()),
            ]),
            None => Line::styled("Disk usage unavailable", theme::hint_style()),
        };
        Paragraph::new(line)
            .style(theme::panel_style())
            .render(area, frame.buffer_mut());
    }

    /// Key letter highlighted, the rest dimmed; the columns match what
    /// `hot_words` reports for clicks.
    fn render_hints(frame: &mut Frame<'_>, area: Rect) {
        if area.height == 0 {
            return;
        }
        let help = visible_help(area.width);
        let mut spans = Vec::new();
        let mut drawn = 0usize;

        for word in hot_words(area.x, area.width) {
            let start = usize::from(word.columns.start - area.x);
            let end = usize::from(word.columns.end - area.x);
            if start > drawn {
                spans.push(Span::raw(&help[drawn..start]));
            }
            let token = &help[start..end];
            let split = token.char_indices().nth(1).map_or(token.len(), |(i, _)| i);
            spans.push(Span::styled(&token[..split], theme::hot_key_style()));
            spans.push(Span::styled(&token[split..], theme::hint_style()));
            drawn = end;
        }
        if drawn < help.len() {
            spans.push(Span::styled(&help[drawn..], theme::hint_style()));
        }

        Paragraph::new(Line::from(spans))
            .style(theme::panel_style())
            .render(area, frame.buffer_mut());
    }

    /// Right-aligned, ending where the reserved columns begin.
    fn render_notification(frame: &mut Frame<'_>, area: Rect, notification: &Notification) {
        let room = area.width.saturating_sub(HELP_RESERVED_COLUMNS);
        if room == 0 || area.height == 0 {
            return;
        }
        let message: String = notification.message.chars().take(usize::from(room)).collect();
        let width = (message.chars().count() as u16).min(room);
        let target = Rect::new(area.x + room - width, area.y, width, 1);

        frame.render_widget(Clear, target);
        Paragraph::new(message)
            .style(theme::notification_style(notification.level))
            .render(target, frame.buffer_mut());
    }

    fn render_update_button(frame: &mut Frame<'_>, area: Rect) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        frame.render_widget(Clear, area);
        Paragraph::new("U: Check Update")
            .alignment(Alignment::Center)
            .style(theme::button_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme::button_style()),
            )
            .render(area, frame.buffer_mut());
    }
}
