//! ``src/view/components/input_prompt_overlay.rs``
//! ============================================================================
//! # `InputPromptOverlay`: single-line text entry
//!
//! Masked prompts show one `*` per character; the cursor column is counted
//! in characters so it lines up in both cases.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::model::ui_state::Prompt;
use crate::view::theme;

const PROMPT_HEIGHT: u16 = 3;

pub struct InputPromptOverlay;

impl InputPromptOverlay {
    #[allow(clippy::cast_possible_truncation)]
    pub fn render(frame: &mut Frame<'_>, prompt: &Prompt, area: Rect) {
        let overlay_area = Self::centered_rect(60, area);
        if overlay_area.width < 3 || overlay_area.height < PROMPT_HEIGHT {
            return;
        }
        frame.render_widget(Clear, overlay_area);

        let input_block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", prompt.title))
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(theme::PURPLE))
            .style(Style::default().bg(theme::BACKGROUND));

        let inner_width = usize::from(overlay_area.width - 2);
        let shown = prompt.display_text();
        let cursor = prompt.cursor_column();
        // Keep the cursor inside the box for long input.
        let skip = cursor.saturating_sub(inner_width.saturating_sub(1));
        let visible: String = shown.chars().skip(skip).take(inner_width).collect();

        let input_paragraph = Paragraph::new(visible)
            .block(input_block)
            .style(Style::default().fg(theme::FOREGROUND));
        frame.render_widget(input_paragraph, overlay_area);

        frame.set_cursor_position((
            overlay_area.x + 1 + (cursor - skip) as u16,
            overlay_area.y + 1,
        ));

        let help_area = Rect {
            x: overlay_area.x,
            y: overlay_area.y + overlay_area.height,
            width: overlay_area.width,
            height: 1,
        };
        if help_area.y < area.bottom() {
            let help_paragraph = Paragraph::new("Enter to confirm • Esc to cancel")
                .style(Style::default().fg(theme::COMMENT))
                .alignment(Alignment::Center);
            frame.render_widget(help_paragraph, help_area);
        }
    }

    fn centered_rect(percent_x: u16, area: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(PROMPT_HEIGHT),
                Constraint::Fill(1),
            ])
            .split(area);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}
