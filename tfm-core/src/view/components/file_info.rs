//! src/view/components/file_info.rs
//!
//! Metadata of the selected entry and the clipboard content.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    fs::object_info::DirectoryEntry,
    model::ui_state::{ClipMode, Clipboard},
    util::humanize::human_readable_size,
    view::theme,
};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct FileInfo;

impl FileInfo {
    pub fn render(frame: &mut Frame<'_>, entry: Option<&DirectoryEntry>, clipboard: Option<&Clipboard>, area: Rect) {
        if area.width < 3 || area.height < 3 {
            return;
        }

        let mut lines = match entry {
            Some(entry) if !entry.is_parent() => Self::entry_lines(entry),
            Some(_) => vec![Line::styled("Parent directory", theme::hint_style())],
            None => vec![Line::styled("Empty directory", theme::hint_style())],
        };

        lines.push(Line::default());
        lines.push(match clipboard {
            None => Line::from(vec![field("Clipboard"), Span::styled("empty", theme::hint_style())]),
            Some(clip) => {
                let (verb, style) = match clip.mode {
                    ClipMode::Copy => ("copy", theme::clipboard_copy_style()),
                    ClipMode::Cut => ("cut", theme::clipboard_move_style()),
                };
                let name = clip
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Line::from(vec![field("Clipboard"), Span::styled(format!("{name} ({verb})"), style)])
            }
        });

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" File Info ")
            .title_style(theme::title_style(false))
            .border_style(theme::border_style(false))
            .style(theme::panel_style());

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn entry_lines(entry: &DirectoryEntry) -> Vec<Line<'static>> {
        let kind = if entry.is_dir {
            "Directory"
        } else if entry.is_executable {
            "Executable"
        } else {
            "File"
        };
        let size = if entry.is_dir {
            "-".to_string()
        } else {
            human_readable_size(entry.size)
        };

        vec![
            Line::styled(entry.name.to_string(), theme::label_style().add_modifier(Modifier::BOLD)),
            Line::from(vec![field("Type"), Span::raw(kind)]),
            Line::from(vec![field("Size"), Span::raw(size)]),
            Line::from(vec![
                field("Modified"),
                Span::raw(entry.modified.format(DATE_FORMAT).to_string()),
            ]),
            Line::from(vec![
                field("Created"),
                Span::raw(entry.created.format(DATE_FORMAT).to_string()),
            ]),
            Line::from(vec![
                field("Readable"),
                Span::raw(if entry.readable { "yes" } else { "no" }),
            ]),
        ]
    }
}

fn field(name: &'static str) -> Span<'static> {
    Span::styled(format!("{name}: "), theme::hint_style())
}
