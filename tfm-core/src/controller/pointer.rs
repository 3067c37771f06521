//! ``src/controller/pointer.rs``
//! ============================================================================
//! # `PointerDisambiguator`: raw mouse events to panel actions
//!
//! Terminals report presses, releases, drags and wheel steps but rarely
//! double-clicks, so a second release on the same `(panel, item)` within the
//! double-click window is promoted to an activation. A release that ends a
//! drag is not a click.
//!
//! The status-bar hot words live here too: they are clicked like everything
//! else but map straight to a key.

use std::ops::Range;
use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEventKind};
use tracing::trace;

use crate::model::panel_focus::Panel;

/// Left-button and wheel events, the only ones the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Release,
    /// A double-click detected by the input source itself. Crossterm never
    /// reports one, so [`Self::from_mouse`] does not produce it; callers
    /// with such a source pass it to [`PointerDisambiguator::classify`].
    DoubleClick,
    Drag,
    Move,
    ScrollUp,
    ScrollDown,
}

impl PointerKind {
    #[must_use]
    pub const fn from_mouse(kind: MouseEventKind) -> Option<Self> {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Self::Press),
            MouseEventKind::Up(MouseButton::Left) => Some(Self::Release),
            MouseEventKind::Drag(MouseButton::Left) => Some(Self::Drag),
            MouseEventKind::Moved => Some(Self::Move),
            MouseEventKind::ScrollUp => Some(Self::ScrollUp),
            MouseEventKind::ScrollDown => Some(Self::ScrollDown),
            _ => None,
        }
    }
}

/// Gesture left after drag tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Click { double: bool },
    ScrollUp,
    ScrollDown,
}

/// Panel under the pointer and the item row hit, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelHit {
    pub panel: Panel,
    pub item: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Select the item.
    Hover(usize),
    /// Select and open the item.
    Activate(usize),
    ScrollUp,
    ScrollDown,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClickState {
    target: (Panel, usize),
    at: Instant,
}

#[derive(Debug, Clone)]
pub struct PointerDisambiguator {
    window: Duration,
    last_click: Option<ClickState>,
    dragging: bool,
}

impl PointerDisambiguator {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_click: None,
            dragging: false,
        }
    }

    /// Track drags and reduce `kind` to a gesture. Press, move and drag
    /// events, and the release ending a drag, yield nothing.
    pub fn gesture(&mut self, kind: PointerKind) -> Option<Gesture> {
        match kind {
            PointerKind::Press => {
                self.dragging = false;
                None
            }
            PointerKind::Drag => {
                self.dragging = true;
                None
            }
            PointerKind::Move => None,
            PointerKind::Release => {
                let was_drag = std::mem::replace(&mut self.dragging, false);
                (!was_drag).then_some(Gesture::Click { double: false })
            }
            PointerKind::DoubleClick => {
                self.dragging = false;
                Some(Gesture::Click { double: true })
            }
            PointerKind::ScrollUp => Some(Gesture::ScrollUp),
            PointerKind::ScrollDown => Some(Gesture::ScrollDown),
        }
    }

    /// Classify one raw event.
    pub fn classify(&mut self, hit: Option<PanelHit>, kind: PointerKind, now: Instant) -> PointerAction {
        let gesture = self.gesture(kind);
        self.classify_gesture(hit, gesture, now)
    }

    /// Classify a gesture already produced by [`Self::gesture`].
    pub fn classify_gesture(
        &mut self,
        hit: Option<PanelHit>,
        gesture: Option<Gesture>,
        now: Instant,
    ) -> PointerAction {
        let (Some(hit), Some(gesture)) = (hit, gesture) else {
            return PointerAction::None;
        };

        let action = match gesture {
            Gesture::ScrollUp => PointerAction::ScrollUp,
            Gesture::ScrollDown => PointerAction::ScrollDown,
            Gesture::Click { double } => match hit.item {
                None => PointerAction::None,
                Some(item) => self.click(hit.panel, item, double, now),
            },
        };
        trace!("pointer {:?} on {:?} -> {:?}", gesture, hit, action);
        action
    }

    fn click(&mut self, panel: Panel, item: usize, double: bool, now: Instant) -> PointerAction {
        let target = (panel, item);
        let repeated = self.last_click.is_some_and(|last| {
            last.target == target && now.saturating_duration_since(last.at) < self.window
        });
        self.last_click = Some(ClickState { target, at: now });

        if double || repeated {
            PointerAction::Activate(item)
        } else {
            PointerAction::Hover(item)
        }
    }
}

// ------------------------------------------------------------
// Status bar hot words
// ------------------------------------------------------------

pub const HELP_TEXT: &str =
    "q:Quit d:Del n:New e:Edit c:Copy v:Paste x:Cut r:Rename u:Unmount ::Cmd /:Search h:Hidden";

/// Columns reserved to the right of the hints.
pub const HELP_RESERVED_COLUMNS: u16 = 25;

/// One clickable hint: column range on the status line and the key it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotWord {
    pub columns: Range<u16>,
    pub key: char,
}

/// The part of [`HELP_TEXT`] that fits a terminal `width` columns wide.
#[must_use]
pub fn visible_help(width: u16) -> &'static str {
    let limit = usize::from(width.saturating_sub(HELP_RESERVED_COLUMNS));
    &HELP_TEXT[..limit.min(HELP_TEXT.len())]
}

/// Hints that fit entirely, laid out from column `x`.
#[must_use]
pub fn hot_words(x: u16, width: u16) -> Vec<HotWord> {
    let limit = usize::from(width.saturating_sub(HELP_RESERVED_COLUMNS));
    let mut words = Vec::new();
    let mut cursor = 0usize;

    for token in HELP_TEXT.split(' ') {
        if cursor + token.len() > limit {
            break;
        }
        if let Some(key) = token.chars().next() {
            let start = x.saturating_add(cursor as u16);
            words.push(HotWord {
                columns: start..start.saturating_add(token.len() as u16),
                key,
            });
        }
        cursor += token.len() + 1;
    }
    words
}

/// Key of the hint under `column`, if any.
#[must_use]
pub fn hot_word_at(x: u16, width: u16, column: u16) -> Option<char> {
    hot_words(x, width)
        .into_iter()
        .find(|w| w.columns.contains(&column))
        .map(|w| w.key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(400);

    fn on(panel: Panel, item: usize) -> Option<PanelHit> {
        Some(PanelHit {
            panel,
            item: Some(item),
        })
    }

    #[test]
    fn second_click_within_window_activates() {
        let mut pointer = PointerDisambiguator::new(WINDOW);
        let t0 = Instant::now();

        assert_eq!(pointer.classify(on(Panel::Tree, 3), PointerKind::Release, t0), PointerAction::Hover(3));
        assert_eq!(
            pointer.classify(on(Panel::Tree, 3), PointerKind::Release, t0 + Duration::from_millis(250)),
            PointerAction::Activate(3)
        );
    }

    #[test]
    fn slow_or_different_clicks_only_hover() {
        let mut pointer = PointerDisambiguator::new(WINDOW);
        let t0 = Instant::now();

        pointer.classify(on(Panel::Tree, 3), PointerKind::Release, t0);
        assert_eq!(
            pointer.classify(on(Panel::Tree, 3), PointerKind::Release, t0 + Duration::from_millis(401)),
            PointerAction::Hover(3)
        );
        assert_eq!(
            pointer.classify(on(Panel::Tree, 4), PointerKind::Release, t0 + Duration::from_millis(500)),
            PointerAction::Hover(4)
        );
        assert_eq!(
            pointer.classify(on(Panel::Drives, 4), PointerKind::Release, t0 + Duration::from_millis(600)),
            PointerAction::Hover(4)
        );
    }

    #[test]
    fn click_state_restarts_after_a_late_click() {
        let mut pointer = PointerDisambiguator::new(WINDOW);
        let t0 = Instant::now();

        pointer.classify(on(Panel::Shortcuts, 1), PointerKind::Release, t0);
        pointer.classify(on(Panel::Shortcuts, 1), PointerKind::Release, t0 + Duration::from_secs(1));
        assert_eq!(
            pointer.classify(
                on(Panel::Shortcuts, 1),
                PointerKind::Release,
                t0 + Duration::from_millis(1200)
            ),
            PointerAction::Activate(1)
        );
    }

    #[test]
    fn platform_double_click_activates_immediately() {
        let mut pointer = PointerDisambiguator::new(WINDOW);
        assert_eq!(
            pointer.classify(on(Panel::Drives, 0), PointerKind::DoubleClick, Instant::now()),
            PointerAction::Activate(0)
        );
    }

    #[test]
    fn drag_release_is_not_a_click() {
        let mut pointer = PointerDisambiguator::new(WINDOW);
        let t0 = Instant::now();
        pointer.classify(on(Panel::Tree, 2), PointerKind::Release, t0);

        assert_eq!(pointer.classify(on(Panel::Tree, 2), PointerKind::Press, t0), PointerAction::None);
        assert_eq!(pointer.classify(on(Panel::Tree, 2), PointerKind::Drag, t0), PointerAction::None);
        assert_eq!(
            pointer.classify(on(Panel::Tree, 2), PointerKind::Release, t0 + Duration::from_millis(100)),
            PointerAction::None
        );
    }

    #[test]
    fn wheel_ignores_row_and_outside_is_none() {
        let mut pointer = PointerDisambiguator::new(WINDOW);
        let now = Instant::now();
        let header = Some(PanelHit {
            panel: Panel::Tree,
            item: None,
        });

        assert_eq!(pointer.classify(header, PointerKind::ScrollDown, now), PointerAction::ScrollDown);
        assert_eq!(pointer.classify(header, PointerKind::ScrollUp, now), PointerAction::ScrollUp);
        assert_eq!(pointer.classify(header, PointerKind::Release, now), PointerAction::None);
        assert_eq!(pointer.classify(None, PointerKind::ScrollUp, now), PointerAction::None);
    }

    #[test]
    fn left_button_only() {
        assert_eq!(
            PointerKind::from_mouse(MouseEventKind::Up(MouseButton::Left)),
            Some(PointerKind::Release)
        );
        assert_eq!(PointerKind::from_mouse(MouseEventKind::Up(MouseButton::Right)), None);
    }

    #[test]
    fn hot_words_follow_the_help_text() {
        let words = hot_words(0, 200);
        assert_eq!(words.len(), 12);
        assert_eq!(words[0], HotWord { columns: 0..6, key: 'q' });
        assert_eq!(words[1], HotWord { columns: 7..12, key: 'd' });
        assert_eq!(hot_word_at(0, 200, 8), Some('d'));
        assert_eq!(hot_word_at(0, 200, 6), None);

        let cmd = words.iter().find(|w| w.key == ':').expect("cmd hint");
        assert_eq!(&HELP_TEXT[usize::from(cmd.columns.start)..usize::from(cmd.columns.end)], "::Cmd");
    }

    #[test]
    fn narrow_terminal_truncates_hints() {
        assert_eq!(visible_help(37), "q:Quit d:Del");
        let words = hot_words(0, 37);
        assert_eq!(words.iter().map(|w| w.key).collect::<Vec<_>>(), vec!['q', 'd']);
        assert!(hot_words(0, 10).is_empty());
    }
}
