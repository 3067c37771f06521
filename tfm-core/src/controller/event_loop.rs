//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Terminal input with a poll deadline
//!
//! Waits for the next terminal event for at most one poll interval; an
//! expired wait is reported as [`Input::Tick`] so the session can run its
//! periodic work while the user is idle. The event stream is dropped while
//! an external program owns the terminal and recreated afterwards.

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, MouseEvent};
use futures::StreamExt;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
    /// Nothing arrived within the poll interval.
    Tick,
    /// The terminal stream ended.
    Closed,
}

impl Input {
    fn from_terminal(event: TermEvent) -> Option<Self> {
        match event {
            TermEvent::Key(key) => Some(Self::Key(key)),
            TermEvent::Mouse(mouse) => Some(Self::Mouse(mouse)),
            TermEvent::Resize(width, height) => Some(Self::Resize { width, height }),
            TermEvent::FocusGained | TermEvent::FocusLost | TermEvent::Paste(_) => None,
        }
    }
}

pub struct EventLoop {
    event_stream: Option<EventStream>,
    poll_interval: Duration,
}

impl EventLoop {
    #[must_use]
    pub fn new(poll_interval: Duration) -> Self {
        debug!("event loop polling every {:?}", poll_interval);
        Self {
            event_stream: Some(EventStream::new()),
            poll_interval,
        }
    }

    /// Next input, or `Tick` once the poll interval passes without one.
    /// Events the session has no use for count as a tick.
    pub async fn next_input(&mut self) -> Input {
        let stream = self.event_stream.get_or_insert_with(EventStream::new);

        match tokio::time::timeout(self.poll_interval, stream.next()).await {
            Err(_elapsed) => Input::Tick,
            Ok(None) => {
                warn!("terminal event stream closed");
                Input::Closed
            }
            Ok(Some(Err(e))) => {
                warn!("terminal event error: {e}");
                Input::Tick
            }
            Ok(Some(Ok(event))) => {
                trace!("terminal event: {:?}", event);
                Input::from_terminal(event).unwrap_or(Input::Tick)
            }
        }
    }

    /// Stop reading the terminal so a child process gets every keystroke.
    pub fn pause(&mut self) {
        self.event_stream = None;
    }

    pub fn resume(&mut self) {
        if self.event_stream.is_none() {
            self.event_stream = Some(EventStream::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn terminal_events_map_to_inputs() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(Input::from_terminal(TermEvent::Key(key)), Some(Input::Key(key)));
        assert_eq!(
            Input::from_terminal(TermEvent::Resize(80, 24)),
            Some(Input::Resize { width: 80, height: 24 })
        );
        assert_eq!(Input::from_terminal(TermEvent::FocusLost), None);
    }
}
