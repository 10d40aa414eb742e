use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEvent};

/// Terminal input delivered by the [`terminal_events`](crate::subscriptions::terminal_events)
/// subscription.
///
/// Variants wrap the crossterm payloads directly so handlers can match on key
/// codes, modifiers, and mouse buttons with the full crossterm API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event (only delivered when mouse capture is enabled).
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Bracketed paste content.
    Paste(String),
    /// Terminal window gained or lost focus.
    Focus(bool),
}

impl TerminalEvent {
    /// The key event, if this is a press or repeat.
    ///
    /// Some platforms report key releases as separate events; widgets only
    /// ever want to act once per keystroke.
    pub fn key_press(&self) -> Option<KeyEvent> {
        match self {
            TerminalEvent::Key(key) if key.kind != KeyEventKind::Release => Some(*key),
            _ => None,
        }
    }
}

impl From<Event> for TerminalEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(k) => TerminalEvent::Key(k),
            Event::Mouse(m) => TerminalEvent::Mouse(m),
            Event::Resize(w, h) => TerminalEvent::Resize(w, h),
            Event::FocusGained => TerminalEvent::Focus(true),
            Event::FocusLost => TerminalEvent::Focus(false),
            Event::Paste(s) => TerminalEvent::Paste(s),
        }
    }
}
