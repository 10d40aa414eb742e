//! Discrete slider: an integer position in `[0, tick_count]` drawn as a
//! one-row track with tick marks and a thumb.
//!
//! The slider knows nothing about values; a [`ControlGroup`](crate::control_group::ControlGroup)
//! maps positions to values through a [`QuantizedRange`](crate::range::QuantizedRange).

use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use panelctl_core::command::Command;
use panelctl_core::component::Component;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::key::{Binding, KeyCombination, KeyMap};

/// Messages for the slider component.
#[derive(Debug, Clone)]
pub enum Message {
    /// A keyboard event to process. Ignored unless focused.
    KeyPress(KeyEvent),
    /// A mouse event in terminal coordinates. Clicks and drags on the last
    /// rendered track move the thumb, focused or not.
    Mouse(MouseEvent),
    /// Emitted when user input moved the thumb to a new position.
    Changed(u32),
}

/// Visual style for the [`Slider`].
#[derive(Debug, Clone)]
pub struct SliderStyle {
    /// Track left of the thumb.
    pub filled: Style,
    /// Track right of the thumb.
    pub track: Style,
    /// The thumb while blurred.
    pub thumb: Style,
    /// The thumb while focused.
    pub thumb_focused: Style,
    pub track_char: char,
    pub filled_char: char,
    pub tick_char: char,
    pub filled_tick_char: char,
    pub thumb_char: char,
}

impl Default for SliderStyle {
    fn default() -> Self {
        Self {
            filled: Style::default().fg(Color::Cyan),
            track: Style::default().fg(Color::DarkGray),
            thumb: Style::default().fg(Color::Gray),
            thumb_focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            track_char: '─',
            filled_char: '━',
            tick_char: '┼',
            filled_tick_char: '╋',
            thumb_char: '●',
        }
    }
}

/// Keyboard bindings for the [`Slider`].
///
/// Keys match with exactly the listed modifiers, so Ctrl+h or Alt+Left
/// leave the slider alone and stay free for the host.
#[derive(Debug, Clone)]
pub struct SliderKeyMap {
    pub decrement: Binding,
    pub increment: Binding,
    pub coarse_decrement: Binding,
    pub coarse_increment: Binding,
    pub first: Binding,
    pub last: Binding,
}

impl Default for SliderKeyMap {
    fn default() -> Self {
        Self {
            decrement: Binding::new(
                vec![
                    KeyCombination::new(KeyCode::Left),
                    KeyCombination::new(KeyCode::Char('h')),
                ],
                "down",
            ),
            increment: Binding::new(
                vec![
                    KeyCombination::new(KeyCode::Right),
                    KeyCombination::new(KeyCode::Char('l')),
                ],
                "up",
            ),
            coarse_decrement: Binding::new(vec![KeyCombination::new(KeyCode::PageDown)], "jump down"),
            coarse_increment: Binding::new(vec![KeyCombination::new(KeyCode::PageUp)], "jump up"),
            first: Binding::new(vec![KeyCombination::new(KeyCode::Home)], "min"),
            last: Binding::new(vec![KeyCombination::new(KeyCode::End)], "max"),
        }
    }
}

impl KeyMap for SliderKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.decrement, &self.increment, &self.coarse_increment, &self.first, &self.last]
    }
}

/// A discrete horizontal slider.
///
/// ```ignore
/// let mut slider = Slider::new(10).with_position(5);
/// slider.focus();
/// // parent: self.slider.update(msg).map(Msg::Slider)
/// ```
pub struct Slider {
    position: u32,
    ticks: u32,
    focus: bool,
    dragging: bool,
    style: SliderStyle,
    keymap: SliderKeyMap,
    // Where the track was last drawn, for mouse hit-testing.
    track: Cell<Rect>,
}

impl Slider {
    /// A slider with positions `0..=tick_count`, starting at 0.
    pub fn new(tick_count: u32) -> Self {
        Self {
            position: 0,
            ticks: tick_count,
            focus: false,
            dragging: false,
            style: SliderStyle::default(),
            keymap: SliderKeyMap::default(),
            track: Cell::new(Rect::default()),
        }
    }

    /// Set the initial position (clamped).
    pub fn with_position(mut self, position: u32) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_style(mut self, style: SliderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_keymap(mut self, keymap: SliderKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Current position in `[0, tick_count]`.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Move the thumb without emitting [`Message::Changed`]. Clamped to
    /// `[0, tick_count]`.
    pub fn set_position(&mut self, position: u32) {
        self.position = position.min(self.ticks);
    }

    /// Highest position.
    pub fn tick_count(&self) -> u32 {
        self.ticks
    }

    pub fn keymap(&self) -> &SliderKeyMap {
        &self.keymap
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
        self.dragging = false;
    }

    /// Whether `(column, row)` falls on the last rendered track.
    pub fn hit(&self, column: u16, row: u16) -> bool {
        let track = self.track.get();
        track.width > 0
            && column >= track.x
            && column < track.right()
            && row >= track.y
            && row < track.bottom()
    }

    /// Distance moved by PageUp/PageDown: a tenth of the range, at least one tick.
    fn coarse_step(&self) -> u32 {
        (self.ticks / 10).max(1)
    }

    fn move_to(&mut self, position: u32) -> Command<Message> {
        let position = position.min(self.ticks);
        if position == self.position {
            return Command::none();
        }
        self.position = position;
        Command::message(Message::Changed(position))
    }

    /// Column (relative to the track start) where `position` is drawn.
    fn column_of(&self, position: u32, width: u16) -> u16 {
        if self.ticks == 0 || width <= 1 {
            return 0;
        }
        let span = u64::from(width - 1);
        let col = (u64::from(position) * span + u64::from(self.ticks) / 2) / u64::from(self.ticks);
        col as u16
    }

    /// Nearest position to a column relative to the track start.
    fn position_at(&self, column: u16, width: u16) -> u32 {
        if width <= 1 {
            return 0;
        }
        let span = u64::from(width - 1);
        let column = u64::from(column).min(span);
        ((column * u64::from(self.ticks) + span / 2) / span) as u32
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Command<Message> {
        let track = self.track.get();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.hit(mouse.column, mouse.row) => {
                self.dragging = true;
                self.move_to(self.position_at(mouse.column - track.x, track.width))
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging => {
                let column = mouse.column.saturating_sub(track.x);
                self.move_to(self.position_at(column, track.width))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.dragging = false;
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Command<Message> {
        let km = &self.keymap;
        let target = if km.decrement.matches(key) {
            self.position.saturating_sub(1)
        } else if km.increment.matches(key) {
            self.position.saturating_add(1)
        } else if km.coarse_decrement.matches(key) {
            self.position.saturating_sub(self.coarse_step())
        } else if km.coarse_increment.matches(key) {
            self.position.saturating_add(self.coarse_step())
        } else if km.first.matches(key) {
            0
        } else if km.last.matches(key) {
            self.ticks
        } else {
            return Command::none();
        };
        self.move_to(target)
    }
}

impl Component for Slider {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => self.handle_key(&key),
            Message::KeyPress(_) => Command::none(),
            Message::Mouse(mouse) => self.handle_mouse(mouse),
            Message::Changed(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            self.track.set(Rect::default());
            return;
        }
        let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
        self.track.set(row);

        let width = row.width;
        let thumb = self.column_of(self.position, width);
        // Only mark ticks when every one of them gets its own column.
        let show_ticks = self.ticks > 0 && u32::from(width) > self.ticks;
        let mut tick_cols = vec![false; usize::from(width)];
        if show_ticks {
            for t in 0..=self.ticks {
                tick_cols[usize::from(self.column_of(t, width))] = true;
            }
        }

        let s = &self.style;
        let thumb_style = if self.focus { s.thumb_focused } else { s.thumb };
        let spans: Vec<Span> = (0..width)
            .map(|col| {
                let tick = tick_cols[usize::from(col)];
                if col == thumb {
                    Span::styled(s.thumb_char.to_string(), thumb_style)
                } else if col < thumb {
                    let c = if tick { s.filled_tick_char } else { s.filled_char };
                    Span::styled(c.to_string(), s.filled)
                } else {
                    let c = if tick { s.tick_char } else { s.track_char };
                    Span::styled(c.to_string(), s.track)
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(Line::from(spans)), row);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use panelctl_core::testing::{buffer_to_string, render_component};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn changed(cmd: Command<Message>) -> Option<u32> {
        match cmd.into_message() {
            Some(Message::Changed(p)) => Some(p),
            _ => None,
        }
    }

    #[test]
    fn position_is_clamped() {
        let mut s = Slider::new(10).with_position(42);
        assert_eq!(s.position(), 10);
        s.set_position(3);
        assert_eq!(s.position(), 3);
    }

    #[test]
    fn arrows_step_one_tick() {
        let mut s = Slider::new(10).with_position(5);
        s.focus();
        assert_eq!(changed(s.update(Message::KeyPress(key(KeyCode::Right)))), Some(6));
        assert_eq!(changed(s.update(Message::KeyPress(key(KeyCode::Char('h'))))), Some(5));
        assert_eq!(changed(s.update(Message::KeyPress(key(KeyCode::Left)))), Some(4));
    }

    #[test]
    fn modified_step_keys_are_ignored() {
        let mut s = Slider::new(10).with_position(5);
        s.focus();
        for (code, modifiers) in [
            (KeyCode::Char('h'), KeyModifiers::CONTROL),
            (KeyCode::Char('l'), KeyModifiers::ALT),
            (KeyCode::Right, KeyModifiers::CONTROL),
            (KeyCode::Left, KeyModifiers::ALT),
        ] {
            let ev = KeyEvent {
                modifiers,
                ..key(code)
            };
            assert!(s.update(Message::KeyPress(ev)).is_none());
        }
        assert_eq!(s.position(), 5);
    }

    #[test]
    fn no_change_at_the_ends() {
        let mut s = Slider::new(3);
        s.focus();
        assert!(s.update(Message::KeyPress(key(KeyCode::Left))).is_none());
        s.set_position(3);
        assert!(s.update(Message::KeyPress(key(KeyCode::Right))).is_none());
        assert_eq!(s.position(), 3);
    }

    #[test]
    fn page_keys_jump_a_tenth() {
        let mut s = Slider::new(100).with_position(50);
        s.focus();
        assert_eq!(changed(s.update(Message::KeyPress(key(KeyCode::PageUp)))), Some(60));
        assert_eq!(changed(s.update(Message::KeyPress(key(KeyCode::PageDown)))), Some(50));

        let mut small = Slider::new(4).with_position(2);
        small.focus();
        assert_eq!(changed(small.update(Message::KeyPress(key(KeyCode::PageUp)))), Some(3));
    }

    #[test]
    fn home_end() {
        let mut s = Slider::new(8).with_position(4);
        s.focus();
        assert_eq!(changed(s.update(Message::KeyPress(key(KeyCode::End)))), Some(8));
        assert_eq!(changed(s.update(Message::KeyPress(key(KeyCode::Home)))), Some(0));
    }

    #[test]
    fn unfocused_ignores_keys() {
        let mut s = Slider::new(10).with_position(5);
        assert!(s.update(Message::KeyPress(key(KeyCode::Right))).is_none());
        assert_eq!(s.position(), 5);
    }

    #[test]
    fn renders_thumb_proportionally() {
        let s = Slider::new(10).with_position(5);
        let out = buffer_to_string(&render_component(&s, 11, 1));
        assert_eq!(out, "╋╋╋╋╋●┼┼┼┼┼");
    }

    #[test]
    fn renders_plain_track_when_ticks_do_not_fit() {
        let s = Slider::new(100);
        let out = buffer_to_string(&render_component(&s, 5, 1));
        assert_eq!(out, "●────");
    }

    #[test]
    fn click_moves_thumb() {
        let mut s = Slider::new(10).with_position(0);
        render_component(&s, 11, 1);
        assert_eq!(
            changed(s.update(Message::Mouse(mouse(MouseEventKind::Down(MouseButton::Left), 7, 0)))),
            Some(7)
        );
    }

    #[test]
    fn drag_follows_pointer_and_clamps() {
        let mut s = Slider::new(10);
        render_component(&s, 11, 1);
        s.update(Message::Mouse(mouse(MouseEventKind::Down(MouseButton::Left), 2, 0)));
        assert_eq!(
            changed(s.update(Message::Mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 0)))),
            Some(10)
        );
        s.update(Message::Mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40, 0)));
        assert!(s
            .update(Message::Mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 1, 0)))
            .is_none());
    }

    #[test]
    fn click_outside_track_is_ignored() {
        let mut s = Slider::new(10);
        render_component(&s, 11, 1);
        assert!(s
            .update(Message::Mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 5)))
            .is_none());
        assert!(!s.hit(3, 5));
        assert!(s.hit(3, 0));
    }

    #[test]
    fn keymap_lists_help() {
        let s = Slider::new(1);
        assert_eq!(s.keymap().short_help().len(), 5);
    }
}
