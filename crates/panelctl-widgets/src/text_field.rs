//! Single-line editable text field with a switchable background tone.
//!
//! Every content mutation emits [`Message::Changed`], keystroke by keystroke,
//! so a parent can validate as the user types. Programmatic writes through
//! [`TextField::set_value`] do not emit anything.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use panelctl_core::command::Command;
use panelctl_core::component::Component;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

/// Messages for the text field component.
#[derive(Debug, Clone)]
pub enum Message {
    /// A keyboard event to process. Ignored unless focused.
    KeyPress(KeyEvent),
    /// Insert pasted text at the cursor. Ignored unless focused.
    Paste(String),
    /// Emitted after every change to the content.
    Changed(String),
    /// Emitted when Enter is pressed.
    Submit(String),
}

/// Background indicator for the field's visual state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldTone {
    #[default]
    Normal,
    /// The content cannot be committed.
    Error,
}

/// Style configuration for the text field.
#[derive(Debug, Clone)]
pub struct TextFieldStyle {
    /// Field background and text in the normal tone.
    pub normal: Style,
    /// Field background and text in the error tone.
    pub error: Style,
    /// Placeholder text shown when empty and blurred.
    pub placeholder: Style,
    /// The cursor cell.
    pub cursor: Style,
}

impl Default for TextFieldStyle {
    fn default() -> Self {
        Self {
            normal: Style::default(),
            error: Style::default()
                .bg(Color::Rgb(255, 192, 203))
                .fg(Color::Black),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// A single-line text field.
///
/// ```ignore
/// let mut field = TextField::new("value").with_value("5.0");
/// field.focus();
/// // parent: self.field.update(msg).map(Msg::Field)
/// ```
pub struct TextField {
    value: Vec<char>,
    cursor: usize,
    focus: bool,
    placeholder: String,
    char_limit: Option<usize>,
    alignment: Alignment,
    tone: FieldTone,
    style: TextFieldStyle,
}

impl TextField {
    /// Create an empty, centered field with the given placeholder.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            value: Vec::new(),
            cursor: 0,
            focus: false,
            placeholder: placeholder.into(),
            char_limit: None,
            alignment: Alignment::Center,
            tone: FieldTone::Normal,
            style: TextFieldStyle::default(),
        }
    }

    /// Set the initial content.
    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    /// Set the maximum number of characters allowed.
    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
        self
    }

    /// Horizontal alignment of the text inside the field. Default: centered.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_style(mut self, style: TextFieldStyle) -> Self {
        self.style = style;
        self
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// Current content.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Replace the content and move the cursor to the end. Does not emit
    /// [`Message::Changed`].
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().collect();
        if let Some(limit) = self.char_limit {
            self.value.truncate(limit);
        }
        self.cursor = self.value.len();
    }

    pub fn tone(&self) -> FieldTone {
        self.tone
    }

    /// Switch the background indicator. Takes effect on the next render.
    pub fn set_tone(&mut self, tone: FieldTone) {
        self.tone = tone;
    }

    /// Cursor position as a character index.
    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn changed(&self) -> Command<Message> {
        Command::message(Message::Changed(self.value()))
    }

    fn insert(&mut self, text: &str) -> Command<Message> {
        let room = self
            .char_limit
            .map_or(usize::MAX, |limit| limit.saturating_sub(self.value.len()));
        let chars: Vec<char> = text
            .chars()
            .filter(|c| !c.is_control())
            .take(room)
            .collect();
        if chars.is_empty() {
            return Command::none();
        }
        let n = chars.len();
        let tail = self.value.split_off(self.cursor);
        self.value.extend(chars);
        self.value.extend(tail);
        self.cursor += n;
        self.changed()
    }

    fn delete_range(&mut self, start: usize, end: usize) -> Command<Message> {
        if start >= end {
            return Command::none();
        }
        self.value.drain(start..end);
        self.cursor = start;
        self.changed()
    }

    fn word_start_before_cursor(&self) -> usize {
        let mut i = self.cursor;
        while i > 0 && !self.value[i - 1].is_alphanumeric() {
            i -= 1;
        }
        while i > 0 && self.value[i - 1].is_alphanumeric() {
            i -= 1;
        }
        i
    }

    fn word_end_after_cursor(&self) -> usize {
        let len = self.value.len();
        let mut i = self.cursor;
        while i < len && !self.value[i].is_alphanumeric() {
            i += 1;
        }
        while i < len && self.value[i].is_alphanumeric() {
            i += 1;
        }
        i
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Enter => Command::message(Message::Submit(self.value())),
            KeyCode::Char('u') if ctrl => self.delete_range(0, self.cursor),
            KeyCode::Char('k') if ctrl => self.delete_range(self.cursor, self.value.len()),
            KeyCode::Char('w') if ctrl => self.delete_range(self.word_start_before_cursor(), self.cursor),
            KeyCode::Char('d') if alt => self.delete_range(self.cursor, self.word_end_after_cursor()),
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                Command::none()
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.value.len();
                Command::none()
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf))
            }
            KeyCode::Backspace if alt => {
                self.delete_range(self.word_start_before_cursor(), self.cursor)
            }
            KeyCode::Backspace => self.delete_range(self.cursor.saturating_sub(1), self.cursor),
            KeyCode::Delete => {
                let end = (self.cursor + 1).min(self.value.len());
                self.delete_range(self.cursor, end)
            }
            KeyCode::Left if ctrl || alt => {
                self.cursor = self.word_start_before_cursor();
                Command::none()
            }
            KeyCode::Right if ctrl || alt => {
                self.cursor = self.word_end_after_cursor();
                Command::none()
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Command::none()
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.len());
                Command::none()
            }
            KeyCode::Home => {
                self.cursor = 0;
                Command::none()
            }
            KeyCode::End => {
                self.cursor = self.value.len();
                Command::none()
            }
            _ => Command::none(),
        }
    }

    /// The slice of characters to draw so the cursor stays visible within
    /// `width` columns. The cursor cell itself takes one column when it sits
    /// past the last character.
    fn visible_range(&self, width: usize) -> (usize, usize) {
        let w = |i: usize| self.value[i].width().unwrap_or(0);
        let cursor_cell = if self.focus && self.cursor == self.value.len() { 1 } else { 0 };

        // Walk left from the cursor until the budget is spent.
        let mut start = self.cursor;
        let mut used = cursor_cell;
        if self.cursor < self.value.len() {
            used += w(self.cursor);
        }
        while start > 0 && used + w(start - 1) <= width {
            start -= 1;
            used += w(start);
        }

        // Then fill to the right.
        let mut end = if self.cursor < self.value.len() {
            self.cursor + 1
        } else {
            self.cursor
        };
        while end < self.value.len() && used + w(end) <= width {
            used += w(end);
            end += 1;
        }
        (start, end.max(start))
    }
}

impl Component for TextField {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => self.handle_key(key),
            Message::Paste(text) if self.focus => self.insert(&text),
            Message::KeyPress(_) | Message::Paste(_) => Command::none(),
            Message::Changed(_) | Message::Submit(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = match self.tone {
            FieldTone::Normal => self.style.normal,
            FieldTone::Error => self.style.error,
        };
        let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);

        let line = if self.value.is_empty() && !self.focus {
            Line::from(Span::styled(self.placeholder.as_str(), self.style.placeholder))
        } else {
            let (start, end) = self.visible_range(usize::from(row.width));
            let mut spans = Vec::new();
            if self.focus {
                let before: String = self.value[start..self.cursor.max(start)].iter().collect();
                spans.push(Span::raw(before));
                match self.value.get(self.cursor) {
                    Some(c) if self.cursor < end => {
                        spans.push(Span::styled(c.to_string(), self.style.cursor));
                        let after: String = self.value[self.cursor + 1..end].iter().collect();
                        spans.push(Span::raw(after));
                    }
                    _ => spans.push(Span::styled(" ", self.style.cursor)),
                }
            } else {
                spans.push(Span::raw(self.value[start..end].iter().collect::<String>()));
            }
            Line::from(spans)
        };

        frame.render_widget(
            Paragraph::new(line).style(base).alignment(self.alignment),
            row,
        );
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
