//! A labeled slider paired with a numeric text field, kept in sync over a
//! [`QuantizedRange`].
//!
//! Moving the slider rewrites the field with the canonical form of the new
//! value. Editing the field is validated keystroke by keystroke: text that
//! parses to an in-range number moves the slider, anything else paints the
//! field with the error tone and leaves the stored value and slider alone.
//!
//! ```text
//! ┌ label ──┐   ┌ slider ─┐   ┌ field ──┐
//!  Gain         ━━━━━●────       5.0
//! ```
//!
//! A group announces each newly committed value with [`Message::Changed`].
//! Invalid input never leaves the group; it is shown inline and nowhere else.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use panelctl_core::command::Command;
use panelctl_core::component::Component;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::focus::FocusRing;
use crate::key::{Binding, KeyCombination, KeyMap};
use crate::range::{format_value, InputError, QuantizedRange, RangeError};
use crate::slider::{self, Slider, SliderStyle};
use crate::text_field::{self, FieldTone, TextField, TextFieldStyle};

const SLIDER: usize = 0;
const FIELD: usize = 1;

/// Whether the field currently shows a committable value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldState {
    /// The field shows the committed value.
    #[default]
    Valid,
    /// The field shows text that cannot be committed, and why.
    Invalid(InputError),
}

impl FieldState {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldState::Valid)
    }
}

/// Messages for the control group.
#[derive(Debug, Clone)]
pub enum Message {
    /// A keyboard event, routed to the focused child. Ignored unless the
    /// group is focused.
    KeyPress(KeyEvent),
    /// A mouse event in terminal coordinates. Left clicks on the slider track
    /// focus the group.
    Mouse(MouseEvent),
    /// Pasted text for the field. Ignored unless the field is focused.
    Paste(String),
    /// A message for the slider.
    Slider(slider::Message),
    /// A message for the text field.
    Field(text_field::Message),
    /// Move focus between slider and field.
    FocusNext,
    FocusPrev,
    /// Emitted when a new value has been committed.
    Changed(f64),
}

/// Visual style for the [`ControlGroup`].
#[derive(Debug, Clone)]
pub struct ControlGroupStyle {
    pub label: Style,
    /// The label while the group is focused.
    pub label_focused: Style,
    pub slider: SliderStyle,
    pub field: TextFieldStyle,
}

impl Default for ControlGroupStyle {
    fn default() -> Self {
        Self {
            label: Style::default(),
            label_focused: Style::default().add_modifier(Modifier::BOLD),
            slider: SliderStyle::default(),
            field: TextFieldStyle::default(),
        }
    }
}

/// Keyboard bindings handled by the group itself.
#[derive(Debug, Clone)]
pub struct ControlGroupKeyMap {
    pub next: Binding,
    pub prev: Binding,
}

impl Default for ControlGroupKeyMap {
    fn default() -> Self {
        Self {
            next: Binding::new(vec![KeyCombination::new(KeyCode::Tab)], "slider/field"),
            prev: Binding::new(vec![KeyCombination::new(KeyCode::BackTab)], "back"),
        }
    }
}

impl KeyMap for ControlGroupKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next]
    }
}

/// A label, a slider and a text field over one value.
///
/// # Example
///
/// ```rust,ignore
/// let mut gain = ControlGroup::new("Gain", 0.0, 10.0, 1.0, 5.0)?;
/// assert_eq!(gain.tick_count(), 10);
/// assert_eq!(gain.text(), "5.0");
///
/// gain.on_text_changed("7");
/// assert_eq!(gain.value(), 7.0);
/// assert_eq!(gain.slider_position(), 7);
/// ```
pub struct ControlGroup {
    label: String,
    range: QuantizedRange,
    value: f64,
    state: FieldState,
    slider: Slider,
    field: TextField,
    ring: FocusRing,
    active: bool,
    label_style: Style,
    label_focused_style: Style,
    keymap: ControlGroupKeyMap,
}

impl ControlGroup {
    /// Build a group over `[min, max]` quantized by `step`, starting at
    /// `default`.
    ///
    /// Fails if the range is malformed (see [`QuantizedRange::new`]) or if
    /// `default` lies outside it.
    pub fn new(
        label: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    ) -> Result<Self, RangeError> {
        let range = QuantizedRange::new(min, max, step)?;
        Self::with_range(label, range, default)
    }

    /// Build a group over an existing range.
    pub fn with_range(
        label: impl Into<String>,
        range: QuantizedRange,
        default: f64,
    ) -> Result<Self, RangeError> {
        if !range.contains(default) {
            return Err(RangeError::DefaultOutOfRange {
                value: default,
                min: range.min(),
                max: range.max(),
            });
        }
        let style = ControlGroupStyle::default();
        Ok(Self {
            label: label.into(),
            range,
            value: default,
            state: FieldState::Valid,
            slider: Slider::new(range.tick_count())
                .with_position(range.position_of(default))
                .with_style(style.slider),
            field: TextField::new("")
                .with_value(&format_value(default))
                .with_style(style.field),
            ring: FocusRing::new(2),
            active: false,
            label_style: style.label,
            label_focused_style: style.label_focused,
            keymap: ControlGroupKeyMap::default(),
        })
    }

    pub fn with_style(mut self, style: ControlGroupStyle) -> Self {
        self.label_style = style.label;
        self.label_focused_style = style.label_focused;
        self.slider = Slider::new(self.range.tick_count())
            .with_position(self.slider.position())
            .with_style(style.slider);
        let text = self.field.value();
        let tone = self.tone();
        self.field = TextField::new("").with_value(&text).with_style(style.field);
        self.field.set_tone(tone);
        self.sync_focus();
        self
    }

    pub fn with_keymap(mut self, keymap: ControlGroupKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The last committed value.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn range(&self) -> &QuantizedRange {
        &self.range
    }

    pub fn tick_count(&self) -> u32 {
        self.range.tick_count()
    }

    pub fn slider_position(&self) -> u32 {
        self.slider.position()
    }

    /// What the field currently shows, valid or not.
    pub fn text(&self) -> String {
        self.field.value()
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn tone(&self) -> FieldTone {
        if self.state.is_valid() {
            FieldTone::Normal
        } else {
            FieldTone::Error
        }
    }

    /// Whether keyboard input inside the group goes to the text field.
    pub fn field_focused(&self) -> bool {
        self.active && self.ring.is_focused(FIELD)
    }

    /// Whether keyboard input inside the group goes to the slider.
    pub fn slider_focused(&self) -> bool {
        self.active && self.ring.is_focused(SLIDER)
    }

    pub fn keymap(&self) -> &ControlGroupKeyMap {
        &self.keymap
    }

    /// Bindings of the child that currently takes keys, for help lines.
    pub fn slider_keymap(&self) -> &slider::SliderKeyMap {
        self.slider.keymap()
    }

    /// Give the group keyboard focus, on whichever child had it last.
    pub fn focus(&mut self) {
        self.active = true;
        self.sync_focus();
    }

    pub fn blur(&mut self) {
        self.active = false;
        self.sync_focus();
    }

    /// The slider settled on `position`.
    ///
    /// The value becomes `position * step + min` and the field shows its
    /// canonical text with the normal tone, whatever it held before.
    pub fn on_slider_moved(&mut self, position: u32) -> Command<Message> {
        self.slider.set_position(position);
        let value = self.range.value_at(self.slider.position());
        self.field.set_value(&format_value(value));
        self.field.set_tone(FieldTone::Normal);
        self.state = FieldState::Valid;
        self.commit(value)
    }

    /// The field's content became `text`.
    ///
    /// Valid text commits its value and moves the slider. Invalid text stays
    /// in the field as typed, the field takes the error tone and keyboard
    /// focus, and the committed value is untouched.
    pub fn on_text_changed(&mut self, text: &str) -> Command<Message> {
        if self.field.value() != text {
            self.field.set_value(text);
        }
        match self.range.validate(text) {
            Ok(value) => {
                self.slider.set_position(self.range.position_of(value));
                self.field.set_tone(FieldTone::Normal);
                self.state = FieldState::Valid;
                self.commit(value)
            }
            Err(err) => {
                self.field.set_tone(FieldTone::Error);
                self.state = FieldState::Invalid(err);
                self.active = true;
                self.ring.set(FIELD);
                self.sync_focus();
                Command::none()
            }
        }
    }

    fn commit(&mut self, value: f64) -> Command<Message> {
        if value == self.value {
            return Command::none();
        }
        self.value = value;
        Command::message(Message::Changed(value))
    }

    /// Push the group's focus down to the children. A valid field that loses
    /// focus is rewritten in canonical form.
    fn sync_focus(&mut self) {
        if self.slider_focused() {
            self.slider.focus();
        } else {
            self.slider.blur();
        }
        if self.field_focused() {
            self.field.focus();
        } else {
            self.field.blur();
            if self.state.is_valid() {
                self.field.set_value(&format_value(self.value));
            }
        }
    }

    fn absorb(&mut self, messages: Vec<Message>) -> Command<Message> {
        let mut cmds = Vec::with_capacity(messages.len());
        for msg in messages {
            cmds.push(self.update(msg));
        }
        Command::batch(cmds)
    }

    fn route_slider(&mut self, msg: slider::Message) -> Command<Message> {
        match msg {
            slider::Message::Changed(position) => self.on_slider_moved(position),
            other => {
                let emitted = self.slider.update(other).into_messages();
                self.absorb(emitted.into_iter().map(Message::Slider).collect())
            }
        }
    }

    fn route_field(&mut self, msg: text_field::Message) -> Command<Message> {
        match msg {
            text_field::Message::Changed(text) => self.on_text_changed(&text),
            text_field::Message::Submit(_) => {
                if self.state.is_valid() {
                    self.field.set_value(&format_value(self.value));
                }
                Command::none()
            }
            other => {
                let emitted = self.field.update(other).into_messages();
                self.absorb(emitted.into_iter().map(Message::Field).collect())
            }
        }
    }
}

impl Component for ControlGroup {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(_) if !self.active => Command::none(),
            Message::KeyPress(key) => {
                if self.keymap.next.matches(&key) {
                    self.update(Message::FocusNext)
                } else if self.keymap.prev.matches(&key) {
                    self.update(Message::FocusPrev)
                } else if self.ring.is_focused(FIELD) {
                    self.route_field(text_field::Message::KeyPress(key))
                } else {
                    self.route_slider(slider::Message::KeyPress(key))
                }
            }
            Message::Mouse(mouse) => {
                if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
                    && self.slider.hit(mouse.column, mouse.row)
                {
                    self.active = true;
                    self.ring.set(SLIDER);
                    self.sync_focus();
                }
                self.route_slider(slider::Message::Mouse(mouse))
            }
            Message::Paste(text) if self.field_focused() => {
                self.route_field(text_field::Message::Paste(text))
            }
            Message::Paste(_) => Command::none(),
            Message::Slider(msg) => self.route_slider(msg),
            Message::Field(msg) => self.route_field(msg),
            Message::FocusNext => {
                self.ring.next();
                self.sync_focus();
                Command::none()
            }
            Message::FocusPrev => {
                self.ring.prev();
                self.sync_focus();
                Command::none()
            }
            Message::Changed(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let [label, _, slider, _, field] = Layout::horizontal([
            Constraint::Fill(3),
            Constraint::Fill(1),
            Constraint::Fill(3),
            Constraint::Fill(1),
            Constraint::Fill(3),
        ])
        .areas(area);

        let style = if self.active {
            self.label_focused_style
        } else {
            self.label_style
        };
        let row = Rect::new(label.x, label.y + label.height / 2, label.width, 1);
        frame.render_widget(Paragraph::new(Span::styled(self.label.as_str(), style)), row);

        self.slider.view(frame, slider);
        self.field.view(frame, field);
    }

    fn focused(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use panelctl_core::testing::{buffer_to_string, render_component};
    use ratatui::style::Color;

    fn gain() -> ControlGroup {
        ControlGroup::new("Gain", 0.0, 10.0, 1.0, 5.0).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn changed(cmd: Command<Message>) -> Vec<f64> {
        cmd.into_messages()
            .into_iter()
            .filter_map(|m| match m {
                Message::Changed(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn construction_seeds_every_view() {
        let g = gain();
        assert_eq!(g.tick_count(), 10);
        assert_eq!(g.slider_position(), 5);
        assert_eq!(g.text(), "5.0");
        assert_eq!(g.value(), 5.0);
        assert!(g.state().is_valid());
        assert!(!g.focused());
    }

    #[test]
    fn construction_rejects_bad_contracts() {
        assert!(matches!(
            ControlGroup::new("x", 0.0, 10.0, 0.0, 5.0),
            Err(RangeError::NonPositiveStep(_))
        ));
        assert!(matches!(
            ControlGroup::new("x", 10.0, 0.0, 1.0, 5.0),
            Err(RangeError::EmptyRange { .. })
        ));
        assert_eq!(
            ControlGroup::new("x", 0.0, 10.0, 1.0, 11.0).err(),
            Some(RangeError::DefaultOutOfRange {
                value: 11.0,
                min: 0.0,
                max: 10.0
            })
        );
        assert!(matches!(
            ControlGroup::new("fine", 0.0, 1.0e7, 1.0e-3, 9.0e6),
            Err(RangeError::TooManyTicks { .. })
        ));
    }

    #[test]
    fn default_between_ticks_truncates() {
        let g = ControlGroup::new("x", 0.0, 1.0, 0.25, 0.6).unwrap();
        assert_eq!(g.tick_count(), 4);
        assert_eq!(g.slider_position(), 2);
        assert_eq!(g.value(), 0.6);
    }

    #[test]
    fn valid_text_commits() {
        let mut g = gain();
        assert_eq!(changed(g.on_text_changed("7")), vec![7.0]);
        assert_eq!(g.value(), 7.0);
        assert_eq!(g.slider_position(), 7);
        assert_eq!(g.state(), &FieldState::Valid);
        assert_eq!(g.tone(), FieldTone::Normal);
    }

    #[test]
    fn out_of_range_text_is_rejected() {
        let mut g = gain();
        assert!(g.on_text_changed("15").is_none());
        assert!(matches!(g.state(), FieldState::Invalid(InputError::OutOfRange { .. })));
        assert_eq!(g.tone(), FieldTone::Error);
        assert_eq!(g.value(), 5.0);
        assert_eq!(g.slider_position(), 5);
        assert!(g.field_focused());
        assert!(g.focused());
        // The typed text stays for the user to correct.
        assert_eq!(g.text(), "15");
    }

    #[test]
    fn unparseable_text_is_rejected() {
        let mut g = gain();
        g.on_text_changed("abc");
        assert!(matches!(g.state(), FieldState::Invalid(InputError::Unparseable { .. })));
        assert_eq!(g.value(), 5.0);
        assert_eq!(g.slider_position(), 5);
    }

    #[test]
    fn slider_move_rewrites_text_and_clears_error() {
        let mut g = gain();
        g.on_text_changed("15");
        assert_eq!(changed(g.on_slider_moved(3)), vec![3.0]);
        assert_eq!(g.value(), 3.0);
        assert_eq!(g.text(), "3.0");
        assert!(g.state().is_valid());
        assert_eq!(g.tone(), FieldTone::Normal);
    }

    #[test]
    fn slider_move_past_end_clamps() {
        let mut g = gain();
        g.on_slider_moved(99);
        assert_eq!(g.slider_position(), 10);
        assert_eq!(g.value(), 10.0);
    }

    #[test]
    fn same_valid_text_twice_is_idempotent() {
        let mut g = gain();
        assert_eq!(changed(g.on_text_changed("2.5")), vec![2.5]);
        assert!(changed(g.on_text_changed("2.5")).is_empty());
        assert_eq!(g.value(), 2.5);
        assert_eq!(g.slider_position(), 2);
    }

    #[test]
    fn typing_through_the_field_validates_each_keystroke() {
        let mut g = gain();
        g.focus();
        g.update(Message::FocusNext);
        assert!(g.field_focused());

        g.update(Message::KeyPress(key(KeyCode::Backspace)));
        g.update(Message::KeyPress(key(KeyCode::Backspace)));
        assert_eq!(g.text(), "5");
        assert!(g.state().is_valid());

        let cmd = g.update(Message::KeyPress(key(KeyCode::Char('0'))));
        assert!(changed(cmd).is_empty());
        assert_eq!(g.text(), "50");
        assert!(!g.state().is_valid());
        assert_eq!(g.value(), 5.0);

        let cmd = g.update(Message::KeyPress(key(KeyCode::Backspace)));
        assert!(changed(cmd).is_empty());
        assert!(g.state().is_valid());

        g.update(Message::KeyPress(key(KeyCode::Backspace)));
        assert!(!g.state().is_valid());
        let cmd = g.update(Message::KeyPress(key(KeyCode::Char('8'))));
        assert_eq!(changed(cmd), vec![8.0]);
        assert_eq!(g.slider_position(), 8);
    }

    #[test]
    fn slider_keys_update_the_field() {
        let mut g = gain();
        g.focus();
        assert!(g.slider_focused());
        let cmd = g.update(Message::KeyPress(key(KeyCode::Right)));
        assert_eq!(changed(cmd), vec![6.0]);
        assert_eq!(g.text(), "6.0");
    }

    #[test]
    fn unfocused_group_ignores_keys() {
        let mut g = gain();
        assert!(g.update(Message::KeyPress(key(KeyCode::Right))).is_none());
        assert_eq!(g.value(), 5.0);
    }

    #[test]
    fn paste_into_focused_field_is_validated() {
        let mut g = gain();
        g.focus();
        g.update(Message::FocusNext);
        g.update(Message::KeyPress(KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('u'))
        }));
        assert_eq!(g.text(), "");
        assert!(!g.state().is_valid());

        assert_eq!(changed(g.update(Message::Paste("7".into()))), vec![7.0]);
        assert_eq!(g.slider_position(), 7);
        assert!(g.state().is_valid());

        assert!(changed(g.update(Message::Paste("x".into()))).is_empty());
        assert_eq!(g.text(), "7x");
        assert_eq!(g.tone(), FieldTone::Error);
        assert_eq!(g.value(), 7.0);
        assert_eq!(g.slider_position(), 7);
    }

    #[test]
    fn paste_outside_the_field_is_ignored() {
        let mut g = gain();
        assert!(g.update(Message::Paste("3".into())).is_none());

        g.focus();
        assert!(g.slider_focused());
        assert!(g.update(Message::Paste("3".into())).is_none());
        assert_eq!(g.text(), "5.0");
        assert_eq!(g.value(), 5.0);
        assert_eq!(g.slider_position(), 5);
    }

    #[test]
    fn tab_toggles_between_children() {
        let mut g = gain();
        g.focus();
        g.update(Message::KeyPress(key(KeyCode::Tab)));
        assert!(g.field_focused());
        g.update(Message::KeyPress(key(KeyCode::Tab)));
        assert!(g.slider_focused());
        g.update(Message::KeyPress(KeyEvent {
            code: KeyCode::BackTab,
            modifiers: KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }));
        assert!(g.field_focused());
    }

    #[test]
    fn leaving_a_valid_field_canonicalizes_text() {
        let mut g = gain();
        g.focus();
        g.update(Message::FocusNext);
        g.on_text_changed("7");
        assert_eq!(g.text(), "7");
        g.update(Message::FocusNext);
        assert_eq!(g.text(), "7.0");
    }

    #[test]
    fn leaving_an_invalid_field_keeps_text() {
        let mut g = gain();
        g.on_text_changed("1e");
        g.blur();
        assert_eq!(g.text(), "1e");
        assert_eq!(g.tone(), FieldTone::Error);
    }

    #[test]
    fn enter_canonicalizes_valid_text() {
        let mut g = gain();
        g.focus();
        g.update(Message::FocusNext);
        g.on_text_changed("4");
        g.update(Message::KeyPress(key(KeyCode::Enter)));
        assert_eq!(g.text(), "4.0");
    }

    #[test]
    fn forwarded_child_messages_are_handled() {
        let mut g = gain();
        assert_eq!(changed(g.update(Message::Slider(slider::Message::Changed(2)))), vec![2.0]);
        assert_eq!(
            changed(g.update(Message::Field(text_field::Message::Changed("9".into())))),
            vec![9.0]
        );
        assert_eq!(g.text(), "9");
        assert_eq!(g.slider_position(), 9);
    }

    #[test]
    fn click_on_track_focuses_slider_and_commits() {
        let mut g = gain();
        let buf = render_component(&g, 33, 1);
        // The slider occupies the middle third after the label and a spacer.
        let track_start = (0..33u16)
            .find(|&x| g.slider.hit(x, 0))
            .expect("slider was rendered");
        assert!(buffer_to_string(&buf).contains('●'));

        let cmd = g.update(Message::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: track_start,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }));
        assert_eq!(changed(cmd), vec![0.0]);
        assert!(g.slider_focused());
        assert_eq!(g.text(), "0.0");
    }

    #[test]
    fn renders_label_slider_and_field_in_a_row() {
        let g = gain();
        let out = buffer_to_string(&render_component(&g, 33, 3));
        let rows: Vec<&str> = out.split('\n').collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].starts_with("Gain"));
        assert!(rows[1].contains('●'));
        assert!(rows[1].contains("5.0"));
    }

    #[test]
    fn error_tone_is_visible() {
        let mut g = gain();
        g.on_text_changed("15");
        let buf = render_component(&g, 33, 1);
        let pink = (0..33u16).any(|x| buf[(x, 0)].bg == Color::Rgb(255, 192, 203));
        assert!(pink);
    }
}
