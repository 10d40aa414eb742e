//! Key bindings, plus the [`KeyMap`] trait used to build help lines.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// A key binding that maps one or more key combinations to a described action.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The set of key combinations that trigger this binding.
    pub keys: Vec<KeyCombination>,
    /// A human-readable description of the action this binding performs.
    pub description: String,
    /// Whether this binding is currently active. Disabled bindings never match.
    pub enabled: bool,
}

/// A single key press with optional modifier keys (Ctrl, Alt, Shift).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    /// The base key code.
    pub code: KeyCode,
    /// Modifier keys that must be held alongside the base key.
    pub modifiers: KeyModifiers,
}

impl Binding {
    /// Create a binding for several key combinations.
    pub fn new(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Whether `event` matches any of this binding's combinations.
    /// Always `false` when the binding is disabled.
    ///
    /// Modifiers must match exactly, except that an extra Shift is accepted
    /// (terminals report BackTab and uppercase letters with Shift held).
    /// Ctrl+h therefore does not trigger a binding for plain `h`.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !self.enabled {
            return false;
        }
        self.keys.iter().any(|k| {
            k.code == event.code
                && event.modifiers.contains(k.modifiers)
                && event
                    .modifiers
                    .difference(k.modifiers)
                    .difference(KeyModifiers::SHIFT)
                    .is_empty()
        })
    }

    /// Set whether this binding is enabled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Short label for help text: the keys joined by `/`.
    pub fn key_label(&self) -> String {
        self.keys
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl KeyCombination {
    /// A key with no modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A key with the Ctrl modifier.
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// A key with the Shift modifier.
    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("shift+")?;
        }
        match self.code {
            KeyCode::Left => f.write_str("←"),
            KeyCode::Right => f.write_str("→"),
            KeyCode::Up => f.write_str("↑"),
            KeyCode::Down => f.write_str("↓"),
            KeyCode::PageUp => f.write_str("pgup"),
            KeyCode::PageDown => f.write_str("pgdn"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::BackTab => f.write_str("shift+tab"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Types that publish their key bindings for help display.
pub trait KeyMap {
    /// The most important bindings, in display order.
    fn short_help(&self) -> Vec<&Binding>;
}

/// Render a one-line help string (`keys description · keys description`)
/// from any [`KeyMap`].
pub fn short_help_line<'a>(map: &'a dyn KeyMap, key: Style, description: Style) -> Line<'a> {
    let mut spans = Vec::new();
    for (idx, binding) in map.short_help().into_iter().filter(|b| b.enabled).enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" · ", description));
        }
        spans.push(Span::styled(binding.key_label(), key));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(binding.description.as_str(), description));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn binding_matches_any_key() {
        let b = Binding::new(
            vec![KeyCombination::new(KeyCode::Left), KeyCombination::new(KeyCode::Char('h'))],
            "down",
        );
        assert!(b.matches(&event(KeyCode::Left, KeyModifiers::NONE)));
        assert!(b.matches(&event(KeyCode::Char('h'), KeyModifiers::NONE)));
        assert!(!b.matches(&event(KeyCode::Right, KeyModifiers::NONE)));
    }

    #[test]
    fn disabled_binding_never_matches() {
        let b = Binding::new(vec![KeyCombination::new(KeyCode::Tab)], "switch").enabled(false);
        assert!(!b.matches(&event(KeyCode::Tab, KeyModifiers::NONE)));
    }

    #[test]
    fn modifiers_must_be_held() {
        let b = Binding::new(vec![KeyCombination::ctrl(KeyCode::Char('u'))], "clear");
        assert!(!b.matches(&event(KeyCode::Char('u'), KeyModifiers::NONE)));
        assert!(b.matches(&event(KeyCode::Char('u'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn extra_modifiers_do_not_match() {
        let b = Binding::new(vec![KeyCombination::new(KeyCode::Char('h'))], "left");
        assert!(!b.matches(&event(KeyCode::Char('h'), KeyModifiers::CONTROL)));
        assert!(!b.matches(&event(KeyCode::Char('h'), KeyModifiers::ALT)));
        assert!(!b.matches(&event(
            KeyCode::Char('h'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));

        let back = Binding::new(vec![KeyCombination::new(KeyCode::BackTab)], "prev");
        assert!(back.matches(&event(KeyCode::BackTab, KeyModifiers::SHIFT)));
    }

    #[test]
    fn key_label_joins_keys() {
        let b = Binding::new(
            vec![KeyCombination::new(KeyCode::Left), KeyCombination::ctrl(KeyCode::Char('b'))],
            "down",
        );
        assert_eq!(b.key_label(), "←/ctrl+b");
    }

    struct Two(Binding, Binding);

    impl KeyMap for Two {
        fn short_help(&self) -> Vec<&Binding> {
            vec![&self.0, &self.1]
        }
    }

    #[test]
    fn help_line_skips_disabled() {
        let map = Two(
            Binding::new(vec![KeyCombination::new(KeyCode::Tab)], "switch"),
            Binding::new(vec![KeyCombination::new(KeyCode::Esc)], "quit").enabled(false),
        );
        let line = short_help_line(&map, Style::default(), Style::default());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "tab switch");
    }
}
