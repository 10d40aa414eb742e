//! # Control Panel Demo
//!
//! A stack of control groups, each a label, a slider and a numeric field kept
//! in sync:
//! - Up/Down pick the active group
//! - Tab switches between slider and field inside the group
//! - Left/Right, PageUp/PageDown and Home/End move the slider
//! - Typing an out-of-range or non-numeric value turns the field pink
//! - Committed values are appended to the log file when one is given
//!
//! Controls come from a TOML file (`--config panel.toml`) or a built-in set:
//!
//! ```toml
//! title = "Mixer"
//!
//! [[controls]]
//! label = "Gain"
//! min = 0.0
//! max = 10.0
//! step = 1.0
//! default = 5.0
//! ```
//!
//! Run with: `cargo run --example control_panel -- --mouse`

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use panelctl::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use panelctl::ratatui::layout::{Alignment, Constraint, Layout};
use panelctl::ratatui::style::{Color, Style};
use panelctl::ratatui::widgets::{Block, Borders, Paragraph};
use panelctl::ratatui::Frame;
use panelctl::widgets::config::{ControlSpec, PanelSpec};
use panelctl::widgets::control_group::{self, ControlGroup};
use panelctl::widgets::focus::FocusRing;
use panelctl::widgets::key::short_help_line;
use panelctl::{
    log_to_file, terminal_events, Command, Component, Model, ProgramOptions, Subscription,
    TerminalEvent,
};

#[derive(Parser)]
#[command(name = "control_panel", about = "Sliders with validated numeric fields")]
struct Cli {
    /// Path to a TOML panel definition.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append committed values and runtime events to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable mouse capture so sliders can be clicked and dragged.
    #[arg(long, default_value_t = false)]
    mouse: bool,
}

struct Flags {
    title: String,
    groups: Vec<ControlGroup>,
    log: Option<File>,
}

struct Panel {
    title: String,
    groups: Vec<ControlGroup>,
    ring: FocusRing,
    log: Option<File>,
    last: Option<String>,
}

#[derive(Debug)]
enum Msg {
    Group(usize, control_group::Message),
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    Quit,
}

impl Panel {
    fn current(&self) -> Option<&ControlGroup> {
        self.groups.get(self.ring.current())
    }

    fn select(&mut self, index: usize) {
        if let Some(group) = self.groups.get_mut(self.ring.current()) {
            group.blur();
        }
        self.ring.set(index);
        if let Some(group) = self.groups.get_mut(self.ring.current()) {
            group.focus();
        }
    }

    fn route(&mut self, index: usize, msg: control_group::Message) -> Command<Msg> {
        let Some(group) = self.groups.get_mut(index) else {
            return Command::none();
        };
        let cmd = group.update(msg);
        // A group grabs focus on a slider click or an invalid edit.
        if index != self.ring.current() && group.focused() {
            self.select(index);
        }
        cmd.map(move |m| Msg::Group(index, m))
    }

    fn record(&mut self, index: usize, value: f64) {
        let Some(group) = self.groups.get(index) else {
            return;
        };
        let line = format!("{} = {value}", group.label());
        if let Some(ref mut f) = self.log {
            let _ = writeln!(f, "{line}");
        }
        self.last = Some(line);
    }
}

impl Model for Panel {
    type Message = Msg;
    type Flags = Flags;

    fn init(flags: Flags) -> (Self, Command<Msg>) {
        let mut panel = Panel {
            title: flags.title,
            ring: FocusRing::new(flags.groups.len()),
            groups: flags.groups,
            log: flags.log,
            last: None,
        };
        panel.select(0);
        (panel, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Group(index, control_group::Message::Changed(value)) => {
                self.record(index, value);
                Command::none()
            }
            Msg::Group(index, m) => self.route(index, m),
            Msg::Key(key) => match key.code {
                KeyCode::Up => {
                    let mut ring = self.ring;
                    ring.prev();
                    self.select(ring.current());
                    Command::none()
                }
                KeyCode::Down => {
                    let mut ring = self.ring;
                    ring.next();
                    self.select(ring.current());
                    Command::none()
                }
                _ => self.route(self.ring.current(), control_group::Message::KeyPress(key)),
            },
            Msg::Mouse(mouse) => {
                let cmds: Vec<_> = (0..self.groups.len())
                    .map(|i| self.route(i, control_group::Message::Mouse(mouse)))
                    .collect();
                Command::batch(cmds)
            }
            Msg::Paste(text) => self.route(self.ring.current(), control_group::Message::Paste(text)),
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title.as_str())
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(frame.area());
        frame.render_widget(block, frame.area());

        let [rows_area, status_area, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let rows = Layout::vertical(self.groups.iter().map(|_| Constraint::Length(3)))
            .split(rows_area);
        for (group, area) in self.groups.iter().zip(rows.iter()) {
            group.view(frame, *area);
        }

        let status = match self.current() {
            Some(group) if !group.state().is_valid() => {
                Paragraph::new(format!("{}: value not committed", group.label()))
                    .style(Style::default().fg(Color::Red))
            }
            _ => Paragraph::new(self.last.clone().unwrap_or_default())
                .style(Style::default().fg(Color::Green)),
        };
        frame.render_widget(status.alignment(Alignment::Center), status_area);

        if let Some(group) = self.current() {
            let key = Style::default().fg(Color::Cyan);
            let desc = Style::default().fg(Color::DarkGray);
            let help = if group.field_focused() {
                short_help_line(group.keymap(), key, desc)
            } else {
                short_help_line(group.slider_keymap(), key, desc)
            };
            frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), help_area);
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        vec![terminal_events(|ev| match ev {
            TerminalEvent::Key(key) => match (key.code, key.modifiers) {
                (KeyCode::Esc, _) => Some(Msg::Quit),
                (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Msg::Quit),
                _ => TerminalEvent::Key(key).key_press().map(Msg::Key),
            },
            TerminalEvent::Mouse(mouse) => Some(Msg::Mouse(mouse)),
            TerminalEvent::Paste(text) => Some(Msg::Paste(text)),
            _ => None,
        })]
    }
}

fn builtin_panel() -> PanelSpec {
    PanelSpec {
        title: Some("Mixer".to_string()),
        controls: vec![
            ControlSpec::new("Gain", 0.0, 10.0, 1.0, 5.0),
            ControlSpec::new("Pan", -1.0, 1.0, 0.25, 0.0),
            ControlSpec::new("Cutoff", 20.0, 20000.0, 10.0, 1000.0),
        ],
    }
}

fn load_panel(path: Option<&PathBuf>) -> Result<PanelSpec, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        None => Ok(builtin_panel()),
    }
}

#[panelctl::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let spec = load_panel(cli.config.as_ref())?;
    let groups = spec.build()?;
    let log = match cli.log_file {
        Some(ref path) => Some(log_to_file(path)?),
        None => None,
    };

    let options = ProgramOptions {
        mouse_capture: cli.mouse,
        title: Some("panelctl".to_string()),
        log_file: cli.log_file,
        ..ProgramOptions::default()
    };
    let flags = Flags {
        title: spec.title.unwrap_or_else(|| "Controls".to_string()),
        groups,
        log,
    };
    panelctl::run_with::<Panel>(flags, options).await?;
    Ok(())
}
