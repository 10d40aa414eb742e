//! **panelctl** -- terminal control panels built from labeled sliders with
//! validated numeric fields, on top of [`ratatui`].
//!
//! This is the umbrella crate that re-exports everything needed to build a
//! panel from a single dependency:
//!
//! ```toml
//! [dependencies]
//! panelctl = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`panelctl_core`] are available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Subscription`], [`Program`],
//!   [`run`], [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from [`panelctl_widgets`]
//!   (control groups, sliders, text fields, ranges).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use panelctl::widgets::control_group::{self, ControlGroup};
//! use panelctl::{terminal_events, Command, Component, Model, Subscription, TerminalEvent};
//! use ratatui::Frame;
//!
//! struct Gain(ControlGroup);
//!
//! enum Msg {
//!     Gain(control_group::Message),
//!     Quit,
//! }
//!
//! impl Model for Gain {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         let mut group = ControlGroup::new("Gain", 0.0, 10.0, 1.0, 5.0).unwrap();
//!         group.focus();
//!         (Gain(group), Command::none())
//!     }
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Gain(m) => self.0.update(m).map(Msg::Gain),
//!             Msg::Quit => Command::quit(),
//!         }
//!     }
//!     fn view(&self, frame: &mut Frame) {
//!         self.0.view(frame, frame.area());
//!     }
//!     fn subscriptions(&self) -> Vec<Subscription<Msg>> {
//!         vec![terminal_events(|ev| match ev {
//!             TerminalEvent::Key(k) if k.code == crossterm::event::KeyCode::Esc => Some(Msg::Quit),
//!             TerminalEvent::Key(k) => Some(Msg::Gain(control_group::Message::KeyPress(k))),
//!             _ => None,
//!         })]
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     panelctl::run::<Gain>(()).await.unwrap();
//! }
//! ```

pub use panelctl_core::*;
pub mod widgets {
    pub use panelctl_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
