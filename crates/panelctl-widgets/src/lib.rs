//! Control panel widgets for **panelctl**.
//!
//! Every widget implements [`panelctl_core::Component`], so it can be embedded
//! in any [`panelctl_core::Model`] and placed with [`ratatui`] layouts.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`control_group`] | Label, slider and numeric field kept in sync over one value |
//! | [`slider`] | Discrete horizontal slider with tick marks |
//! | [`text_field`] | Single-line text field with a normal/error background tone |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`range`] | [`QuantizedRange`](range::QuantizedRange) and two-stage text validation |
//! | [`focus`] | [`FocusRing`](focus::FocusRing) for cycling keyboard focus |
//! | [`key`] | Key bindings and help-line rendering |
//! | `config` | Serializable control definitions (feature `serde`) |

#[cfg(feature = "serde")]
pub mod config;
pub mod control_group;
pub mod focus;
pub mod key;
pub mod range;
pub mod slider;
pub mod text_field;

pub use control_group::{ControlGroup, FieldState};
pub use range::{format_value, InputError, QuantizedRange, RangeError};
