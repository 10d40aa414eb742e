//! Serializable control definitions (feature `serde`).
//!
//! A panel is described as a list of controls:
//!
//! ```toml
//! title = "Mixer"
//!
//! [[controls]]
//! label = "Gain"
//! min = 0.0
//! max = 10.0
//! step = 0.5
//! default = 5.0
//! ```
//!
//! Building a [`ControlSpec`] runs the same checks as [`ControlGroup::new`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::control_group::ControlGroup;
use crate::range::RangeError;

/// One control group's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSpec {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Starting value. Defaults to `min` when omitted.
    #[serde(default)]
    pub default: Option<f64>,
}

/// A titled list of controls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelSpec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub controls: Vec<ControlSpec>,
}

/// A control in a panel definition could not be built.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("control {label:?}: {source}")]
pub struct SpecError {
    pub label: String,
    #[source]
    pub source: RangeError,
}

impl ControlSpec {
    pub fn new(label: impl Into<String>, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            label: label.into(),
            min,
            max,
            step,
            default: Some(default),
        }
    }

    pub fn build(&self) -> Result<ControlGroup, RangeError> {
        ControlGroup::new(
            self.label.clone(),
            self.min,
            self.max,
            self.step,
            self.default.unwrap_or(self.min),
        )
    }
}

impl PanelSpec {
    /// Build every control in order, stopping at the first bad one.
    pub fn build(&self) -> Result<Vec<ControlGroup>, SpecError> {
        self.controls
            .iter()
            .map(|spec| {
                spec.build().map_err(|source| SpecError {
                    label: spec.label.clone(),
                    source,
                })
            })
            .collect()
    }
}
