use serde::{Deserialize, Serialize};

use crate::decimal::Rate;

/// non-fatal conditions reported alongside a best-effort result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// rate is numerically valid but not one of the sanctioned tiers
    OffPolicyRate {
        rate: Rate,
        nearest: Rate,
    },
    /// inputs contradict each other, usually an upstream data-integrity issue
    InconsistentState {
        reason: String,
    },
    /// overdue cycle projection was truncated
    OverdueCyclesCapped {
        requested: u32,
        cap: u32,
    },
}

impl Warning {
    pub fn inconsistent(reason: impl Into<String>) -> Self {
        Warning::InconsistentState {
            reason: reason.into(),
        }
    }
}

/// collects warnings raised during a single calculation
#[derive(Debug, Default, Clone)]
pub struct Warnings {
    warnings: Vec<Warning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// record a warning and log it
    pub fn emit(&mut self, warning: Warning) {
        match &warning {
            Warning::OffPolicyRate { rate, nearest } => {
                tracing::warn!(%rate, %nearest, "rate is outside the sanctioned tiers");
            }
            Warning::InconsistentState { reason } => {
                tracing::warn!(%reason, "inconsistent loan state");
            }
            Warning::OverdueCyclesCapped { requested, cap } => {
                tracing::warn!(requested, cap, "overdue cycle projection capped");
            }
        }
        self.warnings.push(warning);
    }

    pub fn extend(&mut self, other: Warnings) {
        for warning in other.warnings {
            self.warnings.push(warning);
        }
    }

    pub fn take(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn as_slice(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.warnings
    }
}

/// a value together with the warnings raised while computing it
#[derive(Debug, Clone)]
pub struct Checked<T> {
    pub value: T,
    pub warnings: Warnings,
}

impl<T> Checked<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Warnings::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Warnings) -> Self {
        Self { value, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// move the warnings into `sink` and return the value
    pub fn into_value(self, sink: &mut Warnings) -> T {
        sink.extend(self.warnings);
        self.value
    }
}
