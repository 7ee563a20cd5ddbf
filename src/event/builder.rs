use crate::event::{LineId, Trigger};

/// Label used for the line and interrupt when none is configured.
pub const DEFAULT_LABEL: &str = "pir-edge";

/// Validated activation settings produced by [`DriverBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    line: LineId,
    trigger: Trigger,
    label: &'static str,
}

impl DriverConfig {
    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Typestate builder for [`DriverConfig`].
///
/// Unset fields are `()`; `build` only exists once both the line and the
/// trigger are chosen.
#[derive(Debug)]
pub struct DriverBuilder<L, T> {
    line: L,
    trigger: T,
    label: &'static str,
}

impl Default for DriverBuilder<(), ()> {
    fn default() -> Self {
        Self::new()
    }
}

// Nothing chosen yet
impl DriverBuilder<(), ()> {
    pub fn new() -> Self {
        DriverBuilder {
            line: (),
            trigger: (),
            label: DEFAULT_LABEL,
        }
    }

    /// Set the monitored line
    pub fn line(self, line: LineId) -> DriverBuilder<LineId, ()> {
        DriverBuilder {
            line,
            trigger: (),
            label: self.label,
        }
    }
}

// Line chosen, trigger pending
impl DriverBuilder<LineId, ()> {
    pub fn trigger(self, trigger: Trigger) -> DriverBuilder<LineId, Trigger> {
        DriverBuilder {
            line: self.line,
            trigger,
            label: self.label,
        }
    }

    /// Interrupt on both rising and falling edges
    pub fn both_edges(self) -> DriverBuilder<LineId, Trigger> {
        self.trigger(Trigger::BothEdges)
    }
}

impl<L, T> DriverBuilder<L, T> {
    /// Label passed to the platform when requesting the line and interrupt.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

// Line and trigger chosen
impl DriverBuilder<LineId, Trigger> {
    pub fn build(self) -> DriverConfig {
        DriverConfig {
            line: self.line,
            trigger: self.trigger,
            label: self.label,
        }
    }
}
