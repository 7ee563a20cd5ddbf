use crate::event::EventError;

/// Logic level of the monitored line at the moment of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Sample {
    #[default]
    Low = 0,
    High = 1,
}

impl Sample {
    /// Returns the byte delivered to readers (`0` or `1`).
    #[inline]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Sample::High)
    }
}

impl From<bool> for Sample {
    #[inline]
    fn from(high: bool) -> Self {
        if high { Sample::High } else { Sample::Low }
    }
}

impl From<Sample> for u8 {
    #[inline]
    fn from(sample: Sample) -> Self {
        sample.as_byte()
    }
}

/// Whether a read may suspend the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    #[default]
    Blocking,
    NonBlocking,
}

/// Result of a readiness query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// An event is pending; a read would not block.
    Readable,
    /// Nothing pending; the caller is registered for the next edge.
    NotReady,
}

impl Readiness {
    /// `POLLIN` bit as used by character-device poll handlers.
    pub const POLLIN: u16 = 0x0001;
    /// `POLLRDNORM` bit as used by character-device poll handlers.
    pub const POLLRDNORM: u16 = 0x0040;

    #[inline]
    pub fn is_readable(self) -> bool {
        matches!(self, Readiness::Readable)
    }

    /// Poll event mask for this readiness state.
    #[inline]
    pub fn mask(self) -> u16 {
        match self {
            Readiness::Readable => Self::POLLIN | Self::POLLRDNORM,
            Readiness::NotReady => 0,
        }
    }
}

/// Identifier of the monitored input line (GPIO number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(u32);

impl LineId {
    /// Validates a raw line number. Negative numbers mean "unset".
    pub fn new(raw: i32) -> Result<Self, EventError> {
        u32::try_from(raw)
            .map(LineId)
            .map_err(|_| EventError::InvalidArgument)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for LineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interrupt number the line is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IrqNumber(pub u32);

impl core::fmt::Display for IrqNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Edges that raise the interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trigger {
    Rising,
    Falling,
    #[default]
    BothEdges,
}

/// Outcome of an interrupt callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqReturn {
    /// The interrupt was not for this line.
    None,
    /// The interrupt was handled.
    Handled,
}
