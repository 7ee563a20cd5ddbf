/// Errors reported by the event channel and its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventError {
    /// Malformed request: empty read buffer or invalid line id.
    InvalidArgument,
    /// Non-blocking read with no pending event.
    WouldBlock,
    /// Blocking wait cancelled through the reader's interrupter.
    Interrupted,
    /// Line, interrupt or reader slot could not be acquired.
    ResourceUnavailable,
}

impl core::fmt::Display for EventError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EventError::InvalidArgument => write!(f, "invalid argument"),
            EventError::WouldBlock => write!(f, "no event pending, operation would block"),
            EventError::Interrupted => write!(f, "wait interrupted"),
            EventError::ResourceUnavailable => write!(f, "resource unavailable"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EventError {}
