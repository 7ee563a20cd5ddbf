use crate::event::Sample;

/// Single-slot mailbox: the most recent sample and whether it is unread.
///
/// Not synchronized by itself; `EventChannel` keeps it behind a critical
/// section so both fields always move together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct EventState {
    last_value: Sample,
    pending: bool,
}

impl EventState {
    pub(crate) const fn new(initial: Sample) -> Self {
        Self {
            last_value: initial,
            pending: false,
        }
    }

    /// Overwrites the slot and marks it pending.
    pub(crate) fn publish(&mut self, sample: Sample) {
        self.last_value = sample;
        self.pending = true;
    }

    /// Takes the pending sample, if any.
    pub(crate) fn try_consume(&mut self) -> Option<Sample> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        Some(self.last_value)
    }

    pub(crate) fn peek_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn last_value(&self) -> Sample {
        self.last_value
    }

    /// Stores an informational sample without making it deliverable.
    pub(crate) fn reseed(&mut self, sample: Sample) {
        self.last_value = sample;
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let mut state = EventState::new(Sample::High);
        assert!(!state.peek_pending());
        assert_eq!(state.last_value(), Sample::High);
        assert_eq!(state.try_consume(), None);
    }

    #[test]
    fn last_write_wins() {
        let mut state = EventState::default();
        state.publish(Sample::High);
        state.publish(Sample::Low);
        state.publish(Sample::High);

        assert_eq!(state.try_consume(), Some(Sample::High));
        assert_eq!(state.try_consume(), None);
    }

    #[test]
    fn consume_clears_pending() {
        let mut state = EventState::default();
        state.publish(Sample::Low);
        assert!(state.peek_pending());

        assert_eq!(state.try_consume(), Some(Sample::Low));
        assert!(!state.peek_pending());
    }

    #[test]
    fn reseed_discards_pending_event() {
        let mut state = EventState::default();
        state.publish(Sample::High);
        state.reseed(Sample::Low);

        assert!(!state.peek_pending());
        assert_eq!(state.last_value(), Sample::Low);
    }
}
