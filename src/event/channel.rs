use core::cell::RefCell;

use bitmaps::{Bits, BitsImpl};
use critical_section::Mutex;

use crate::event::{
    EventError, Sample, handle::Reader, state::EventState, waiters::WaiterTable,
};

pub(crate) struct Inner<const W: usize>
where
    BitsImpl<W>: Bits,
{
    pub(crate) state: EventState,
    pub(crate) waiters: WaiterTable<W>,
}

/// Event state and wait channel for one monitored line.
///
/// The edge callback publishes into it from interrupt context; readers opened
/// with [`EventChannel::open`] consume from it. Every access runs inside a
/// short critical section that copies or updates a handful of fields.
///
/// # Const Generics
/// - `W`: maximum number of simultaneously open readers
pub struct EventChannel<const W: usize>
where
    BitsImpl<W>: Bits,
{
    inner: Mutex<RefCell<Inner<W>>>,
}

impl<const W: usize> core::fmt::Debug for EventChannel<W>
where
    BitsImpl<W>: Bits,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventChannel").finish_non_exhaustive()
    }
}

impl<const W: usize> Default for EventChannel<W>
where
    BitsImpl<W>: Bits,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize> EventChannel<W>
where
    BitsImpl<W>: Bits,
{
    pub fn new() -> Self {
        Self::with_initial(Sample::Low)
    }

    /// Creates a channel whose informational sample is `initial`.
    pub fn with_initial(initial: Sample) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                state: EventState::new(initial),
                waiters: WaiterTable::new(),
            })),
        }
    }

    pub(crate) fn with_inner<R>(&self, f: impl FnOnce(&mut Inner<W>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Stores `sample`, marks it pending and wakes every parked waiter.
    ///
    /// Never blocks and never allocates; safe to call from interrupt context.
    /// Returns the number of waiters woken.
    pub fn publish(&self, sample: Sample) -> usize {
        let wakers = self.with_inner(|inner| {
            inner.state.publish(sample);
            inner.waiters.take_all()
        });
        let woken = wakers.len();
        for waker in wakers {
            waker.wake();
        }
        woken
    }

    /// Takes the pending sample, if any. Concurrent callers never both
    /// receive the same event.
    pub fn try_consume(&self) -> Option<Sample> {
        self.with_inner(|inner| inner.state.try_consume())
    }

    pub fn peek_pending(&self) -> bool {
        self.with_inner(|inner| inner.state.peek_pending())
    }

    /// Most recent sample, whether or not it has been consumed.
    pub fn last_value(&self) -> Sample {
        self.with_inner(|inner| inner.state.last_value())
    }

    /// Resets the slot to `sample` with nothing pending.
    pub(crate) fn reseed(&self, sample: Sample) {
        self.with_inner(|inner| inner.state.reseed(sample));
    }

    /// Opens a reader, claiming one of the `W` waiter slots.
    pub fn open(&self) -> Result<Reader<'_, W>, EventError> {
        let (slot, generation) = self
            .with_inner(|inner| inner.waiters.claim())
            .ok_or(EventError::ResourceUnavailable)?;
        log::trace!("reader opened on slot {}", slot);
        Ok(Reader::new(self, slot, generation))
    }

    /// Number of currently open readers.
    pub fn readers(&self) -> usize {
        self.with_inner(|inner| inner.waiters.claimed())
    }
}
