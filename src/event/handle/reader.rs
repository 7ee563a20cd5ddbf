use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use bitmaps::{Bits, BitsImpl};

use crate::event::{EventChannel, EventError, ReadMode, Readiness, Sample};

/// Consumer-side handle owning one waiter slot of an [`EventChannel`].
///
/// Several readers may wait on the same channel; each pending event is
/// delivered to exactly one of them. Dropping the reader frees its slot.
pub struct Reader<'a, const W: usize>
where
    BitsImpl<W>: Bits,
{
    channel: &'a EventChannel<W>,
    slot: usize,
    generation: u32,
}

impl<'a, const W: usize> core::fmt::Debug for Reader<'a, W>
where
    BitsImpl<W>: Bits,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reader")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl<'a, const W: usize> Reader<'a, W>
where
    BitsImpl<W>: Bits,
{
    pub(crate) fn new(channel: &'a EventChannel<W>, slot: usize, generation: u32) -> Self {
        Self {
            channel,
            slot,
            generation,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Handle that cancels this reader's blocking waits from another context.
    pub fn interrupter(&self) -> Interrupter<'a, W> {
        Interrupter {
            channel: self.channel,
            slot: self.slot,
            generation: self.generation,
        }
    }

    /// Polls for the next event, writing one byte (`0` or `1`) to `buf[0]`.
    ///
    /// The consume attempt, the interrupt check and the waker registration
    /// share one critical section, so an edge published in between cannot
    /// be missed.
    pub fn poll_read(
        &mut self,
        cx: &mut Context<'_>,
        buf: &mut [u8],
        mode: ReadMode,
    ) -> Poll<Result<usize, EventError>> {
        if buf.is_empty() {
            return Poll::Ready(Err(EventError::InvalidArgument));
        }

        let slot = self.slot;
        let outcome = self.channel.with_inner(|inner| {
            if let Some(sample) = inner.state.try_consume() {
                // A successful read absorbs any interrupt aimed at this wait.
                inner.waiters.take_interrupt(slot);
                inner.waiters.unregister(slot);
                return Poll::Ready(Ok(sample));
            }
            match mode {
                ReadMode::NonBlocking => Poll::Ready(Err(EventError::WouldBlock)),
                ReadMode::Blocking if inner.waiters.take_interrupt(slot) => {
                    inner.waiters.unregister(slot);
                    Poll::Ready(Err(EventError::Interrupted))
                }
                ReadMode::Blocking => {
                    inner.waiters.register(slot, cx.waker());
                    Poll::Pending
                }
            }
        });

        if let Poll::Ready(Err(EventError::Interrupted)) = outcome {
            log::trace!("read on slot {} interrupted", slot);
        }
        outcome.map_ok(|sample| deliver(buf, sample))
    }

    /// Reads the next event. In blocking mode the future stays pending until
    /// an edge is published or the reader is interrupted.
    pub fn read<'r>(&'r mut self, buf: &'r mut [u8], mode: ReadMode) -> Read<'r, 'a, W> {
        Read {
            reader: self,
            buf,
            mode,
        }
    }

    /// Non-blocking read that needs no task context.
    pub fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, EventError> {
        if buf.is_empty() {
            return Err(EventError::InvalidArgument);
        }
        self.channel
            .try_consume()
            .map(|sample| deliver(buf, sample))
            .ok_or(EventError::WouldBlock)
    }

    /// Reads the next event, parking the current thread while waiting.
    #[cfg(feature = "std")]
    pub fn read_blocking(&mut self, buf: &mut [u8], mode: ReadMode) -> Result<usize, EventError> {
        futures::executor::block_on(self.read(buf, mode))
    }

    /// Registers the task for the next edge and reports current readiness.
    ///
    /// Never consumes the event and never blocks. An interrupt that woke a
    /// readiness wait ends with that wait and is not carried into later reads.
    pub fn poll_ready(&self, cx: &mut Context<'_>) -> Readiness {
        let slot = self.slot;
        let pending = self.channel.with_inner(|inner| {
            inner.waiters.take_interrupt(slot);
            inner.waiters.register(slot, cx.waker());
            inner.state.peek_pending()
        });
        if pending {
            Readiness::Readable
        } else {
            Readiness::NotReady
        }
    }

    /// Readiness without registering for a wake-up.
    pub fn is_readable(&self) -> bool {
        self.channel.peek_pending()
    }
}

impl<'a, const W: usize> Drop for Reader<'a, W>
where
    BitsImpl<W>: Bits,
{
    fn drop(&mut self) {
        let slot = self.slot;
        self.channel.with_inner(|inner| inner.waiters.release(slot));
        log::trace!("reader on slot {} closed", slot);
    }
}

fn deliver(buf: &mut [u8], sample: Sample) -> usize {
    buf[0] = sample.as_byte();
    1
}

/// Future returned by [`Reader::read`].
///
/// Dropping it before completion cancels the read without consuming anything.
#[must_use = "futures do nothing unless polled"]
pub struct Read<'r, 'a, const W: usize>
where
    BitsImpl<W>: Bits,
{
    reader: &'r mut Reader<'a, W>,
    buf: &'r mut [u8],
    mode: ReadMode,
}

impl<'r, 'a, const W: usize> Future for Read<'r, 'a, W>
where
    BitsImpl<W>: Bits,
{
    type Output = Result<usize, EventError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        this.reader.poll_read(cx, this.buf, this.mode)
    }
}

/// Cancels blocking waits of one reader.
///
/// Copyable and usable from any context, such as a signal handler or another
/// thread. An interrupt raised while the reader is not waiting is reported by
/// its next wait that would block. A read that completes with an event, or a
/// readiness poll, clears it.
#[derive(Clone, Copy)]
pub struct Interrupter<'a, const W: usize>
where
    BitsImpl<W>: Bits,
{
    channel: &'a EventChannel<W>,
    slot: usize,
    generation: u32,
}

impl<'a, const W: usize> Interrupter<'a, W>
where
    BitsImpl<W>: Bits,
{
    pub fn interrupt(&self) {
        let (slot, generation) = (self.slot, self.generation);
        let waker = self
            .channel
            .with_inner(|inner| inner.waiters.interrupt(slot, generation));
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}
