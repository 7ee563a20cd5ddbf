use core::task::Waker;

use bitmaps::{Bitmap, Bits, BitsImpl};
use heapless::Vec;

/// Fixed set of reader slots, each holding at most one parked waker.
///
/// Occupancy and pending interrupts are tracked per slot in bitmaps. A slot's
/// generation increments on every claim so stale interrupters cannot reach a
/// later owner of the same slot.
pub(crate) struct WaiterTable<const W: usize>
where
    BitsImpl<W>: Bits,
{
    wakers: [Option<Waker>; W],
    generations: [u32; W],
    claimed: Bitmap<W>,
    interrupted: Bitmap<W>,
}

impl<const W: usize> WaiterTable<W>
where
    BitsImpl<W>: Bits,
{
    pub(crate) fn new() -> Self {
        Self {
            wakers: [const { None }; W],
            generations: [0; W],
            claimed: Bitmap::new(),
            interrupted: Bitmap::new(),
        }
    }

    /// Claims a free slot, returning its index and generation.
    pub(crate) fn claim(&mut self) -> Option<(usize, u32)> {
        let slot = self.claimed.first_false_index().filter(|&slot| slot < W)?;
        self.claimed.set(slot, true);
        self.interrupted.set(slot, false);
        self.wakers[slot] = None;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        Some((slot, self.generations[slot]))
    }

    pub(crate) fn release(&mut self, slot: usize) {
        self.claimed.set(slot, false);
        self.interrupted.set(slot, false);
        self.wakers[slot] = None;
    }

    pub(crate) fn claimed(&self) -> usize {
        self.claimed.len()
    }

    /// Parks `waker` in `slot`, replacing any previous one.
    pub(crate) fn register(&mut self, slot: usize, waker: &Waker) {
        match &mut self.wakers[slot] {
            Some(current) if current.will_wake(waker) => {}
            entry => *entry = Some(waker.clone()),
        }
    }

    pub(crate) fn unregister(&mut self, slot: usize) {
        self.wakers[slot] = None;
    }

    pub(crate) fn is_registered(&self, slot: usize) -> bool {
        self.wakers[slot].is_some()
    }

    /// Removes every parked waker so the caller can wake them outside the
    /// critical section.
    pub(crate) fn take_all(&mut self) -> Vec<Waker, W> {
        let mut out = Vec::new();
        for waker in self.wakers.iter_mut().filter_map(Option::take) {
            let pushed = out.push(waker);
            debug_assert!(pushed.is_ok(), "at most W wakers are parked");
        }
        out
    }

    /// Flags `slot` as interrupted if `generation` still owns it.
    pub(crate) fn interrupt(&mut self, slot: usize, generation: u32) -> Option<Waker> {
        if !self.claimed.get(slot) || self.generations[slot] != generation {
            return None;
        }
        self.interrupted.set(slot, true);
        self.wakers[slot].take()
    }

    /// Clears and reports the interrupt flag of `slot`.
    pub(crate) fn take_interrupt(&mut self, slot: usize) -> bool {
        self.interrupted.set(slot, false)
    }
}
