use bitmaps::{Bits, BitsImpl};

use crate::event::{EventChannel, IrqNumber, IrqReturn, LineId, LineMonitor};

/// Interrupt-side handle: samples the line and publishes the edge.
pub struct EdgeCallback<'a, L, const W: usize>
where
    L: LineMonitor,
    BitsImpl<W>: Bits,
{
    line: &'a L,
    line_id: LineId,
    irq: IrqNumber,
    channel: &'a EventChannel<W>,
}

impl<'a, L, const W: usize> core::fmt::Debug for EdgeCallback<'a, L, W>
where
    L: LineMonitor,
    BitsImpl<W>: Bits,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EdgeCallback")
            .field("line_id", &self.line_id)
            .field("irq", &self.irq)
            .finish_non_exhaustive()
    }
}

impl<'a, L, const W: usize> EdgeCallback<'a, L, W>
where
    L: LineMonitor,
    BitsImpl<W>: Bits,
{
    pub fn new(line: &'a L, line_id: LineId, irq: IrqNumber, channel: &'a EventChannel<W>) -> Self {
        Self {
            line,
            line_id,
            irq,
            channel,
        }
    }

    pub fn irq(&self) -> IrqNumber {
        self.irq
    }

    /// Handles one transition on `irq`.
    ///
    /// Runs in interrupt context: one line sample, one bounded critical
    /// section, then a broadcast wake. Interrupts for other lines are left
    /// untouched and reported as [`IrqReturn::None`].
    pub fn on_edge(&self, irq: IrqNumber) -> IrqReturn {
        if irq != self.irq {
            return IrqReturn::None;
        }

        let value = self.line.sample();
        let woken = self.channel.publish(value);

        log::debug!(
            "irq {} fired -> line {} value {} ({} woken)",
            irq,
            self.line_id,
            value.as_byte(),
            woken
        );

        IrqReturn::Handled
    }
}
