use crate::event::{EventError, IrqNumber, LineId, LineMonitor, Trigger};

/// Setup and teardown collaborator: acquires the input line and routes its
/// interrupt to the edge callback.
///
/// Acquisition steps return [`EventError::ResourceUnavailable`] (or any other
/// error) unchanged to [`Driver::activate`](crate::event::Driver::activate),
/// which unwinds whatever was already acquired. Release steps are infallible.
pub trait LinePlatform {
    type Line: LineMonitor;

    fn request_line(&mut self, id: LineId, label: &'static str) -> Result<Self::Line, EventError>;

    /// Configures the line as an input.
    fn set_input(&mut self, id: LineId, line: &Self::Line) -> Result<(), EventError>;

    fn map_irq(&mut self, id: LineId, line: &Self::Line) -> Result<IrqNumber, EventError>;

    /// Subscribes the edge callback to `irq`. After this returns, edges may be
    /// delivered at any time.
    fn request_irq(
        &mut self,
        irq: IrqNumber,
        trigger: Trigger,
        label: &'static str,
    ) -> Result<(), EventError>;

    /// Unsubscribes from `irq`. No callback runs once this returns.
    fn free_irq(&mut self, irq: IrqNumber);

    fn release_line(&mut self, id: LineId, line: &Self::Line);
}
