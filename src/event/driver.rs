use bitmaps::{Bits, BitsImpl};

use crate::event::{
    DriverConfig, EdgeCallback, EventChannel, EventError, IrqNumber, IrqReturn, LineMonitor,
    LinePlatform, Reader,
};

/// An active line subscription feeding an [`EventChannel`].
///
/// Created by [`Driver::activate`]; torn down by [`Driver::deactivate`] or on
/// drop. Teardown frees the interrupt before the line, so no edge can be
/// published once the line is gone.
pub struct Driver<'a, P, const W: usize>
where
    P: LinePlatform,
    BitsImpl<W>: Bits,
{
    platform: P,
    config: DriverConfig,
    line: P::Line,
    irq: IrqNumber,
    channel: &'a EventChannel<W>,
    active: bool,
}

impl<'a, P, const W: usize> core::fmt::Debug for Driver<'a, P, W>
where
    P: LinePlatform,
    BitsImpl<W>: Bits,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("irq", &self.irq)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl<'a, P, const W: usize> Driver<'a, P, W>
where
    P: LinePlatform,
    BitsImpl<W>: Bits,
{
    /// Acquires the line, configures it as an input, seeds the channel with
    /// the current level and subscribes to its interrupt.
    ///
    /// The channel is seeded before the interrupt is requested so the first
    /// edge can never be overwritten by the startup sample. On failure every
    /// resource acquired so far is released in reverse order and the
    /// collaborator's error is returned unchanged.
    pub fn activate(
        config: DriverConfig,
        mut platform: P,
        channel: &'a EventChannel<W>,
    ) -> Result<Self, EventError> {
        let id = config.line();
        let label = config.label();
        log::info!("{}: activation start", label);

        let line = platform.request_line(id, label).inspect_err(|err| {
            log::error!("{}: requesting line {} failed ({})", label, id, err);
        })?;

        let irq = match Self::configure(&mut platform, &config, &line) {
            Ok(irq) => irq,
            Err(err) => {
                platform.release_line(id, &line);
                return Err(err);
            }
        };

        let initial = line.sample();
        channel.reseed(initial);
        log::info!("{}: initial line value = {}", label, initial.as_byte());

        if let Err(err) = platform.request_irq(irq, config.trigger(), label) {
            log::error!("{}: request_irq({}) failed ({})", label, irq, err);
            platform.release_line(id, &line);
            return Err(err);
        }
        log::info!(
            "{}: irq {} requested for line {} ({:?})",
            label,
            irq,
            id,
            config.trigger()
        );

        log::info!("{}: activation done", label);
        Ok(Self {
            platform,
            config,
            line,
            irq,
            channel,
            active: true,
        })
    }

    fn configure(
        platform: &mut P,
        config: &DriverConfig,
        line: &P::Line,
    ) -> Result<IrqNumber, EventError> {
        let (id, label) = (config.line(), config.label());

        platform.set_input(id, line).inspect_err(|err| {
            log::error!("{}: setting line {} as input failed ({})", label, id, err);
        })?;

        let irq = platform.map_irq(id, line).inspect_err(|err| {
            log::error!("{}: mapping line {} to irq failed ({})", label, id, err);
        })?;
        log::info!("{}: mapped line {} -> irq {}", label, id, irq);

        Ok(irq)
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn irq(&self) -> IrqNumber {
        self.irq
    }

    pub fn channel(&self) -> &'a EventChannel<W> {
        self.channel
    }

    /// Callback to install in the platform's interrupt dispatch.
    pub fn edge_callback(&self) -> EdgeCallback<'_, P::Line, W> {
        EdgeCallback::new(&self.line, self.config.line(), self.irq, self.channel)
    }

    /// Dispatches one interrupt to the edge callback.
    pub fn on_edge(&self, irq: IrqNumber) -> IrqReturn {
        self.edge_callback().on_edge(irq)
    }

    /// Opens a reader on the driver's channel.
    pub fn open(&self) -> Result<Reader<'a, W>, EventError> {
        self.channel.open()
    }

    /// Frees the interrupt, then releases the line.
    pub fn deactivate(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let label = self.config.label();
        log::info!("{}: deactivation start", label);
        self.platform.free_irq(self.irq);
        self.platform.release_line(self.config.line(), &self.line);
        log::info!("{}: deactivation done", label);
    }
}

impl<'a, P, const W: usize> Drop for Driver<'a, P, W>
where
    P: LinePlatform,
    BitsImpl<W>: Bits,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{
        DriverBuilder, LineId, ReadMode, Sample, Trigger,
        test_support::{Call, FakePlatform, Step, TestChannel},
    };
    use std::{string::String, sync::Arc, thread, vec};

    fn config() -> DriverConfig {
        DriverBuilder::new()
            .line(LineId::new(519).unwrap())
            .both_edges()
            .label("hcsr501")
            .build()
    }

    fn label() -> String {
        String::from("hcsr501")
    }

    #[test]
    fn activation_acquires_in_order_and_seeds_channel() {
        let channel = TestChannel::new();
        channel.publish(Sample::Low);

        let platform = FakePlatform::new(Sample::High);
        let journal = Arc::clone(&platform.journal);
        let driver = Driver::activate(config(), platform, &channel).unwrap();

        assert_eq!(driver.irq(), IrqNumber(77));
        assert_eq!(
            FakePlatform::calls(&journal),
            vec![
                Call::RequestLine(519, label()),
                Call::SetInput(519),
                Call::MapIrq(519),
                Call::RequestIrq(77, Trigger::BothEdges),
            ]
        );

        // The startup sample is informational only.
        assert!(!channel.peek_pending());
        assert_eq!(channel.last_value(), Sample::High);
    }

    #[test]
    fn failed_activation_releases_in_reverse_order() {
        let cases = [
            (Step::RequestLine, vec![]),
            (
                Step::SetInput,
                vec![Call::RequestLine(519, label()), Call::ReleaseLine(519)],
            ),
            (
                Step::MapIrq,
                vec![
                    Call::RequestLine(519, label()),
                    Call::SetInput(519),
                    Call::ReleaseLine(519),
                ],
            ),
            (
                Step::RequestIrq,
                vec![
                    Call::RequestLine(519, label()),
                    Call::SetInput(519),
                    Call::MapIrq(519),
                    Call::ReleaseLine(519),
                ],
            ),
        ];

        for (step, expected) in cases {
            let channel = TestChannel::new();
            let platform = FakePlatform::new(Sample::Low).failing_at(step);
            let journal = Arc::clone(&platform.journal);

            let result = Driver::activate(config(), platform, &channel);
            assert_eq!(result.err(), Some(EventError::ResourceUnavailable));
            assert_eq!(FakePlatform::calls(&journal), expected, "failing at {:?}", step);
        }
    }

    #[test]
    fn deactivation_frees_irq_before_line() {
        let channel = TestChannel::new();
        let platform = FakePlatform::new(Sample::Low);
        let journal = Arc::clone(&platform.journal);
        let driver = Driver::activate(config(), platform, &channel).unwrap();
        journal.lock().unwrap().clear();

        driver.deactivate();
        assert_eq!(
            FakePlatform::calls(&journal),
            vec![Call::FreeIrq(77), Call::ReleaseLine(519)]
        );
    }

    #[test]
    fn drop_tears_down_once() {
        let channel = TestChannel::new();
        let platform = FakePlatform::new(Sample::Low);
        let journal = Arc::clone(&platform.journal);
        {
            let _driver = Driver::activate(config(), platform, &channel).unwrap();
        }
        let calls = FakePlatform::calls(&journal);
        assert_eq!(calls.iter().filter(|c| **c == Call::FreeIrq(77)).count(), 1);
        assert_eq!(calls.last(), Some(&Call::ReleaseLine(519)));
    }

    #[test]
    fn falling_edge_reaches_reader() {
        let channel = TestChannel::new();
        let platform = FakePlatform::new(Sample::High);
        let line = Arc::clone(&platform.line);
        let driver = Driver::activate(config(), platform, &channel).unwrap();
        let mut reader = driver.open().unwrap();
        let mut buf = [0xFF; 2];

        assert!(!reader.is_readable());
        line.set(Sample::Low);
        assert_eq!(driver.on_edge(driver.irq()), IrqReturn::Handled);

        assert!(reader.is_readable());
        assert_eq!(reader.try_read(&mut buf), Ok(1));
        assert_eq!(buf[0], 0);
        assert!(!reader.is_readable());
    }

    #[test]
    fn blocking_read_returns_value_published_from_interrupt_thread() {
        let channel = TestChannel::new();
        let platform = FakePlatform::new(Sample::Low);
        let line = Arc::clone(&platform.line);
        let driver = Driver::activate(config(), platform, &channel).unwrap();
        let mut reader = driver.open().unwrap();
        let irq = driver.irq();

        thread::scope(|s| {
            let waiter = s.spawn(move || {
                let mut buf = [0u8; 1];
                let n = futures::executor::block_on(reader.read(&mut buf, ReadMode::Blocking));
                (n, buf[0])
            });

            // Keep firing until the reader has been served.
            while !waiter.is_finished() {
                line.set(Sample::High);
                driver.on_edge(irq);
                thread::yield_now();
            }

            assert_eq!(waiter.join().unwrap(), (Ok(1), 1));
        });
    }
}
