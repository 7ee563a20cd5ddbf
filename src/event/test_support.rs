//! Test support utilities - only compiled in test builds.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use core::task::Waker;
use std::{
    string::String,
    sync::{Arc, Mutex},
    vec::Vec,
};

use futures::task::ArcWake;

use crate::event::{
    EventChannel, EventError, IrqNumber, LineId, LineMonitor, LinePlatform, Sample, Trigger,
};

/// Standard test configuration: four reader slots.
pub type TestChannel = EventChannel<4>;

/// Line whose level is set directly by the test.
#[derive(Debug, Default)]
pub struct FakeLine {
    high: AtomicBool,
}

impl FakeLine {
    pub fn new(level: Sample) -> Self {
        Self {
            high: AtomicBool::new(level.is_high()),
        }
    }

    pub fn set(&self, level: Sample) {
        self.high.store(level.is_high(), Ordering::SeqCst);
    }
}

impl LineMonitor for FakeLine {
    fn sample(&self) -> Sample {
        Sample::from(self.high.load(Ordering::SeqCst))
    }
}

impl LineMonitor for Arc<FakeLine> {
    fn sample(&self) -> Sample {
        self.as_ref().sample()
    }
}

/// Setup steps a [`FakePlatform`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    RequestLine,
    SetInput,
    MapIrq,
    RequestIrq,
}

/// Collaborator calls recorded by a [`FakePlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RequestLine(u32, String),
    SetInput(u32),
    MapIrq(u32),
    RequestIrq(u32, Trigger),
    FreeIrq(u32),
    ReleaseLine(u32),
}

pub type Journal = Arc<Mutex<Vec<Call>>>;

/// Platform that hands out a shared [`FakeLine`] and journals every call.
pub struct FakePlatform {
    pub line: Arc<FakeLine>,
    pub irq: IrqNumber,
    pub fail_at: Option<Step>,
    pub journal: Journal,
}

impl FakePlatform {
    pub fn new(level: Sample) -> Self {
        Self {
            line: Arc::new(FakeLine::new(level)),
            irq: IrqNumber(77),
            fail_at: None,
            journal: Journal::default(),
        }
    }

    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn calls(journal: &Journal) -> Vec<Call> {
        journal.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.journal.lock().unwrap().push(call);
    }

    fn check(&self, step: Step) -> Result<(), EventError> {
        if self.fail_at == Some(step) {
            Err(EventError::ResourceUnavailable)
        } else {
            Ok(())
        }
    }
}

impl LinePlatform for FakePlatform {
    type Line = Arc<FakeLine>;

    fn request_line(&mut self, id: LineId, label: &'static str) -> Result<Self::Line, EventError> {
        self.check(Step::RequestLine)?;
        self.record(Call::RequestLine(id.get(), label.into()));
        Ok(Arc::clone(&self.line))
    }

    fn set_input(&mut self, id: LineId, _line: &Self::Line) -> Result<(), EventError> {
        self.check(Step::SetInput)?;
        self.record(Call::SetInput(id.get()));
        Ok(())
    }

    fn map_irq(&mut self, id: LineId, _line: &Self::Line) -> Result<IrqNumber, EventError> {
        self.check(Step::MapIrq)?;
        self.record(Call::MapIrq(id.get()));
        Ok(self.irq)
    }

    fn request_irq(
        &mut self,
        irq: IrqNumber,
        trigger: Trigger,
        _label: &'static str,
    ) -> Result<(), EventError> {
        self.check(Step::RequestIrq)?;
        self.record(Call::RequestIrq(irq.0, trigger));
        Ok(())
    }

    fn free_irq(&mut self, irq: IrqNumber) {
        self.record(Call::FreeIrq(irq.0));
    }

    fn release_line(&mut self, id: LineId, _line: &Self::Line) {
        self.record(Call::ReleaseLine(id.get()));
    }
}

/// Counts how often a waker was woken.
#[derive(Default)]
pub struct WakeCounter {
    wakes: AtomicUsize,
}

impl WakeCounter {
    pub fn count(&self) -> usize {
        self.wakes.load(Ordering::SeqCst)
    }
}

impl ArcWake for WakeCounter {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.wakes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Returns a waker together with the counter it bumps.
pub fn counting_waker() -> (Waker, Arc<WakeCounter>) {
    let counter = Arc::new(WakeCounter::default());
    (futures::task::waker(Arc::clone(&counter)), counter)
}
