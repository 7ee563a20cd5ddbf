//! Critical section example: driver lifecycle with a simulated interrupt
//!
//! This example demonstrates:
//! - Implementing `LinePlatform` for a board (here a simulated one)
//! - Building a `DriverConfig` and activating a `Driver`
//! - Activation unwinding when the interrupt cannot be requested
//! - Firing edges from a separate "ISR" thread through the driver
//! - A reader thread parked in `read_blocking` until each edge arrives
//! - Cancelling a blocked read with an `Interrupter`
//! - Deactivation freeing the interrupt before the line
//!
//! On the host, `critical-section`'s std implementation stands in for
//! masking interrupts, so the ISR thread and the readers exclude each other
//! exactly as they would on a microcontroller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use pir_edge::prelude::*;

// ============ Simulated Board ============

const PIR_LINE: i32 = 519;
const PIR_IRQ: IrqNumber = IrqNumber(42);

/// Simulated PIR output pin
struct SimPin(AtomicBool);

impl SimPin {
    fn drive(&self, high: bool) {
        self.0.store(high, Ordering::Release);
    }
}

impl LineMonitor for SimPin {
    fn sample(&self) -> Sample {
        Sample::from(self.0.load(Ordering::Acquire))
    }
}

static PIR_PIN: SimPin = SimPin(AtomicBool::new(false));

/// Board support that hands out the one PIR pin and its interrupt.
#[derive(Default)]
struct SimPlatform {
    irq_busy: bool,
}

impl LinePlatform for SimPlatform {
    type Line = &'static SimPin;

    fn request_line(&mut self, id: LineId, label: &'static str) -> Result<Self::Line, EventError> {
        println!("    platform: request line {} for {:?}", id, label);
        Ok(&PIR_PIN)
    }

    fn set_input(&mut self, id: LineId, _line: &Self::Line) -> Result<(), EventError> {
        println!("    platform: line {} -> input", id);
        Ok(())
    }

    fn map_irq(&mut self, id: LineId, _line: &Self::Line) -> Result<IrqNumber, EventError> {
        println!("    platform: line {} -> irq {}", id, PIR_IRQ);
        Ok(PIR_IRQ)
    }

    fn request_irq(
        &mut self,
        irq: IrqNumber,
        trigger: Trigger,
        _label: &'static str,
    ) -> Result<(), EventError> {
        if self.irq_busy {
            println!("    platform: irq {} already taken", irq);
            return Err(EventError::ResourceUnavailable);
        }
        println!("    platform: irq {} subscribed ({:?})", irq, trigger);
        Ok(())
    }

    fn free_irq(&mut self, irq: IrqNumber) {
        println!("    platform: irq {} freed", irq);
    }

    fn release_line(&mut self, id: LineId, _line: &Self::Line) {
        println!("    platform: line {} released", id);
    }
}

pub fn main() {
    let config = DriverBuilder::new()
        .line(LineId::new(PIR_LINE).unwrap())
        .both_edges()
        .label("hcsr501")
        .build();
    let channel = EventChannel::<4>::new();

    // ========== Failed Activation ==========
    println!("--- Activation with a busy irq ---");
    let busy = SimPlatform { irq_busy: true };
    let err = Driver::activate(config, busy, &channel).unwrap_err();
    assert_eq!(err, EventError::ResourceUnavailable);
    println!("activate: {}", err);

    // ========== Activation ==========
    println!("\n--- Activation ---");
    let driver = Driver::activate(config, SimPlatform::default(), &channel).unwrap();
    println!(
        "active on irq {}, initial value {}",
        driver.irq(),
        channel.last_value().as_byte()
    );

    let mut reader = driver.open().unwrap();
    let mut idle = driver.open().unwrap();
    let idle_interrupter = idle.interrupter();

    thread::scope(|s| {
        // ========== Blocking Reader ==========
        let consumer = s.spawn(move || {
            let mut buf = [0u8; 1];
            let mut seen = Vec::new();
            for _ in 0..2 {
                reader.read_blocking(&mut buf, ReadMode::Blocking).unwrap();
                println!("Reader: woke with sample {}", buf[0]);
                seen.push(buf[0]);
            }
            seen
        });

        // ========== ISR ==========
        // Motion starts, then ends. Each edge waits for the reader so the
        // two samples are not coalesced.
        let isr = s.spawn(|| {
            for level in [true, false] {
                thread::sleep(Duration::from_millis(50));
                PIR_PIN.drive(level);
                println!("\n>>> ISR: edge, line now {}", level as u8);
                assert_eq!(driver.on_edge(PIR_IRQ), IrqReturn::Handled);
                println!("<<< ISR: Complete");

                while driver.channel().peek_pending() {
                    thread::sleep(Duration::from_millis(1));
                }
            }
        });

        isr.join().unwrap();
        assert_eq!(consumer.join().unwrap(), [1, 0]);

        // ========== Interrupted Wait ==========
        println!("\n--- Interrupting an idle reader ---");
        let waiting = s.spawn(move || {
            let mut buf = [0u8; 1];
            idle.read_blocking(&mut buf, ReadMode::Blocking)
        });
        thread::sleep(Duration::from_millis(50));
        idle_interrupter.interrupt();
        let result = waiting.join().unwrap();
        assert_eq!(result, Err(EventError::Interrupted));
        println!("Idle reader: {}", EventError::Interrupted);
    });

    // ========== Deactivation ==========
    println!("\n--- Deactivation ---");
    driver.deactivate();
    println!("Readers still open: {}", channel.readers());
}
