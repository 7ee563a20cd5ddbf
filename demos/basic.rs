//! Basic example: edge event mailbox fundamentals
//!
//! This example demonstrates:
//! - Creating an event channel with a fixed number of reader slots
//! - Wrapping a sensor line in an edge callback
//! - Non-blocking reads, where exactly one reader takes each event
//! - Readiness polling, which registers for a wake-up but never consumes
//! - Coalescing: edges that arrive before a read leave only the latest sample
//! - Ignoring interrupts raised for a different irq on a shared line

use core::sync::atomic::{AtomicBool, Ordering};
use core::task::Context;

use futures::task::noop_waker;
use pir_edge::prelude::*;

// ============ Simulated Hardware ============
// A PIR sensor drives its output high while it sees motion. Here the pin
// level is an atomic flag that the example flips before firing each edge.

const PIR_LINE: i32 = 519;
const PIR_IRQ: IrqNumber = IrqNumber(42);

/// Simulated PIR output pin
struct PirPin(AtomicBool);

impl PirPin {
    fn drive(&self, high: bool) {
        self.0.store(high, Ordering::Release);
    }
}

impl LineMonitor for PirPin {
    fn sample(&self) -> Sample {
        Sample::from(self.0.load(Ordering::Acquire))
    }
}

pub fn main() {
    // Two reader slots; a third open is refused
    let channel = EventChannel::<2>::new();
    let pin = PirPin(AtomicBool::new(false));
    let callback = EdgeCallback::new(&pin, LineId::new(PIR_LINE).unwrap(), PIR_IRQ, &channel);

    let mut first = channel.open().unwrap();
    let mut second = channel.open().unwrap();
    assert_eq!(channel.open().unwrap_err(), EventError::ResourceUnavailable);
    println!("Opened {} readers (slots {} and {})", channel.readers(), first.slot(), second.slot());

    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut buf = [0u8; 1];

    // ========== Idle Line ==========
    println!("\n--- Idle line ---");
    assert_eq!(first.try_read(&mut buf), Err(EventError::WouldBlock));
    let readiness = first.poll_ready(&mut cx);
    assert_eq!(readiness, Readiness::NotReady);
    println!("try_read: WouldBlock, readiness mask = {:#x}", readiness.mask());

    // ========== Motion Detected ==========
    // In firmware this call is made from the interrupt handler
    println!("\n--- Motion detected ---");
    pin.drive(true);
    assert_eq!(callback.on_edge(PIR_IRQ), IrqReturn::Handled);

    // Both readers see readiness; polling does not take the event
    let readiness = first.poll_ready(&mut cx);
    assert_eq!(readiness, Readiness::Readable);
    assert!(second.is_readable());
    println!("readiness mask = {:#x}", readiness.mask());

    // Only one of them gets it
    assert_eq!(second.try_read(&mut buf), Ok(1));
    println!("second reader took sample {}", buf[0]);
    assert_eq!(buf[0], 1);
    assert_eq!(first.try_read(&mut buf), Err(EventError::WouldBlock));
    println!("first reader: WouldBlock");

    // ========== Coalescing ==========
    // Motion ends and starts again before anyone reads
    println!("\n--- Two edges, one read ---");
    pin.drive(false);
    callback.on_edge(PIR_IRQ);
    pin.drive(true);
    callback.on_edge(PIR_IRQ);

    assert_eq!(first.try_read(&mut buf), Ok(1));
    println!("first reader took sample {} (latest only)", buf[0]);
    assert_eq!(first.try_read(&mut buf), Err(EventError::WouldBlock));

    // ========== Shared Interrupt Line ==========
    println!("\n--- Foreign interrupt ---");
    pin.drive(false);
    assert_eq!(callback.on_edge(IrqNumber(7)), IrqReturn::None);
    assert!(!channel.peek_pending());
    println!(
        "irq 7 not ours; last value still {}",
        channel.last_value().as_byte()
    );

    drop(second);
    println!("\nReaders left: {}", channel.readers());
}
