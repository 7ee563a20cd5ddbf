//! A `no_std`, no-alloc edge event mailbox for PIR motion sensors.
//!
//! This crate delivers transitions of a single digital input line (for example
//! an HC-SR501 PIR sensor) from its interrupt handler to any number of readers,
//! without busy-polling.
//!
//! # Features
//!
//! - **Zero heap allocation** - the interrupt path never allocates or blocks
//! - **Single-slot mailbox** - only the latest sample and a pending flag are kept
//! - **Dual access patterns** - interrupt-side callback and reader-side handles
//! - **Blocking, non-blocking and pollable reads** - with explicit interruption
//! - **Ordered lifecycle** - activation unwinds on failure, teardown frees the
//!   interrupt before the line
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐         ┌───────────────────────────┐
//! │   ISR (edge)     │         │   Readers                 │
//! │                  │         │                           │
//! │  on_edge()       │────────▶│  read() / try_read()      │
//! │  sample + publish│ pending │  (consumes the event)     │
//! │                  │  flag   │                           │
//! │  wake all        │────────▶│  poll_ready()             │
//! │                  │ wakers  │  (registers, no consume)  │
//! └──────────────────┘         └───────────────────────────┘
//! ```
//!
//! - **Edges** overwrite the stored sample and mark it pending
//! - **Reads** take the pending sample; exactly one reader gets each event
//! - **Waiting readers** park a waker and are all woken on the next edge
//! - **Interrupters** cancel a reader's wait without consuming anything
//!
//! Every access to the shared state happens inside a short
//! `critical_section::with` block, so the interrupt handler is never held up
//! for longer than a pair of field updates.
//!
//! # Example
//!
//! ```rust,no_run
//! use pir_edge::prelude::*;
//!
//! struct Pin;
//!
//! impl LineMonitor for Pin {
//!     fn sample(&self) -> Sample {
//!         Sample::High
//!     }
//! }
//!
//! let channel = EventChannel::<4>::new();
//! let line = Pin;
//! let callback = EdgeCallback::new(&line, LineId::new(17).unwrap(), IrqNumber(42), &channel);
//!
//! let mut reader = channel.open().unwrap();
//! let mut buf = [0u8; 1];
//! assert_eq!(reader.try_read(&mut buf), Err(EventError::WouldBlock));
//!
//! // Interrupt context
//! callback.on_edge(IrqNumber(42));
//!
//! assert_eq!(reader.try_read(&mut buf), Ok(1));
//! assert_eq!(buf[0], 1);
//! ```

#![deny(unsafe_code)]
#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod event;

pub mod prelude {
    pub use crate::event::prelude::*;
}
