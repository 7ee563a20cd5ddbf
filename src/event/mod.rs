pub mod builder;
pub mod channel;
pub mod driver;
pub mod error;
pub mod handle;
pub mod line;
pub mod platform;
pub(crate) mod state;
pub mod types;
pub(crate) mod waiters;

#[cfg(test)]
mod test_support;

pub use builder::{DEFAULT_LABEL, DriverBuilder, DriverConfig};
pub use channel::EventChannel;
pub use driver::Driver;
pub use error::EventError;
pub use handle::{EdgeCallback, Interrupter, Read, Reader};
#[cfg(feature = "embedded-hal")]
pub use line::HalLine;
pub use line::LineMonitor;
pub use platform::LinePlatform;
pub use types::{IrqNumber, IrqReturn, LineId, ReadMode, Readiness, Sample, Trigger};

pub mod prelude {
    #[cfg(feature = "embedded-hal")]
    pub use super::HalLine;
    pub use super::{
        Driver, DriverBuilder, DriverConfig, EdgeCallback, EventChannel, EventError, Interrupter,
        IrqNumber, IrqReturn, LineId, LineMonitor, LinePlatform, ReadMode, Readiness, Reader,
        Sample, Trigger,
    };
}
