use crate::event::Sample;

/// A digital input whose level can be sampled synchronously.
///
/// `sample` is called from interrupt context. Implementations must not block
/// and must not allocate.
pub trait LineMonitor {
    fn sample(&self) -> Sample;
}

impl<T: LineMonitor + ?Sized> LineMonitor for &T {
    #[inline]
    fn sample(&self) -> Sample {
        (**self).sample()
    }
}

/// Adapts an `embedded-hal` input pin with an infallible error type.
#[cfg(feature = "embedded-hal")]
pub struct HalLine<P> {
    pin: critical_section::Mutex<core::cell::RefCell<P>>,
}

#[cfg(feature = "embedded-hal")]
impl<P> HalLine<P>
where
    P: embedded_hal::digital::InputPin<Error = core::convert::Infallible>,
{
    pub fn new(pin: P) -> Self {
        Self {
            pin: critical_section::Mutex::new(core::cell::RefCell::new(pin)),
        }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin.into_inner().into_inner()
    }
}

#[cfg(feature = "embedded-hal")]
impl<P> LineMonitor for HalLine<P>
where
    P: embedded_hal::digital::InputPin<Error = core::convert::Infallible>,
{
    fn sample(&self) -> Sample {
        critical_section::with(|cs| {
            let mut pin = self.pin.borrow_ref_mut(cs);
            let Ok(high) = pin.is_high();
            Sample::from(high)
        })
    }
}
