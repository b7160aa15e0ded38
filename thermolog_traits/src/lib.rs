pub mod clock;

pub use clock::{Clock, SystemClock};

/// A single ADC input the logger can sample.
pub trait AdcChannel {
    /// One raw conversion in ADC counts.
    fn read(&mut self) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: AdcChannel + ?Sized> AdcChannel for Box<T> {
    fn read(&mut self) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read()
    }
}
