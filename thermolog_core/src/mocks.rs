//! Test and helper mocks for thermolog_core

use thermolog_traits::AdcChannel;

/// An ADC that replays a fixed script of readings, cycling at the end.
#[derive(Debug, Clone)]
pub struct ScriptedAdc {
    values: Vec<u16>,
    idx: usize,
}

impl ScriptedAdc {
    pub fn new(values: Vec<u16>) -> Self {
        Self { values, idx: 0 }
    }

    pub fn constant(value: u16) -> Self {
        Self::new(vec![value])
    }
}

impl AdcChannel for ScriptedAdc {
    fn read(&mut self) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        if self.values.is_empty() {
            return Err(Box::new(std::io::Error::other("scripted adc has no values")));
        }
        let v = self.values[self.idx % self.values.len()];
        self.idx = self.idx.wrapping_add(1);
        Ok(v)
    }
}

/// An ADC that always errors on read; stands in for a disconnected pin.
pub struct FailingAdc;

impl AdcChannel for FailingAdc {
    fn read(&mut self) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("adc not responding")))
    }
}
