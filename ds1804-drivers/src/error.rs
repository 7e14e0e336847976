//! Error types for the DS1804 driver
//!
//! The chip itself never reports errors; only the pin layer can fail.

use core::fmt;

/// Errors that can occur while driving the DS1804 control lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ds1804Error<E> {
    /// Underlying GPIO error
    Pin(E),
}

// Allow `?` propagation from raw pin errors
impl<E> From<E> for Ds1804Error<E> {
    fn from(error: E) -> Self {
        Ds1804Error::Pin(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Ds1804Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ds1804Error::Pin(e) => write!(f, "GPIO error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Ds1804Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Ds1804Error::Pin(e) => defmt::write!(f, "GPIO error: {}", e),
        }
    }
}
