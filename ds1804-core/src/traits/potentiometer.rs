//! Stepped potentiometer trait
//!
//! Abstracts over increment/decrement digital potentiometers (DS1804,
//! X9C10x, MCP401x in U/D mode) that move one tap per pulse and have no
//! read-back path. The wiper position is the driver's model, not a
//! hardware read.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::Calibration;

/// Direction of wiper travel selected on the U/D line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WiperDirection {
    /// Toward the high end (U/D HIGH)
    Up,
    /// Toward tap 0 (U/D LOW)
    Down,
}

impl WiperDirection {
    /// Direction needed to move from `from` to `to`
    ///
    /// Equal positions resolve to `Down`.
    pub fn between(from: u8, to: u8) -> Self {
        if to > from {
            WiperDirection::Up
        } else {
            WiperDirection::Down
        }
    }

    /// U/D line level for this direction
    pub fn is_high(self) -> bool {
        self == WiperDirection::Up
    }
}

/// Trait for stepped, lockable potentiometers
///
/// Out-of-range requests are clamped, never rejected. The only errors are
/// those of the underlying I/O layer.
pub trait Potentiometer {
    /// Error raised by the I/O layer
    type Error;

    /// Calibration this instance was built with
    fn calibration(&self) -> Calibration;

    /// Check if the chip is locked (wiper moves are ignored)
    fn is_locked(&mut self) -> Result<bool, Self::Error>;

    /// Current modelled tap index
    fn wiper_position(&self) -> u8;

    /// Resistance at the current modelled tap
    fn resistance(&self) -> u32 {
        self.calibration()
            .wiper_position_to_resistance(self.wiper_position())
    }

    /// Move the wiper to a tap, returning the resulting position
    ///
    /// Does nothing while locked.
    fn set_wiper_position(&mut self, position: u8) -> Result<u8, Self::Error>;

    /// Move the wiper to the tap nearest below a resistance, returning the
    /// resulting resistance
    ///
    /// Does nothing while locked.
    fn set_resistance(&mut self, resistance: u32) -> Result<u32, Self::Error>;

    /// Resynchronize the model with a known tap without touching hardware
    fn override_wiper_position(&mut self, position: u8) -> u8;

    /// Drive the wiper to tap 0 regardless of the modelled position
    fn set_to_zero(&mut self) -> Result<(), Self::Error>;

    /// Block wiper moves
    fn lock(&mut self) -> Result<(), Self::Error>;

    /// Allow wiper moves
    fn unlock(&mut self) -> Result<(), Self::Error>;

    /// Store the current tap in non-volatile memory
    fn commit(&mut self) -> Result<(), Self::Error>;
}
