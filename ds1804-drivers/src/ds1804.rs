//! DS1804 nonvolatile trimmer potentiometer (three-wire mode)
//!
//! The DS1804 divides its resistive element into 99 equal steps (taps
//! 0-99). It is controlled by three lines:
//!
//! - **CS**: LOW selects the chip. HIGH locks the wiper; a rising edge
//!   with INC high stores the tap in EEPROM.
//! - **INC**: each HIGH→LOW→HIGH toggle moves the wiper one step.
//! - **U/D**: HIGH moves toward the high end, LOW toward tap 0.
//!
//! The interface is write-only. The driver keeps a model of the wiper
//! position, starting at 0, that only matches the chip after a
//! [`set_to_zero`](Ds1804::set_to_zero) or an
//! [`override_wiper_position`](Ds1804::override_wiper_position).
//!
//! # Usage
//!
//! ```ignore
//! let mut pot = Ds1804::new(cs, inc, ud, delay, DS1804_TEN)?;
//! pot.set_to_zero()?;
//! let actual = pot.set_resistance(3_300)?; // 3_232 ohms, tap 32
//! pot.write()?;
//! pot.lock()?;
//! ```
//!
//! All waits are datasheet minimums issued through [`DelayNs`]; a commit
//! blocks for roughly 20 ms.

use ds1804_core::config::timing::{
    CS_DESELECT_TIME_US, CS_TO_INC_SETUP_US, LOCK_SETTLE_US, PULSE_SETTLE_US,
    WIPER_STORAGE_TIME_US, ZEROING_PULSES,
};
use ds1804_core::config::{Calibration, Variant};
use ds1804_core::traits::{Potentiometer, WiperDirection};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, StatefulOutputPin};

use crate::error::Ds1804Error;

/// DS1804 driver
///
/// Owns the three control lines and a delay provider. CS must be
/// readable back so [`is_locked`](Self::is_locked) reflects the line
/// itself. Dropping the driver drives all three lines low.
pub struct Ds1804<CS, INC, UD, D>
where
    CS: StatefulOutputPin,
    INC: OutputPin<Error = CS::Error>,
    UD: OutputPin<Error = CS::Error>,
    D: DelayNs,
{
    cs: CS,
    inc: INC,
    ud: UD,
    delay: D,
    calibration: Calibration,
    /// Modelled tap, always in `[0, step_count]`
    wiper_position: u8,
}

impl<CS, INC, UD, D> Ds1804<CS, INC, UD, D>
where
    CS: StatefulOutputPin,
    INC: OutputPin<Error = CS::Error>,
    UD: OutputPin<Error = CS::Error>,
    D: DelayNs,
{
    /// Create a new driver for a chip with the given end-to-end resistance
    ///
    /// Drives INC to its idle-high level. The chip is not interrogated
    /// (it cannot be) and the wiper is assumed to sit at tap 0.
    pub fn new(
        cs: CS,
        inc: INC,
        ud: UD,
        delay: D,
        max_resistance: u32,
    ) -> Result<Self, Ds1804Error<CS::Error>> {
        Self::with_calibration(cs, inc, ud, delay, Calibration::new(max_resistance))
    }

    /// Create a new driver for a catalogue variant
    pub fn from_variant(
        cs: CS,
        inc: INC,
        ud: UD,
        delay: D,
        variant: Variant,
    ) -> Result<Self, Ds1804Error<CS::Error>> {
        Self::with_calibration(cs, inc, ud, delay, variant.calibration())
    }

    /// Create a new driver with an explicit calibration
    pub fn with_calibration(
        cs: CS,
        inc: INC,
        ud: UD,
        delay: D,
        calibration: Calibration,
    ) -> Result<Self, Ds1804Error<CS::Error>> {
        let mut pot = Self {
            cs,
            inc,
            ud,
            delay,
            calibration,
            wiper_position: 0,
        };
        // Idle high so no spurious falling edge reaches the counter
        pot.inc.set_high()?;
        Ok(pot)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Check if the chip is locked (CS line is HIGH)
    pub fn is_locked(&mut self) -> Result<bool, Ds1804Error<CS::Error>> {
        Ok(self.cs.is_set_high()?)
    }

    /// Current modelled tap
    pub fn wiper_position(&self) -> u8 {
        self.wiper_position
    }

    /// Resistance at the current modelled tap
    pub fn resistance(&self) -> u32 {
        self.calibration.wiper_position_to_resistance(self.wiper_position)
    }

    /// Calibration in use
    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// End-to-end resistance in ohms
    pub fn max_resistance(&self) -> u32 {
        self.calibration.max_resistance
    }

    /// Number of steps along the element
    pub fn step_count(&self) -> u8 {
        self.calibration.step_count
    }

    /// Tap index for a requested resistance
    pub fn resistance_to_wiper_position(&self, resistance: u32) -> u8 {
        self.calibration.resistance_to_wiper_position(resistance)
    }

    /// Resistance produced at a tap index
    pub fn wiper_position_to_resistance(&self, position: u8) -> u32 {
        self.calibration.wiper_position_to_resistance(position)
    }

    /// Nearest achievable resistance for a request
    pub fn resistance_to_actual_resistance(&self, resistance: u32) -> u32 {
        self.calibration.resistance_to_actual_resistance(resistance)
    }

    // -----------------------------------------------------------------------
    // Lock / commit
    // -----------------------------------------------------------------------

    /// Raise CS to block wiper moves
    pub fn lock(&mut self) -> Result<(), Ds1804Error<CS::Error>> {
        self.cs.set_high()?;
        self.delay.delay_us(LOCK_SETTLE_US);
        Ok(())
    }

    /// Drop CS to allow wiper moves
    pub fn unlock(&mut self) -> Result<(), Ds1804Error<CS::Error>> {
        self.cs.set_low()?;
        self.delay.delay_us(CS_TO_INC_SETUP_US);
        Ok(())
    }

    /// Store the current tap in the chip's EEPROM
    ///
    /// CS rises while INC is high, then the EEPROM write cycle is waited
    /// out. Leaves the chip selected (unlocked).
    pub fn write(&mut self) -> Result<(), Ds1804Error<CS::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("DS1804: storing tap {}", self.wiper_position);

        self.cs.set_low()?;
        self.inc.set_high()?;
        self.cs.set_high()?;
        self.delay.delay_us(WIPER_STORAGE_TIME_US);
        self.cs.set_low()?;
        self.delay
            .delay_us(WIPER_STORAGE_TIME_US - CS_DESELECT_TIME_US);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Wiper moves
    // -----------------------------------------------------------------------

    /// Drive the wiper to tap 0 from any position
    ///
    /// Sends a burst of [`ZEROING_PULSES`] decrements, or `step_count + 1`
    /// if that is larger, so the wiper bottoms out whatever the model
    /// believes. The model is reset to 0 unless the chip was locked, in
    /// which case the chip ignored the burst.
    pub fn set_to_zero(&mut self) -> Result<(), Ds1804Error<CS::Error>> {
        let locked = self.is_locked()?;
        let burst = ZEROING_PULSES.max(self.calibration.step_count.saturating_add(1));

        self.ud.set_low()?;
        self.delay.delay_us(PULSE_SETTLE_US);
        self.emit_pulses(burst)?;

        if !locked {
            self.wiper_position = 0;
        }
        Ok(())
    }

    /// Move the wiper to a tap, returning the resulting position
    ///
    /// The target is clamped to `[0, step_count]`. While locked nothing
    /// is sent and the current position is returned.
    pub fn set_wiper_position(&mut self, position: u8) -> Result<u8, Ds1804Error<CS::Error>> {
        if self.is_locked()? {
            #[cfg(feature = "defmt")]
            defmt::debug!("DS1804: locked, ignoring move to {}", position);
            return Ok(self.wiper_position);
        }

        let target = self.calibration.clamp_position(position);
        let pulses = target.abs_diff(self.wiper_position);
        let direction = WiperDirection::between(self.wiper_position, target);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "DS1804: tap {} -> {} ({} pulses {})",
            self.wiper_position,
            target,
            pulses,
            direction
        );

        self.ud.set_state(direction.is_high().into())?;
        self.delay.delay_us(PULSE_SETTLE_US);
        self.transmit_pulses(pulses)?;

        self.wiper_position = target;
        Ok(self.wiper_position)
    }

    /// Resynchronize the model with a known tap
    ///
    /// No pulses are sent and the lock state is irrelevant. Use when the
    /// chip's tap is known from elsewhere, e.g. the value it recalled from
    /// EEPROM at power-up.
    pub fn override_wiper_position(&mut self, position: u8) -> u8 {
        self.wiper_position = self.calibration.clamp_position(position);
        self.wiper_position
    }

    /// Move the wiper to the tap at or below a resistance
    ///
    /// Returns the resistance of the resulting tap, which is the current
    /// one unchanged while locked.
    pub fn set_resistance(&mut self, resistance: u32) -> Result<u32, Ds1804Error<CS::Error>> {
        if !self.is_locked()? {
            let position = self.calibration.resistance_to_wiper_position(resistance);
            self.set_wiper_position(position)?;
        }
        Ok(self.resistance())
    }

    /// Send up to `step_count` INC pulses in the selected direction
    fn transmit_pulses(&mut self, pulses: u8) -> Result<(), Ds1804Error<CS::Error>> {
        self.emit_pulses(pulses.min(self.calibration.step_count))
    }

    /// Toggle INC HIGH→LOW→HIGH `pulses` times, without clamping
    fn emit_pulses(&mut self, pulses: u8) -> Result<(), Ds1804Error<CS::Error>> {
        self.inc.set_high()?;
        self.delay.delay_us(PULSE_SETTLE_US);
        for _ in 0..pulses {
            self.inc.set_low()?;
            self.delay.delay_us(PULSE_SETTLE_US);
            self.inc.set_high()?;
            self.delay.delay_us(PULSE_SETTLE_US);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Shutdown
    // -----------------------------------------------------------------------

    /// Drive INC, CS and U/D low
    ///
    /// INC falls before CS so a locked wiper is not stepped. An unlocked
    /// chip sees that falling edge as one step. This is what dropping the
    /// driver does, but with pin errors reported.
    pub fn shutdown(&mut self) -> Result<(), Ds1804Error<CS::Error>> {
        self.inc.set_low()?;
        self.cs.set_low()?;
        self.ud.set_low()?;
        Ok(())
    }
}

impl<CS, INC, UD, D> Drop for Ds1804<CS, INC, UD, D>
where
    CS: StatefulOutputPin,
    INC: OutputPin<Error = CS::Error>,
    UD: OutputPin<Error = CS::Error>,
    D: DelayNs,
{
    fn drop(&mut self) {
        // Best effort, same order as shutdown(); every line is attempted
        let _ = self.inc.set_low();
        let _ = self.cs.set_low();
        let _ = self.ud.set_low();
    }
}

impl<CS, INC, UD, D> Potentiometer for Ds1804<CS, INC, UD, D>
where
    CS: StatefulOutputPin,
    INC: OutputPin<Error = CS::Error>,
    UD: OutputPin<Error = CS::Error>,
    D: DelayNs,
{
    type Error = Ds1804Error<CS::Error>;

    fn calibration(&self) -> Calibration {
        self.calibration
    }

    fn is_locked(&mut self) -> Result<bool, Self::Error> {
        Ds1804::is_locked(self)
    }

    fn wiper_position(&self) -> u8 {
        self.wiper_position
    }

    fn set_wiper_position(&mut self, position: u8) -> Result<u8, Self::Error> {
        Ds1804::set_wiper_position(self, position)
    }

    fn set_resistance(&mut self, resistance: u32) -> Result<u32, Self::Error> {
        Ds1804::set_resistance(self, resistance)
    }

    fn override_wiper_position(&mut self, position: u8) -> u8 {
        Ds1804::override_wiper_position(self, position)
    }

    fn set_to_zero(&mut self) -> Result<(), Self::Error> {
        Ds1804::set_to_zero(self)
    }

    fn lock(&mut self) -> Result<(), Self::Error> {
        Ds1804::lock(self)
    }

    fn unlock(&mut self) -> Result<(), Self::Error> {
        Ds1804::unlock(self)
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        self.write()
    }
}
