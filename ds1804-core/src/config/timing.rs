//! DS1804 datasheet timing
//!
//! All values are minimums in microseconds. Delay implementations may
//! round up but must never round down.

/// CS falling edge to first INC edge (t_CI)
pub const CS_TO_INC_SETUP_US: u32 = 1;

/// CS deselect time (t_CPH)
pub const CS_DESELECT_TIME_US: u32 = 1;

/// EEPROM write cycle after a commit (t_WR)
pub const WIPER_STORAGE_TIME_US: u32 = 10_000;

/// Settle time after raising CS to lock the wiper
pub const LOCK_SETTLE_US: u32 = 50;

/// INC low/high period and U/D setup time
pub const PULSE_SETTLE_US: u32 = 1;

/// Pulse burst used to drive the wiper to tap 0 from anywhere
///
/// Exceeds the step count on purpose so the wiper always bottoms out.
pub const ZEROING_PULSES: u8 = 100;
