//! Configuration types
//!
//! Calibration data, device variants, datasheet timing and the
//! `trimpot.toml` parser used by the firmware.

pub mod calibration;
pub mod timing;
pub mod toml;
pub mod variant;

pub use calibration::{map_range, Calibration, DS1804_STEPS};
pub use toml::{parse_config, ParseError, PotConfig, SweepConfig, TrimpotConfig, MAX_SWEEP_TARGETS};
pub use variant::{Variant, DS1804_FIFTY, DS1804_HUNDRED, DS1804_TEN};
