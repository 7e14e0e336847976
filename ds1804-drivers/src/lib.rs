//! Hardware driver implementations
//!
//! This crate provides the concrete implementation of the
//! [`Potentiometer`](ds1804_core::traits::Potentiometer) trait for the
//! Maxim DS1804 100-position nonvolatile trimmer potentiometer, driven
//! over its three-wire CS / INC / U/D interface with `embedded-hal` pins.
//!
//! ```ignore
//! let mut pot = Ds1804::from_variant(cs, inc, ud, delay, Variant::Ten)?;
//! pot.set_to_zero()?;
//! pot.set_resistance(4_700)?;
//! pot.write()?; // persist the tap across power cycles
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod ds1804;
pub mod error;

#[cfg(test)]
mod sim;

pub use ds1804::Ds1804;
pub use error::Ds1804Error;
