//! Board-agnostic core types for DS1804 potentiometer firmware
//!
//! This crate contains everything that does not depend on a concrete
//! pin or delay implementation:
//!
//! - Calibration and resistance/tap range mapping
//! - Device variants and datasheet timing constants
//! - The [`Potentiometer`](traits::Potentiometer) trait
//! - The `trimpot.toml` configuration parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod traits;
