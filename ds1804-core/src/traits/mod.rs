//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and chip-specific driver implementations.

pub mod potentiometer;

pub use potentiometer::{Potentiometer, WiperDirection};
