//! DS1804 demo firmware
//!
//! Drives one DS1804 trimmer potentiometer from an RP2040 according to
//! the `trimpot.toml` compiled into the image.
//!
//! Wiring: CS = GPIO2, INC = GPIO3, U/D = GPIO4.

#![no_std]
#![no_main]

mod tasks;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use ds1804_core::config::{parse_config, TrimpotConfig};
use ds1804_drivers::Ds1804;

use crate::tasks::pot_task;

/// Embedded configuration (compiled into firmware)
/// Edit trimpot.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../trimpot.toml");

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("DS1804 firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Potentiometer: {} ohms over {} steps, zero_on_boot={}, commit={}",
        config.pot.calibration.max_resistance,
        config.pot.calibration.step_count,
        config.pot.zero_on_boot,
        config.pot.commit
    );

    // CS starts low: chip selected, wiper unlocked
    let cs = Output::new(p.PIN_2, Level::Low);
    let inc = Output::new(p.PIN_3, Level::High);
    let ud = Output::new(p.PIN_4, Level::Low);

    let pot = match Ds1804::with_calibration(cs, inc, ud, Delay, config.pot.calibration) {
        Ok(pot) => pot,
        Err(e) => {
            error!("Failed to initialize DS1804: {}", e);
            return;
        }
    };
    info!("DS1804 initialized");

    spawner.spawn(pot_task(pot, config)).unwrap();
    info!("All tasks spawned");
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> TrimpotConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Configuration loaded");
            config
        }
        Err(e) => {
            warn!("Failed to parse trimpot.toml: {}, using defaults", e);
            TrimpotConfig::default()
        }
    }
}
