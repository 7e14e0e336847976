//! Potentiometer sweep task
//!
//! Brings the DS1804 to a known tap, then steps through the configured
//! resistances, dwelling on each. With `commit` set, the first pass ends
//! by storing the tap in EEPROM and locking the chip, which ends the sweep.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Delay, Timer};

use ds1804_core::config::TrimpotConfig;
use ds1804_drivers::{Ds1804, Ds1804Error};

/// DS1804 on RP2040 GPIO
pub type Pot = Ds1804<Output<'static>, Output<'static>, Output<'static>, Delay>;

type PotError = Ds1804Error<core::convert::Infallible>;

/// Sweep task
///
/// Never returns: dropping the driver would lower INC and step an
/// unlocked wiper, so the task keeps it alive once the sweep is over.
#[embassy_executor::task]
pub async fn pot_task(mut pot: Pot, config: TrimpotConfig) {
    info!("Potentiometer task started");

    if let Err(e) = prepare(&mut pot, &config) {
        error!("DS1804 setup failed: {}", e);
    } else if config.sweep.targets.is_empty() {
        info!("No sweep targets");
    } else {
        sweep(&mut pot, &config).await;
    }

    info!("Holding tap {}", pot.wiper_position());
    loop {
        Timer::after_secs(3600).await;
    }
}

/// Step through the targets, once or forever
async fn sweep(pot: &mut Pot, config: &TrimpotConfig) {
    loop {
        for &target in config.sweep.targets.iter() {
            match pot.set_resistance(target) {
                Ok(actual) => info!(
                    "Requested {} ohms -> tap {} ({} ohms)",
                    target,
                    pot.wiper_position(),
                    actual
                ),
                Err(e) => warn!("Move to {} ohms failed: {}", target, e),
            }
            Timer::after_millis(config.sweep.dwell_ms as u64).await;
        }

        if config.pot.commit {
            // Locked afterwards, further passes would not move the wiper
            if let Err(e) = commit(pot) {
                warn!("EEPROM commit failed: {}", e);
            }
            return;
        }

        if !config.sweep.repeat {
            info!("Sweep finished");
            return;
        }
    }
}

/// Bring the model and the chip into agreement
fn prepare(pot: &mut Pot, config: &TrimpotConfig) -> Result<(), PotError> {
    pot.unlock()?;

    if config.pot.zero_on_boot {
        pot.set_to_zero()?;
        info!("Wiper zeroed");
    } else if let Some(position) = config.pot.initial_position {
        let position = pot.override_wiper_position(position);
        info!("Wiper model set to recalled tap {}", position);
    } else {
        warn!("Wiper position unknown, assuming tap 0");
    }
    Ok(())
}

/// Store the current tap and lock the wiper
fn commit(pot: &mut Pot) -> Result<(), PotError> {
    pot.write()?;
    pot.lock()?;
    info!(
        "Stored tap {} ({} ohms) and locked",
        pot.wiper_position(),
        pot.resistance()
    );
    Ok(())
}
