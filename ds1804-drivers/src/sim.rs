//! Simulated DS1804 line set for host tests
//!
//! Every level change and delay is appended to an event log so tests can
//! assert exact sequencing. The simulated chip also tracks its own tap
//! the way the silicon does: the wiper moves one step on each falling
//! INC edge while CS is low, and the tap is stored when CS rises with
//! INC high.

use core::cell::RefCell;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error, ErrorKind, ErrorType, OutputPin, StatefulOutputPin};

/// Control line of the chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Cs,
    Inc,
    Ud,
}

/// Recorded bus activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Line driven to a level (true = HIGH)
    Set(Line, bool),
    /// Delay in microseconds
    Delay(u32),
}

/// Injected pin failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimFault;

impl Error for SimFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Simulated chip and its three input lines
#[derive(Debug)]
pub struct SimChip {
    pub cs: bool,
    pub inc: bool,
    pub ud: bool,
    /// Physical tap
    pub tap: u8,
    /// Highest tap
    pub steps: u8,
    /// Tap stored in EEPROM by the last commit
    pub stored: Option<u8>,
    /// Falling INC edges seen, selected or not
    pub pulses: u32,
    /// Fail every line write when set
    pub fail_writes: bool,
    pub events: Vec<Event>,
}

impl SimChip {
    pub fn new(tap: u8) -> RefCell<Self> {
        RefCell::new(Self {
            cs: false,
            inc: false,
            ud: false,
            tap,
            steps: 99,
            stored: None,
            pulses: 0,
            fail_writes: false,
            events: Vec::new(),
        })
    }

    /// Forget recorded events and pulse count
    pub fn clear_log(&mut self) {
        self.events.clear();
        self.pulses = 0;
    }

    /// Sum of all recorded delays
    pub fn total_delay_us(&self) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                Event::Delay(us) => *us,
                Event::Set(..) => 0,
            })
            .sum()
    }

    fn level(&self, line: Line) -> bool {
        match line {
            Line::Cs => self.cs,
            Line::Inc => self.inc,
            Line::Ud => self.ud,
        }
    }

    fn drive(&mut self, line: Line, high: bool) -> Result<(), SimFault> {
        if self.fail_writes {
            return Err(SimFault);
        }
        self.events.push(Event::Set(line, high));

        match line {
            Line::Cs => {
                if !self.cs && high && self.inc {
                    self.stored = Some(self.tap);
                }
                self.cs = high;
            }
            Line::Inc => {
                if self.inc && !high {
                    self.pulses += 1;
                    if !self.cs {
                        self.step();
                    }
                }
                self.inc = high;
            }
            Line::Ud => self.ud = high,
        }
        Ok(())
    }

    fn step(&mut self) {
        if self.ud {
            self.tap = (self.tap + 1).min(self.steps);
        } else {
            self.tap = self.tap.saturating_sub(1);
        }
    }
}

/// One simulated output line
pub struct SimPin<'a> {
    line: Line,
    chip: &'a RefCell<SimChip>,
}

impl<'a> SimPin<'a> {
    pub fn new(line: Line, chip: &'a RefCell<SimChip>) -> Self {
        Self { line, chip }
    }
}

impl ErrorType for SimPin<'_> {
    type Error = SimFault;
}

impl OutputPin for SimPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.chip.borrow_mut().drive(self.line, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.chip.borrow_mut().drive(self.line, true)
    }
}

impl StatefulOutputPin for SimPin<'_> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.chip.borrow().level(self.line))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.chip.borrow().level(self.line))
    }
}

/// Delay provider that only records
pub struct SimDelay<'a> {
    chip: &'a RefCell<SimChip>,
}

impl<'a> SimDelay<'a> {
    pub fn new(chip: &'a RefCell<SimChip>) -> Self {
        Self { chip }
    }
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.chip
            .borrow_mut()
            .events
            .push(Event::Delay(ns.div_ceil(1_000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.chip.borrow_mut().events.push(Event::Delay(us));
    }
}

/// Build the three pins and delay for a simulated chip
pub fn lines(
    chip: &RefCell<SimChip>,
) -> (SimPin<'_>, SimPin<'_>, SimPin<'_>, SimDelay<'_>) {
    (
        SimPin::new(Line::Cs, chip),
        SimPin::new(Line::Inc, chip),
        SimPin::new(Line::Ud, chip),
        SimDelay::new(chip),
    )
}
