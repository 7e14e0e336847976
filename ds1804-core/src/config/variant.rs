//! DS1804 part variants
//!
//! Each resistance grade ships as DS1804 (DIP), DS1804Z (SO) and
//! DS1804U (µSOP). The package does not change the electrical model.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Calibration;

/// End-to-end resistance of the 10k grade (DS1804-010)
pub const DS1804_TEN: u32 = 10_000;
/// End-to-end resistance of the 50k grade (DS1804-050)
pub const DS1804_FIFTY: u32 = 50_000;
/// End-to-end resistance of the 100k grade (DS1804-100)
pub const DS1804_HUNDRED: u32 = 100_000;

/// DS1804 resistance grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Variant {
    /// 10 kΩ
    #[default]
    Ten,
    /// 50 kΩ
    Fifty,
    /// 100 kΩ
    Hundred,
}

impl Variant {
    /// End-to-end resistance in ohms
    pub const fn max_resistance(self) -> u32 {
        match self {
            Variant::Ten => DS1804_TEN,
            Variant::Fifty => DS1804_FIFTY,
            Variant::Hundred => DS1804_HUNDRED,
        }
    }

    /// Calibration for this grade
    pub const fn calibration(self) -> Calibration {
        Calibration::new(self.max_resistance())
    }

    /// Resistance-grade suffix used in part numbers
    pub const fn suffix(self) -> &'static str {
        match self {
            Variant::Ten => "010",
            Variant::Fifty => "050",
            Variant::Hundred => "100",
        }
    }

    /// Parse a part number or grade
    ///
    /// Accepts full part numbers with any package letter (`DS1804-010`,
    /// `DS1804Z-050`, `ds1804u-100`), bare suffixes (`010`) and shorthand
    /// (`10k`, `50k`, `100k`). Matching is case-insensitive.
    pub fn from_part_number(s: &str) -> Option<Self> {
        let s = s.trim();
        let grade = match s.rfind('-') {
            Some(pos) => {
                let prefix = &s[..pos];
                let known = ["ds1804", "ds1804z", "ds1804u"]
                    .iter()
                    .any(|p| prefix.eq_ignore_ascii_case(p));
                if !known {
                    return None;
                }
                &s[pos + 1..]
            }
            None => s,
        };

        [Variant::Ten, Variant::Fifty, Variant::Hundred]
            .into_iter()
            .find(|v| {
                grade == v.suffix()
                    || grade.eq_ignore_ascii_case(v.shorthand())
            })
    }

    fn shorthand(self) -> &'static str {
        match self {
            Variant::Ten => "10k",
            Variant::Fifty => "50k",
            Variant::Hundred => "100k",
        }
    }
}
