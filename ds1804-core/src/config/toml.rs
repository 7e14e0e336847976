//! Minimal parser for `trimpot.toml`
//!
//! Handles only the subset the firmware configuration needs. It does NOT
//! support the full TOML spec.
//!
//! Supported:
//! - `[section]` headers (`potentiometer`, `sweep`)
//! - `key = value` with integer, boolean, string and integer-array values
//! - Comments (`# ...`), including trailing ones
//!
//! ```toml
//! [potentiometer]
//! variant = "DS1804-010"
//! zero_on_boot = true
//!
//! [sweep]
//! targets = [0, 5000, 10000]
//! dwell_ms = 500
//! ```

use heapless::Vec;

use super::{Calibration, Variant};

/// Maximum number of sweep targets
pub const MAX_SWEEP_TARGETS: usize = 16;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Unknown key for the current section
    InvalidKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Too many sweep targets
    TooManyItems,
    /// Part number not recognised
    UnknownVariant,
}

/// `[potentiometer]` section
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotConfig {
    /// Calibration from `variant` or `max_resistance`
    pub calibration: Calibration,
    /// Part variant, if given by part number
    pub variant: Option<Variant>,
    /// Run the zeroing sweep at boot
    pub zero_on_boot: bool,
    /// Known tap to resynchronize the model with when not zeroing
    pub initial_position: Option<u8>,
    /// Store the final tap in EEPROM after the first sweep
    pub commit: bool,
}

impl Default for PotConfig {
    fn default() -> Self {
        Self {
            calibration: Variant::Ten.calibration(),
            variant: Some(Variant::Ten),
            zero_on_boot: true,
            initial_position: None,
            commit: false,
        }
    }
}

/// `[sweep]` section
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepConfig {
    /// Resistances to step through, in ohms
    pub targets: Vec<u32, MAX_SWEEP_TARGETS>,
    /// Time to hold each target
    pub dwell_ms: u32,
    /// Loop over the targets forever
    pub repeat: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            dwell_ms: 500,
            repeat: false,
        }
    }
}

/// Complete firmware configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrimpotConfig {
    /// Chip settings
    pub pot: PotConfig,
    /// Demo sweep
    pub sweep: SweepConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Potentiometer,
    Sweep,
}

/// Parse `trimpot.toml` contents
pub fn parse_config(input: &str) -> Result<TrimpotConfig, ParseError> {
    let mut config = TrimpotConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let line = strip_comment(line);
    if !line.ends_with(']') || line.starts_with("[[") {
        return Err(ParseError::InvalidSection);
    }
    match line[1..line.len() - 1].trim() {
        "potentiometer" => Ok(Section::Potentiometer),
        "sweep" => Ok(Section::Sweep),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(s: &str) -> &str {
    match s.find('#') {
        Some(pos) if s[..pos].matches('"').count() % 2 == 0 => s[..pos].trim(),
        _ => s.trim(),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Result<(&str, &str), ParseError> {
    let eq_pos = line.find('=').ok_or(ParseError::InvalidKey)?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(&line[eq_pos + 1..]);

    if key.is_empty() {
        return Err(ParseError::InvalidKey);
    }
    if value.is_empty() {
        return Err(ParseError::InvalidValue);
    }

    Ok((key, value))
}

fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parse an integer, allowing `_` separators (`10_000`)
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_int_array(value: &str) -> Result<Vec<u32, MAX_SWEEP_TARGETS>, ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut items = Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        // Trailing comma
        if item.is_empty() {
            continue;
        }
        items
            .push(parse_int(item)?)
            .map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(items)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut TrimpotConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Potentiometer => {
            let pot = &mut config.pot;
            match key {
                "variant" => {
                    let variant = Variant::from_part_number(parse_string(value))
                        .ok_or(ParseError::UnknownVariant)?;
                    pot.variant = Some(variant);
                    pot.calibration = variant.calibration();
                }
                "max_resistance" => {
                    pot.variant = None;
                    pot.calibration = Calibration::new(parse_int(value)?);
                }
                "zero_on_boot" => pot.zero_on_boot = parse_bool(value)?,
                "initial_position" => pot.initial_position = Some(parse_int(value)?),
                "commit" => pot.commit = parse_bool(value)?,
                _ => return Err(ParseError::InvalidKey),
            }
        }
        Section::Sweep => {
            let sweep = &mut config.sweep;
            match key {
                "targets" => sweep.targets = parse_int_array(value)?,
                "dwell_ms" => sweep.dwell_ms = parse_int(value)?,
                "repeat" => sweep.repeat = parse_bool(value)?,
                _ => return Err(ParseError::InvalidKey),
            }
        }
        Section::Root => return Err(ParseError::InvalidKey),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Demo configuration
[potentiometer]
variant = "DS1804Z-050"   # 50k in SO package
zero_on_boot = false
initial_position = 42
commit = true

[sweep]
targets = [0, 12_500, 25000, 50000,]
dwell_ms = 250
repeat = true
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.pot.variant, Some(Variant::Fifty));
        assert_eq!(config.pot.calibration, Calibration::new(50_000));
        assert!(!config.pot.zero_on_boot);
        assert_eq!(config.pot.initial_position, Some(42));
        assert!(config.pot.commit);

        assert_eq!(config.sweep.targets.as_slice(), &[0, 12_500, 25_000, 50_000]);
        assert_eq!(config.sweep.dwell_ms, 250);
        assert!(config.sweep.repeat);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, TrimpotConfig::default());
        assert_eq!(config.pot.calibration.max_resistance, 10_000);
        assert!(config.pot.zero_on_boot);
    }

    #[test]
    fn test_custom_max_resistance() {
        let config = parse_config("[potentiometer]\nmax_resistance = 12000\n").unwrap();
        assert_eq!(config.pot.variant, None);
        assert_eq!(config.pot.calibration.max_resistance, 12_000);
        assert_eq!(config.pot.calibration.step_count, 99);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_config("[motor]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[sweep"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("dwell_ms = 5"), Err(ParseError::InvalidKey));
        assert_eq!(
            parse_config("[sweep]\nspeed = 5"),
            Err(ParseError::InvalidKey)
        );
        assert_eq!(
            parse_config("[sweep]\ndwell_ms = soon"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[potentiometer]\nvariant = \"DS1804-020\""),
            Err(ParseError::UnknownVariant)
        );
        assert_eq!(
            parse_config("[potentiometer]\ninitial_position = 300"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_too_many_targets() {
        let config = "[sweep]\ntargets = [1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16,17]";
        assert_eq!(parse_config(config), Err(ParseError::TooManyItems));
    }

    #[test]
    fn test_parse_key_value_strips_comment() {
        assert_eq!(parse_key_value("a = 1 # one"), Ok(("a", "1")));
        assert_eq!(parse_key_value("a = \"x#y\""), Ok(("a", "\"x#y\"")));
        assert_eq!(parse_key_value("a ="), Err(ParseError::InvalidValue));
        assert_eq!(parse_key_value("= 1"), Err(ParseError::InvalidKey));
    }

    #[test]
    fn test_line_without_value_is_rejected() {
        assert_eq!(parse_config("[sweep]
repeat"), Err(ParseError::InvalidKey));
        assert_eq!(
            parse_config("[sweep]
dwell_ms =   # later"),
            Err(ParseError::InvalidValue)
        );
    }
}
