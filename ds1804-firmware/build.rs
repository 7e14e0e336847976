//! Build script for ds1804-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates trimpot.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Must match `ds1804_core::config::MAX_SWEEP_TARGETS`
const MAX_SWEEP_TARGETS: usize = 16;

const VARIANTS: [(&str, i64); 3] = [("010", 10_000), ("050", 50_000), ("100", 100_000)];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate trimpot.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=trimpot.toml");

    let config_path = Path::new("trimpot.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: trimpot.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds trimpot.toml from the ds1804-firmware       ║\n\
            ║  directory. Create one before building.                          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read trimpot.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in trimpot.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    let max_resistance = validate_potentiometer(&config, &mut errors);
    validate_sweep(&config, max_resistance, &mut errors);

    if !errors.is_empty() {
        fail("Invalid configuration in trimpot.toml", &errors);
    }

    println!("cargo:warning=trimpot.toml validated successfully");
}

/// Check the [potentiometer] section, returning the configured resistance
fn validate_potentiometer(config: &toml::Value, errors: &mut Vec<String>) -> i64 {
    let pot = match config.get("potentiometer") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[potentiometer] must be a table".to_string());
            return 10_000;
        }
        None => return 10_000,
    };

    for key in pot.keys() {
        if !["variant", "max_resistance", "zero_on_boot", "initial_position", "commit"]
            .contains(&key.as_str())
        {
            errors.push(format!("[potentiometer] unknown key '{}'", key));
        }
    }

    let mut max_resistance = 10_000;

    if let Some(variant) = pot.get("variant") {
        match variant.as_str().and_then(variant_resistance) {
            Some(r) => max_resistance = r,
            None => errors.push(
                "[potentiometer] variant must be DS1804-010, DS1804-050 or DS1804-100".to_string(),
            ),
        }
    }

    if let Some(r) = pot.get("max_resistance") {
        match r.as_integer() {
            Some(r) if r > 0 && r <= u32::MAX as i64 => max_resistance = r,
            _ => errors.push("[potentiometer] max_resistance must be a positive integer".to_string()),
        }
    }

    if let Some(p) = pot.get("initial_position") {
        if !matches!(p.as_integer(), Some(0..=99)) {
            errors.push("[potentiometer] initial_position must be 0-99".to_string());
        }
    }

    for key in ["zero_on_boot", "commit"] {
        if let Some(v) = pot.get(key) {
            if v.as_bool().is_none() {
                errors.push(format!("[potentiometer] {} must be true or false", key));
            }
        }
    }

    max_resistance
}

/// Check the [sweep] section
fn validate_sweep(config: &toml::Value, max_resistance: i64, errors: &mut Vec<String>) {
    let sweep = match config.get("sweep") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[sweep] must be a table".to_string());
            return;
        }
        None => return,
    };

    for key in sweep.keys() {
        if !["targets", "dwell_ms", "repeat"].contains(&key.as_str()) {
            errors.push(format!("[sweep] unknown key '{}'", key));
        }
    }

    match sweep.get("targets") {
        Some(toml::Value::Array(targets)) => {
            if targets.len() > MAX_SWEEP_TARGETS {
                errors.push(format!("[sweep] at most {} targets", MAX_SWEEP_TARGETS));
            }
            for (i, target) in targets.iter().enumerate() {
                match target.as_integer() {
                    Some(r) if (0..=max_resistance).contains(&r) => {}
                    Some(r) => errors.push(format!(
                        "[sweep] target {} ({} ohms) outside 0-{}",
                        i, r, max_resistance
                    )),
                    None => errors.push(format!("[sweep] target {} must be an integer", i)),
                }
            }
        }
        Some(_) => errors.push("[sweep] targets must be an array".to_string()),
        None => {}
    }

    if let Some(d) = sweep.get("dwell_ms") {
        if !matches!(d.as_integer(), Some(0..=4_294_967_295)) {
            errors.push("[sweep] dwell_ms must be a non-negative integer".to_string());
        }
    }
}

/// Resistance for a DS1804 part number or grade
fn variant_resistance(s: &str) -> Option<i64> {
    let s = s.trim().to_ascii_lowercase();
    let grade = match s.rsplit_once('-') {
        Some((prefix, grade)) if ["ds1804", "ds1804z", "ds1804u"].contains(&prefix) => grade,
        Some(_) => return None,
        None => s.as_str(),
    };
    VARIANTS
        .iter()
        .find(|(suffix, r)| grade == *suffix || grade == format!("{}k", r / 1000))
        .map(|(_, r)| *r)
}

/// Abort the build with a boxed error report
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| {
                let truncated = if line.len() > 62 {
                    format!("{}...", &line[..59])
                } else {
                    line.to_string()
                };
                format!("║  • {:<62} ║", truncated)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}
