//! Build script for deflect-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates deflect.toml and compiles it into the firmware as constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use deflect_core::config::{ConfigError, ControllerConfig};
use serde::Deserialize;

/// Layout of deflect.toml
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    serial: SerialSection,
    #[serde(default)]
    servo: ServoSection,
    #[serde(default)]
    controller: ControllerConfig,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SerialSection {
    baud: u32,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self { baud: 115200 }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServoSection {
    min_pulse_us: u16,
    max_pulse_us: u16,
    period_us: u16,
    travel_deg: u8,
}

impl Default for ServoSection {
    fn default() -> Self {
        Self {
            min_pulse_us: 544,
            max_pulse_us: 2400,
            period_us: 20_000,
            travel_deg: 180,
        }
    }
}

fn main() {
    setup_linker();
    generate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate deflect.toml and emit it as Rust constants
fn generate_config() {
    // Re-run if deflect.toml changes
    println!("cargo:rerun-if-changed=deflect.toml");

    let config_path = Path::new("deflect.toml");

    if !config_path.exists() {
        fail(
            "ERROR: deflect.toml not found!",
            &[
                "The firmware requires a deflect.toml configuration file.".to_string(),
                "Please create one in the deflect-firmware directory.".to_string(),
            ],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("ERROR: Failed to read deflect.toml", &[e.to_string()]),
    };

    let config: FileConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => fail(
            "ERROR: Invalid deflect.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();

    if config.serial.baud == 0 {
        errors.push("[serial] baud must be non-zero".to_string());
    }

    let servo = &config.servo;
    if servo.min_pulse_us >= servo.max_pulse_us {
        errors.push("[servo] min_pulse_us must be below max_pulse_us".to_string());
    }
    if servo.max_pulse_us > servo.period_us {
        errors.push("[servo] max_pulse_us must not exceed period_us".to_string());
    }
    if servo.travel_deg == 0 {
        errors.push("[servo] travel_deg must be non-zero".to_string());
    }
    if config.controller.max_angle_deg > servo.travel_deg {
        errors.push("[controller] max_angle_deg exceeds [servo] travel_deg".to_string());
    }

    if let Err(e) = config.controller.validate() {
        errors.push(format!("[controller] {}", describe(e)));
    }

    if !errors.is_empty() {
        fail(
            "ERROR: Invalid configuration in deflect.toml",
            &errors.iter().map(|e| format!("• {}", e)).collect::<Vec<_>>(),
        );
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("deflect_config.rs"), render(&config)).unwrap();

    println!("cargo:warning=deflect.toml validated successfully");
}

/// Human-readable reason for a rejected controller configuration
fn describe(error: ConfigError) -> &'static str {
    match error {
        ConfigError::ZeroSampleWindow => "sample_window must be at least 1",
        ConfigError::EmptyBand => "a sensor band admits no reading (max must exceed min + 1)",
        ConfigError::OverlappingBands => "left_band and right_band overlap",
        ConfigError::CoincidentPositions => {
            "swing_deg must be non-zero and differ from idle_offset_deg"
        }
        ConfigError::PositionOutOfRange => {
            "center +/- swing, wiggle or idle offset leaves 0..=max_angle_deg"
        }
    }
}

/// Render the generated constants module
fn render(config: &FileConfig) -> String {
    let c = &config.controller;
    let s = &config.servo;
    format!(
        "// Generated by build.rs from deflect.toml\n\
         \n\
         /// Serial console baud rate\n\
         pub const SERIAL_BAUD: u32 = {baud};\n\
         \n\
         /// Servo pulse timing\n\
         pub const SERVO: ServoConfig = ServoConfig {{\n\
         \x20   min_pulse_us: {min_pulse},\n\
         \x20   max_pulse_us: {max_pulse},\n\
         \x20   period_us: {period},\n\
         \x20   travel_deg: {travel},\n\
         }};\n\
         \n\
         /// Controller tunables\n\
         pub const CONTROLLER: ControllerConfig = ControllerConfig {{\n\
         \x20   center_deg: {center},\n\
         \x20   swing_deg: {swing},\n\
         \x20   max_angle_deg: {max_angle},\n\
         \x20   left_band: SensorBand::new({left_min}, {left_max}),\n\
         \x20   right_band: SensorBand::new({right_min}, {right_max}),\n\
         \x20   sample_window: {window},\n\
         \x20   loop_delay_ms: {loop_delay},\n\
         \x20   idle_timeout_multiplier: {idle_mult},\n\
         \x20   settle_ms: {settle},\n\
         \x20   wiggle_deg: {wiggle},\n\
         \x20   wiggle_hold_ms: {wiggle_hold},\n\
         \x20   idle_offset_deg: {idle_offset},\n\
         }};\n",
        baud = config.serial.baud,
        min_pulse = s.min_pulse_us,
        max_pulse = s.max_pulse_us,
        period = s.period_us,
        travel = s.travel_deg,
        center = c.center_deg,
        swing = c.swing_deg,
        max_angle = c.max_angle_deg,
        left_min = c.left_band.min,
        left_max = c.left_band.max,
        right_min = c.right_band.min,
        right_max = c.right_band.max,
        window = c.sample_window,
        loop_delay = c.loop_delay_ms,
        idle_mult = c.idle_timeout_multiplier,
        settle = c.settle_ms,
        wiggle = c.wiggle_deg,
        wiggle_hold = c.wiggle_hold_ms,
        idle_offset = c.idle_offset_deg,
    )
}

/// Abort the build with a boxed error report
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.clone()
            };
            format!("║  {:<64}║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  {:<64}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
