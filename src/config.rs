//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! station-config.toml file. It exists to rebind pin numbers and polarities
//! to a particular wiring harness; behavior tuning (tick period, debounce
//! window, poll intervals, thresholds) ships as compile-time defaults and
//! normally stays untouched.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration loaded from station-config.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// GPIO line bindings and polarities
    pub pins: PinConfig,
    /// Tick, debounce and poll timing
    pub timing: TimingConfig,
    /// Control rule tuning
    pub control: ControlConfig,
    /// Character display geometry
    pub display: DisplayConfig,
}

/// GPIO bindings, BCM numbering. Polarity flags mark lines whose electrical
/// low means "active" (open-drain rain comparators, pull-up buttons); the
/// adapters resolve them so the core only sees logical levels.
#[derive(Debug, Deserialize, Serialize)]
pub struct PinConfig {
    /// Rain sensor digital out
    pub rain_bcm: u8,
    /// Rain comparator pulls low when wet
    pub rain_active_low: bool,
    /// PIR presence detector
    pub presence_bcm: u8,
    pub presence_active_low: bool,
    /// Manual light toggle button
    pub toggle_bcm: u8,
    /// Button wired to ground with the internal pull-up
    pub toggle_active_low: bool,
    /// Indicator LED pair
    pub indicator_a_bcm: u8,
    pub indicator_b_bcm: u8,
    /// On/off buzzer
    pub buzzer_bcm: u8,
}

/// All scheduling is expressed in ticks of the base period.
#[derive(Debug, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Base tick period in milliseconds
    pub tick_period_ms: u64,
    /// Consecutive agreeing samples before a rain change commits
    pub debounce_window_ticks: u32,
    /// Ticks between luminosity polls
    pub luminosity_poll_ticks: u32,
    /// Ticks between temperature/humidity polls
    pub climate_poll_ticks: u32,
    /// How long the presence buzzer sounds
    pub buzzer_duration_ticks: u32,
    /// How long the start-up banner stays on screen, in milliseconds
    pub startup_banner_ms: u64,
}

/// Control rule tuning
#[derive(Debug, Deserialize, Serialize)]
pub struct ControlConfig {
    /// Below this many lux the indicator pair turns on
    pub lux_on_threshold: f32,
}

/// Character display geometry
#[derive(Debug, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Columns per line
    pub columns: usize,
    /// Number of lines
    pub rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pins: PinConfig {
                rain_bcm: 17,
                rain_active_low: true, // comparator DO sinks when wet
                presence_bcm: 27,
                presence_active_low: false,
                toggle_bcm: 22,
                toggle_active_low: true, // button to ground, internal pull-up
                indicator_a_bcm: 5,
                indicator_b_bcm: 6,
                buzzer_bcm: 13,
            },
            timing: TimingConfig {
                tick_period_ms: 1,
                debounce_window_ticks: 200, // ~200 ms of agreeing samples
                luminosity_poll_ticks: 1000,
                climate_poll_ticks: 2000,
                buzzer_duration_ticks: 1000,
                startup_banner_ms: 2000,
            },
            control: ControlConfig {
                lux_on_threshold: 50.0,
            },
            display: DisplayConfig {
                columns: 20, // 2004 character module
                rows: 4,
            },
        }
    }
}

impl Config {
    /// Load configuration from station-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("station-config.toml")
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    println!(
                        "Loaded configuration (rain on BCM {}, presence on BCM {})",
                        config.pins.rain_bcm, config.pins.presence_bcm
                    );
                    config
                }
                Err(e) => {
                    eprintln!("Warning: Invalid config file format: {}", e);
                    eprintln!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                eprintln!("Info: No config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Save current configuration to station-config.toml
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write("station-config.toml", contents)?;
        println!("Configuration saved to station-config.toml");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timing.tick_period_ms, 1);
        assert_eq!(config.timing.debounce_window_ticks, 200);
        assert_eq!(config.timing.luminosity_poll_ticks, 1000);
        assert_eq!(config.timing.climate_poll_ticks, 2000);
        assert_eq!(config.timing.buzzer_duration_ticks, 1000);
        assert_eq!(config.control.lux_on_threshold, 50.0);
        assert_eq!(config.display.columns, 20);
        assert_eq!(config.display.rows, 4);
        assert!(config.pins.toggle_active_low);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.pins.rain_bcm, parsed.pins.rain_bcm);
        assert_eq!(
            config.timing.debounce_window_ticks,
            parsed.timing.debounce_window_ticks
        );
        assert_eq!(config.control.lux_on_threshold, parsed.control.lux_on_threshold);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config.timing.tick_period_ms, 1);
        assert_eq!(config.pins.rain_bcm, 17);
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let mut file = NamedTempFile::new().expect("Should create temp file");
        writeln!(file, "pins = [this is not toml").expect("Should write");

        let config = Config::load_from_path(file.path());
        assert_eq!(config.display.columns, 20);
        assert_eq!(config.timing.climate_poll_ticks, 2000);
    }

    #[test]
    fn test_partial_override_from_file() {
        let mut file = NamedTempFile::new().expect("Should create temp file");
        write!(
            file,
            r#"
[pins]
rain_bcm = 23
rain_active_low = false
presence_bcm = 24
presence_active_low = false
toggle_bcm = 25
toggle_active_low = true
indicator_a_bcm = 16
indicator_b_bcm = 20
buzzer_bcm = 21

[timing]
tick_period_ms = 1
debounce_window_ticks = 150
luminosity_poll_ticks = 500
climate_poll_ticks = 4000
buzzer_duration_ticks = 800
startup_banner_ms = 1000

[control]
lux_on_threshold = 80.0

[display]
columns = 16
rows = 2
"#
        )
        .expect("Should write");

        let config = Config::load_from_path(file.path());
        assert_eq!(config.pins.rain_bcm, 23);
        assert!(!config.pins.rain_active_low);
        assert_eq!(config.timing.debounce_window_ticks, 150);
        assert_eq!(config.control.lux_on_threshold, 80.0);
        assert_eq!(config.display.columns, 16);
    }
}
