//! # Display Presenter
//!
//! Renders station state onto the two text lines of the character display.
//! While it rains the first line shows a rain notice and the climate line is
//! blanked; otherwise line one is temperature and line two humidity. Every
//! line is padded to the full display width with trailing spaces so a short
//! value completely overwrites whatever longer text was there before, which
//! keeps renders cheap (no `clear`, no flicker).
//!
//! Formatting is split into pure helpers so the exact field layout is unit
//! testable without a display.

use crate::display::{CharDisplay, DisplayError};
use crate::sensors::SensorSnapshot;

/// Notice shown while the rain state is active.
pub const RAIN_NOTICE: &str = "It is raining!";

/// Pad or clip `text` to exactly `width` characters.
pub fn pad_line(text: &str, width: usize) -> String {
    let mut line: String = text.chars().take(width).collect();
    while line.chars().count() < width {
        line.push(' ');
    }
    line
}

/// Temperature line, one decimal place, placeholder before the first valid
/// read: `Temp: 21.5 C` / `Temp: --.- C`.
pub fn format_temperature(reading: Option<f32>) -> String {
    match reading {
        Some(celsius) => format!("Temp: {:.1} C", celsius),
        None => "Temp: --.- C".to_string(),
    }
}

/// Humidity line, same shape as the temperature line.
pub fn format_humidity(reading: Option<f32>) -> String {
    match reading {
        Some(percent) => format!("Hum:  {:.1} %", percent),
        None => "Hum:  --.- %".to_string(),
    }
}

/// Write the current state to the display. Uses rows 0 and 1 only; padded
/// in-place overwrites, never `clear`.
pub fn render<D: CharDisplay>(
    display: &mut D,
    width: usize,
    raining: bool,
    snapshot: &SensorSnapshot,
) -> Result<(), DisplayError> {
    let (first, second) = if raining {
        (RAIN_NOTICE.to_string(), String::new())
    } else {
        (
            format_temperature(snapshot.temperature_c),
            format_humidity(snapshot.humidity_pct),
        )
    };

    display.set_cursor(0, 0)?;
    display.print(&pad_line(&first, width))?;
    display.set_cursor(0, 1)?;
    display.print(&pad_line(&second, width))?;
    Ok(())
}
