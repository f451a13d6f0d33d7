// Weather card projection.
// Turns a raw report into display strings; no state and no failure cases.

use chrono::{DateTime, Local};

use crate::weather::{CLEAR_SKY_CODE, WeatherReport};

const ABSOLUTE_ZERO_C: f64 = 273.15;
const PLACEHOLDER: &str = "—";

/// Display-ready values for the results card.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub location: String,
    pub icon: &'static str,
    /// Whole degrees Celsius.
    pub temperature: i64,
    pub description: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub updated_at: String,
}

impl WeatherCard {
    pub fn from_report(report: &WeatherReport, now: DateTime<Local>) -> Self {
        let primary = report.primary();
        let label = primary.map(|c| c.main.as_str()).unwrap_or_default();
        let code = primary.map(|c| c.id).unwrap_or(CLEAR_SKY_CODE);
        let description = primary
            .map(|c| c.description.as_str())
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(PLACEHOLDER);

        Self {
            location: report.display_name(PLACEHOLDER).to_string(),
            icon: icon_for(label, code),
            temperature: kelvin_to_celsius(report.main.temp),
            description: capitalize_words(description),
            feels_like: format!("{} °C", kelvin_to_celsius(report.main.feels_like)),
            humidity: format!("{} %", report.main.humidity),
            wind: format!("{:.1} m/s", report.wind.speed),
            pressure: format!("{} hPa", report.main.pressure),
            updated_at: format!("Updated: {}", now.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Kelvin to whole degrees Celsius, halves rounded up.
pub fn kelvin_to_celsius(kelvin: f64) -> i64 {
    (kelvin - ABSOLUTE_ZERO_C + 0.5).floor() as i64
}

/// Upper-case the first letter of every word.
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

/// Glyph for a condition: label keywords first, then the numeric code range.
pub fn icon_for(label: &str, code: i64) -> &'static str {
    let label = label.to_lowercase();
    let by_label = [
        (&["cloud"][..], "☁️"),
        (&["rain"][..], "🌧️"),
        (&["drizzle"][..], "🌦️"),
        (&["thunder"][..], "⛈️"),
        (&["snow"][..], "❄️"),
        (&["mist", "fog", "haze"][..], "🌫️"),
        (&["clear"][..], "☀️"),
    ];
    for (keywords, glyph) in by_label {
        if keywords.iter().any(|k| label.contains(k)) {
            return glyph;
        }
    }

    match code {
        200..=299 => "⛈️",
        300..=599 => "🌧️",
        600..=699 => "❄️",
        700..=799 => "🌫️",
        800 => "☀️",
        _ => "⛅",
    }
}
