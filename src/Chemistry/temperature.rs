//! Temperatures typed by a user: `25`, `77F`, `300 K`, `-40c`. Celsius when no unit is given.
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static TEMPERATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-+]?[0-9]*\.?[0-9]+)\s*([cfk]?)$").expect("temperature pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemperatureError {
    #[error("Invalid temperature format: '{0}'")]
    Format(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        };
        f.write_str(unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub value: f64,
    pub unit: TemperatureUnit,
}

impl Temperature {
    pub fn to_kelvin(&self) -> f64 {
        to_kelvin(self.value, self.unit)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} {}", self.value, self.unit)
    }
}

pub fn parse_temperature(text: &str) -> Result<Temperature, TemperatureError> {
    let normalized = text.trim().to_lowercase();
    let caps = TEMPERATURE
        .captures(&normalized)
        .ok_or_else(|| TemperatureError::Format(text.trim().to_string()))?;
    let value = caps[1]
        .parse::<f64>()
        .map_err(|_| TemperatureError::Format(text.trim().to_string()))?;
    let unit = match &caps[2] {
        "f" => TemperatureUnit::Fahrenheit,
        "k" => TemperatureUnit::Kelvin,
        _ => TemperatureUnit::Celsius,
    };
    Ok(Temperature { value, unit })
}

pub fn to_kelvin(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => value + 273.15,
        TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0 + 273.15,
        TemperatureUnit::Kelvin => value,
    }
}
