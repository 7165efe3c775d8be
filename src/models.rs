use crate::constants::*;
use serde::Deserialize;
use std::fmt;

/// Format YQL is asked to answer in, also used as the `produces` attribute of a binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    /// Returns the value sent in the `format` request parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ResponseFormat {
    fn from(value: &str) -> Self {
        let lower = value.trim().to_lowercase();

        if XML_ALIASES.contains(&lower.as_str()) {
            Self::Xml
        } else if JSON_ALIASES.contains(&lower.as_str()) {
            Self::Json
        } else {
            // Default silently to JSON; callers can decide to log if needed.
            Self::Json
        }
    }
}

/// Temperature unit understood by the `weather.forecast` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celsius => "c",
            Self::Fahrenheit => "f",
        }
    }
}

impl From<&str> for TemperatureUnit {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" => Self::Celsius,
            _ => Self::Fahrenheit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_format_aliases() {
        assert_eq!(ResponseFormat::from("xml"), ResponseFormat::Xml);
        assert_eq!(ResponseFormat::from("X"), ResponseFormat::Xml);
        assert_eq!(ResponseFormat::from("json"), ResponseFormat::Json);
        assert_eq!(ResponseFormat::from(" j "), ResponseFormat::Json);
    }

    #[test]
    fn test_response_format_unknown_defaults_to_json() {
        assert_eq!(ResponseFormat::from("yaml"), ResponseFormat::Json);
        assert_eq!(ResponseFormat::from(""), ResponseFormat::Json);
    }

    #[test]
    fn test_response_format_display() {
        assert_eq!(ResponseFormat::Xml.to_string(), "xml");
        assert_eq!(ResponseFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_temperature_unit() {
        assert_eq!(TemperatureUnit::from("C"), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::from("celsius").as_str(), "c");
        assert_eq!(TemperatureUnit::from("f"), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from("kelvin"), TemperatureUnit::Fahrenheit);
    }
}
