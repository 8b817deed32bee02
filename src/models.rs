use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which dataset/chart pairing is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum ViewMode {
    #[default]
    Crypto,
    Weather,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Crypto => ViewMode::Weather,
            ViewMode::Weather => ViewMode::Crypto,
        }
    }

    /// Fixed text shown in place of the loading indicator when a refresh fails
    pub fn error_message(self) -> &'static str {
        match self {
            ViewMode::Crypto => "Error loading crypto data.",
            ViewMode::Weather => "Error loading weather data.",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewMode::Crypto => "Crypto",
            ViewMode::Weather => "Weather",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Crypto => write!(f, "crypto"),
            ViewMode::Weather => write!(f, "weather"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Coin,
    City,
}

impl CardKind {
    pub fn primary_caption(self) -> &'static str {
        match self {
            CardKind::Coin => "Price (USD)",
            CardKind::City => "Temperature",
        }
    }

    pub fn primary_unit(self) -> Option<&'static str> {
        match self {
            CardKind::Coin => None,
            CardKind::City => Some("°C"),
        }
    }

    pub fn secondary_caption(self) -> &'static str {
        match self {
            CardKind::Coin => "24h Change",
            CardKind::City => "Windspeed",
        }
    }
}

/// One entity's headline numbers. Rebuilt on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub primary_value: f64,
    pub secondary_value: Option<f64>,
    pub secondary_unit: Option<String>,
    pub kind: CardKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(value: u32) -> Self {
        Self((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub style: ChartStyle,
    /// One color per bar, or a single color for the line
    pub colors: Vec<Rgb>,
    pub begin_at_zero: bool,
    pub filled: bool,
}

/// Price entry returned by the simple price endpoint
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CoinQuote {
    pub usd: f64,
    pub usd_24h_change: f64,
}

/// A coin quote tagged with the asset id it was requested for
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuote {
    pub id: &'static str,
    pub quote: CoinQuote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub current_weather: CurrentWeather,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub windspeed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityWeather {
    pub name: String,
    pub temperature: f64,
    pub windspeed: f64,
}
