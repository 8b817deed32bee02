use crate::error::FetchError;
use crate::models::{City, CoinQuote, CurrentWeather, ForecastResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CRYPTO_API: &str = "https://api.coingecko.com";
pub const DEFAULT_WEATHER_API: &str = "https://api.open-meteo.com";

/// Asset ids requested from the price API, in display order
pub const ASSETS: [&str; 3] = ["bitcoin", "ethereum", "dogecoin"];

/// Cities shown in weather mode, in display order
pub static CITIES: [City; 3] = [
    City {
        name: "Berlin",
        latitude: 52.52,
        longitude: 13.405,
    },
    City {
        name: "London",
        latitude: 51.5074,
        longitude: -0.1278,
    },
    City {
        name: "New York",
        latitude: 40.7128,
        longitude: -74.0060,
    },
];

/// Upstream collaborators. The dashboard only ever talks to one of these,
/// which keeps the HTTP details out of the controller and lets tests swap in
/// canned responses.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Price and 24h change for each requested asset id. Ids the upstream
    /// doesn't know about are simply absent from the map.
    async fn coin_prices(&self, ids: &[&str]) -> Result<HashMap<String, CoinQuote>, FetchError>;

    async fn current_weather(&self, city: &City) -> Result<CurrentWeather, FetchError>;
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub crypto_api: String,
    pub weather_api: String,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            crypto_api: DEFAULT_CRYPTO_API.to_string(),
            weather_api: DEFAULT_WEATHER_API.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// CoinGecko + Open-Meteo over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    config: SourceConfig,
}

impl HttpSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("skyticker/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    fn price_url(&self) -> String {
        format!(
            "{}/api/v3/simple/price",
            self.config.crypto_api.trim_end_matches('/')
        )
    }

    fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.config.weather_api.trim_end_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        debug!("GET {} {:?}", url, query);
        let network = |source: reqwest::Error| FetchError::Network {
            url: url.clone(),
            source,
        };
        let body = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(network)?
            .bytes()
            .await
            .map_err(network)?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn coin_prices(&self, ids: &[&str]) -> Result<HashMap<String, CoinQuote>, FetchError> {
        let query = [
            ("ids", ids.join(",")),
            ("vs_currencies", "usd".to_string()),
            ("include_24hr_change", "true".to_string()),
        ];
        self.get_json(self.price_url(), &query).await
    }

    async fn current_weather(&self, city: &City) -> Result<CurrentWeather, FetchError> {
        let query = [
            ("latitude", city.latitude.to_string()),
            ("longitude", city.longitude.to_string()),
            ("current_weather", "true".to_string()),
        ];
        let response: ForecastResponse = self.get_json(self.forecast_url(), &query).await?;
        Ok(response.current_weather)
    }
}
