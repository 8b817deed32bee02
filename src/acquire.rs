//! The two data-acquisition algorithms, one per view. Each is a single
//! all-or-nothing unit: any failure fails the whole acquisition.

use crate::error::FetchError;
use crate::models::{AssetQuote, CityWeather, ViewMode};
use crate::sources::{DataSource, ASSETS, CITIES};
use futures::future::try_join_all;
use tracing::{debug, info};

/// Result of acquiring one view's data
#[derive(Debug, Clone, PartialEq)]
pub enum Acquired {
    Crypto(Vec<AssetQuote>),
    Weather(Vec<CityWeather>),
}

pub async fn acquire(source: &dyn DataSource, mode: ViewMode) -> Result<Acquired, FetchError> {
    match mode {
        ViewMode::Crypto => fetch_crypto(source).await.map(Acquired::Crypto),
        ViewMode::Weather => fetch_weather(source).await.map(Acquired::Weather),
    }
}

/// One request for all assets. The result is in [ASSETS] order; an asset
/// missing from the response fails the whole fetch.
pub async fn fetch_crypto(source: &dyn DataSource) -> Result<Vec<AssetQuote>, FetchError> {
    info!("Fetching prices for {}", ASSETS.join(","));
    let mut prices = source.coin_prices(&ASSETS).await?;

    ASSETS
        .iter()
        .map(|&id| {
            prices
                .remove(id)
                .map(|quote| AssetQuote { id, quote })
                .ok_or_else(|| FetchError::MissingAsset(id.to_string()))
        })
        .collect()
}

/// One request per city, all in flight at once. `try_join_all` keeps input
/// order no matter which response lands first, and bails on the first error.
pub async fn fetch_weather(source: &dyn DataSource) -> Result<Vec<CityWeather>, FetchError> {
    info!("Fetching current weather for {} cities", CITIES.len());
    let requests = CITIES.iter().map(|city| async move {
        let current = source.current_weather(city).await?;
        debug!("Weather for {}: {:?}", city.name, current);
        Ok::<_, FetchError>(CityWeather {
            name: city.name.to_string(),
            temperature: current.temperature,
            windspeed: current.windspeed,
        })
    });

    try_join_all(requests).await
}
