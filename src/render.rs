use crate::acquire::Acquired;
use crate::models::{
    AssetQuote, CardKind, ChartSeries, ChartStyle, CityWeather, MetricCard, Rgb,
};

/// Bar colors, in asset order
pub const COIN_COLORS: [Rgb; 3] = [
    Rgb::from_hex(0xf7931a),
    Rgb::from_hex(0x627eea),
    Rgb::from_hex(0xc2a633),
];
pub const TEMPERATURE_COLOR: Rgb = Rgb::from_hex(0x00d1b2);

/// Cards and chart for one successful acquisition
pub fn build(acquired: &Acquired) -> (Vec<MetricCard>, ChartSeries) {
    match acquired {
        Acquired::Crypto(quotes) => (crypto_cards(quotes), crypto_chart(quotes)),
        Acquired::Weather(cities) => (weather_cards(cities), weather_chart(cities)),
    }
}

pub fn crypto_cards(quotes: &[AssetQuote]) -> Vec<MetricCard> {
    quotes
        .iter()
        .map(|asset| MetricCard {
            label: capitalize(asset.id),
            primary_value: asset.quote.usd,
            secondary_value: Some(asset.quote.usd_24h_change),
            secondary_unit: Some("%".to_string()),
            kind: CardKind::Coin,
        })
        .collect()
}

pub fn weather_cards(cities: &[CityWeather]) -> Vec<MetricCard> {
    cities
        .iter()
        .map(|city| MetricCard {
            label: city.name.clone(),
            primary_value: city.temperature,
            secondary_value: Some(city.windspeed),
            secondary_unit: Some("km/h".to_string()),
            kind: CardKind::City,
        })
        .collect()
}

pub fn crypto_chart(quotes: &[AssetQuote]) -> ChartSeries {
    ChartSeries {
        title: "Price in USD".to_string(),
        labels: quotes.iter().map(|asset| capitalize(asset.id)).collect(),
        values: quotes.iter().map(|asset| asset.quote.usd).collect(),
        style: ChartStyle::Bar,
        colors: COIN_COLORS.iter().copied().cycle().take(quotes.len()).collect(),
        begin_at_zero: true,
        filled: true,
    }
}

pub fn weather_chart(cities: &[CityWeather]) -> ChartSeries {
    ChartSeries {
        title: "Temperature (°C)".to_string(),
        labels: cities.iter().map(|city| city.name.clone()).collect(),
        values: cities.iter().map(|city| city.temperature).collect(),
        style: ChartStyle::Line,
        colors: vec![TEMPERATURE_COLOR],
        begin_at_zero: false,
        filled: true,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoinQuote;

    fn quotes() -> Vec<AssetQuote> {
        vec![
            AssetQuote {
                id: "bitcoin",
                quote: CoinQuote {
                    usd: 50000.0,
                    usd_24h_change: 2.5,
                },
            },
            AssetQuote {
                id: "ethereum",
                quote: CoinQuote {
                    usd: 3000.0,
                    usd_24h_change: -1.2,
                },
            },
            AssetQuote {
                id: "dogecoin",
                quote: CoinQuote {
                    usd: 0.1,
                    usd_24h_change: 5.0,
                },
            },
        ]
    }

    #[test]
    fn test_crypto_cards() {
        let cards = crypto_cards(&quotes());
        let labels: Vec<_> = cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Bitcoin", "Ethereum", "Dogecoin"]);
        assert_eq!(cards[1].secondary_value, Some(-1.2));
        assert_eq!(cards[1].secondary_unit.as_deref(), Some("%"));
    }

    #[test]
    fn test_crypto_chart_is_bar() {
        let chart = crypto_chart(&quotes());
        assert_eq!(chart.style, ChartStyle::Bar);
        assert_eq!(chart.values, vec![50000.0, 3000.0, 0.1]);
        assert_eq!(chart.colors, COIN_COLORS.to_vec());
        assert!(chart.begin_at_zero);
    }

    #[test]
    fn test_weather_chart_is_line() {
        let cities = vec![
            CityWeather {
                name: "Berlin".to_string(),
                temperature: 12.7,
                windspeed: 14.2,
            },
            CityWeather {
                name: "London".to_string(),
                temperature: 9.4,
                windspeed: 22.0,
            },
        ];
        let (cards, chart) = build(&Acquired::Weather(cities));
        assert_eq!(cards[0].kind, CardKind::City);
        assert_eq!(cards[0].secondary_unit.as_deref(), Some("km/h"));
        assert_eq!(chart.style, ChartStyle::Line);
        assert_eq!(chart.labels, vec!["Berlin", "London"]);
        assert_eq!(chart.colors.len(), 1);
        assert!(!chart.begin_at_zero);
    }

    #[test]
    fn test_build_is_deterministic() {
        let acquired = Acquired::Crypto(quotes());
        assert_eq!(build(&acquired), build(&acquired));
    }
}
