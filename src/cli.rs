use crate::models::ViewMode;
use crate::sources::{SourceConfig, DEFAULT_CRYPTO_API, DEFAULT_WEATHER_API};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

fn parse_refresh_rate(s: &str) -> Result<u64, String> {
    s.parse::<u64>()
        .map_err(|_| "Invalid refresh interval".to_string())
        .and_then(|v| {
            if (1..=3600).contains(&v) {
                Ok(v)
            } else {
                Err("Refresh interval must be between 1 and 3600 seconds".to_string())
            }
        })
}

#[derive(Parser, Debug)]
#[command(name = "skyticker")]
#[command(about = "Crypto prices and city weather in your terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive dashboard (default)
    #[command(visible_aliases = &["dash", "d"])]
    Dashboard(DashboardArgs),

    /// Fetch one view once and print it
    #[command(visible_alias = "once")]
    Show(ShowArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Base URL of the CoinGecko-compatible price API
    #[arg(long, default_value = DEFAULT_CRYPTO_API)]
    pub crypto_api: String,

    /// Base URL of the Open-Meteo-compatible weather API
    #[arg(long, default_value = DEFAULT_WEATHER_API)]
    pub weather_api: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    pub timeout: u64,
}

impl SourceArgs {
    pub fn to_config(&self) -> SourceConfig {
        SourceConfig {
            crypto_api: self.crypto_api.clone(),
            weather_api: self.weather_api.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

impl Default for SourceArgs {
    fn default() -> Self {
        Self {
            crypto_api: DEFAULT_CRYPTO_API.to_string(),
            weather_api: DEFAULT_WEATHER_API.to_string(),
            timeout: 10,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    /// View to open with
    #[arg(short, long, value_enum, default_value = "crypto")]
    pub view: ViewMode,

    /// Refresh interval in seconds
    #[arg(short, long, default_value = "60", value_parser = parse_refresh_rate)]
    pub refresh: u64,

    /// How long card numbers take to count up, in milliseconds
    #[arg(long, default_value = "1500")]
    pub animation_ms: u64,

    /// Where to write logs. Defaults to the user cache directory
    #[arg(long)]
    pub log_file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl DashboardArgs {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh)
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    /// Log file path with `~` expanded, or the default under the cache dir
    pub fn log_path(&self) -> Option<PathBuf> {
        match &self.log_file {
            Some(path) => Some(PathBuf::from(shellexpand::tilde(path).into_owned())),
            None => dirs::cache_dir().map(|dir| dir.join("skyticker").join("skyticker.log")),
        }
    }
}

impl Default for DashboardArgs {
    fn default() -> Self {
        Self {
            view: ViewMode::Crypto,
            refresh: 60,
            animation_ms: 1500,
            log_file: None,
            log_level: "info".to_string(),
            source: SourceArgs::default(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// View to fetch
    #[arg(short, long, value_enum, default_value = "crypto")]
    pub view: ViewMode,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Print a colored summary after the output
    #[arg(long)]
    pub summary: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Clone, ValueEnum, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}
