use std::env;

use log::{debug, info};
use serde_json::Value;
use thiserror::Error;

use crate::http_client::http_client;
use crate::locations::CityLocation;

const DEFAULT_BASE_URL: &str = "https://api.darksky.net/forecast";
const DEFAULT_CALL_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum WeatherError {
    /// Recoverable: the caller should stop issuing further calls.
    #[error("weather call budget exhausted after {limit} calls")]
    BudgetExhausted { limit: u32 },
    #[error("DARKSKY_API_KEY is not set")]
    MissingApiKey,
    #[error("weather request failed")]
    Http(#[from] reqwest::Error),
    #[error("weather provider returned http {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("weather provider returned invalid json")]
    Decode(#[source] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub call_limit: u32,
    pub dry_run: bool,
}

impl WeatherConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("DARKSKY_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let base_url = env::var("WEATHER_BASE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let call_limit = env::var("WEATHER_CALL_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_CALL_LIMIT);
        let dry_run = env_bool("WEATHER_DRY_RUN", false);

        Self {
            api_key,
            base_url,
            call_limit,
            dry_run,
        }
    }
}

/// What a fetch produced: a parsed observation, or (dry-run mode) the URL the
/// real call would have used.
#[derive(Debug, Clone)]
pub enum WeatherReply {
    Observation(Value),
    RequestUrl(String),
}

/// Historical-weather client for one resolved city. Holds its own call
/// counter; each fetch, dry-run included, costs one unit of the budget.
#[derive(Debug)]
pub struct WeatherFetcher {
    config: WeatherConfig,
    location: CityLocation,
    calls_made: u32,
}

impl WeatherFetcher {
    pub fn new(config: WeatherConfig, location: CityLocation) -> Self {
        Self {
            config,
            location,
            calls_made: 0,
        }
    }

    pub fn calls_made(&self) -> u32 {
        self.calls_made
    }

    pub fn calls_remaining(&self) -> u32 {
        self.config.call_limit.saturating_sub(self.calls_made)
    }

    /// Provider URL for one observation: `{base}/{key}/{lat},{lon},{time}`.
    pub fn request_url(&self, unix_time: i64) -> Result<String, WeatherError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(WeatherError::MissingApiKey)?;
        Ok(format!(
            "{}/{}/{},{},{}",
            self.config.base_url, key, self.location.lat, self.location.lon, unix_time
        ))
    }

    /// Fetches the historical observation for `unix_time` at the fetcher's
    /// location. Refused without network I/O once the budget is spent.
    pub fn fetch(&mut self, unix_time: i64) -> Result<WeatherReply, WeatherError> {
        if self.calls_made >= self.config.call_limit {
            return Err(WeatherError::BudgetExhausted {
                limit: self.config.call_limit,
            });
        }
        let url = self.request_url(unix_time)?;

        if self.config.dry_run {
            self.calls_made += 1;
            debug!("dry-run weather call {} of {}", self.calls_made, self.config.call_limit);
            return Ok(WeatherReply::RequestUrl(url));
        }

        let client = http_client()?;
        let resp = client.get(&url).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(WeatherError::Provider {
                status: status.as_u16(),
                body,
            });
        }
        let value = serde_json::from_str::<Value>(body.trim()).map_err(WeatherError::Decode)?;
        self.calls_made += 1;
        info!(
            "weather call {} of {} for {} at t={unix_time}",
            self.calls_made, self.config.call_limit, self.location.city
        );
        Ok(WeatherReply::Observation(value))
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::{WeatherConfig, WeatherFetcher};
    use crate::locations::CityLocation;

    fn berlin() -> CityLocation {
        CityLocation {
            city: "Berlin".to_string(),
            lat: 52.52,
            lon: 13.405,
        }
    }

    #[test]
    fn request_url_shape() {
        let config = WeatherConfig {
            api_key: Some("secret".to_string()),
            base_url: "https://api.darksky.net/forecast".to_string(),
            call_limit: 10,
            dry_run: true,
        };
        let fetcher = WeatherFetcher::new(config, berlin());
        assert_eq!(
            fetcher.request_url(1_300_000_000).unwrap(),
            "https://api.darksky.net/forecast/secret/52.52,13.405,1300000000"
        );
    }
}
