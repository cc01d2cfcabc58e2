use std::fmt;

use serde::{Deserialize, Serialize};

use super::build_url;
use crate::{transport::Transport, FetchError, RequestExecutor, Result};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    #[serde(default)]
    pub pressure: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub main: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SysInfo {
    #[serde(default)]
    pub country: Option<String>,
}

/// Current conditions as reported by `/weather`, in metric units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpenWeatherReport {
    #[serde(default)]
    pub name: String,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: Option<Wind>,
    #[serde(default)]
    pub sys: SysInfo,
}

impl OpenWeatherReport {
    /// First condition's description, or "Unknown" when none was sent.
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map_or("Unknown", |condition| condition.description.as_str())
    }
}

/// Client for the OpenWeatherMap current weather API.
///
/// The API key is passed at construction; nothing is read from the
/// environment.
pub struct OpenWeather<'a, T> {
    executor: &'a RequestExecutor<T>,
    api_key: String,
    base_url: String,
}

impl<T> fmt::Debug for OpenWeather<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeather")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl<'a, T: Transport> OpenWeather<'a, T> {
    pub fn new(executor: &'a RequestExecutor<T>, api_key: impl Into<String>) -> Self {
        Self {
            executor,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches current weather for `city` in metric units.
    pub async fn weather(&self, city: &str) -> Result<OpenWeatherReport> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err(FetchError::Validation(
                "OpenWeatherMap API key is empty".to_owned(),
            ));
        }
        let city = city.trim();
        if city.is_empty() {
            return Err(FetchError::Validation("city name is empty".to_owned()));
        }
        let url = build_url(
            &self.base_url,
            "weather",
            &[
                ("q", city.to_owned()),
                ("appid", api_key.to_owned()),
                ("units", "metric".to_owned()),
            ],
        )?;
        self.executor.get_json(&url).await
    }
}
