use serde::{Deserialize, Serialize};

use super::build_url;
use crate::{transport::Transport, FetchError, RequestExecutor, Result};

const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1";

/// Cities the dashboard can resolve without a geocoding round trip,
/// as `(name, latitude, longitude)`.
pub const KNOWN_CITIES: &[(&str, f64, f64)] = &[
    ("delhi", 28.6139, 77.2090),
    ("mumbai", 19.0760, 72.8777),
    ("bangalore", 12.9716, 77.5946),
    ("chennai", 13.0827, 80.2707),
    ("kolkata", 22.5726, 88.3639),
    ("hyderabad", 17.3850, 78.4867),
    ("pune", 18.5204, 73.8567),
    ("nagpur", 21.1458, 79.0882),
    ("jaipur", 26.9124, 75.7873),
    ("ahmedabad", 23.0225, 72.5714),
    ("dubai", 25.2048, 55.2708),
    ("paris", 48.8566, 2.3522),
    ("new york", 40.7128, -74.0060),
    ("london", 51.5074, -0.1278),
    ("tokyo", 35.6762, 139.6503),
    ("sydney", -33.8688, 151.2093),
];

/// Looks up a builtin city, case-insensitively.
pub fn known_city(name: &str) -> Option<Place> {
    let name = name.trim().to_lowercase();
    KNOWN_CITIES
        .iter()
        .find(|(city, _, _)| *city == name)
        .map(|&(city, latitude, longitude)| Place {
            name: city.to_owned(),
            latitude,
            longitude,
            country: None,
        })
}

/// Human-readable text for a WMO weather code.
pub fn weather_code_description(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        95 => "Thunderstorm",
        _ => "Unknown",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub windspeed: f64,
    #[serde(default)]
    pub winddirection: Option<f64>,
    #[serde(default)]
    pub weathercode: Option<u16>,
}

impl CurrentWeather {
    /// Condition text; "Unknown" when the response carried no code.
    pub fn condition(&self) -> &'static str {
        self.weathercode.map_or("Unknown", weather_code_description)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

/// Place and its current conditions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CityWeather {
    pub place: Place,
    pub current: CurrentWeather,
}

/// Client for the Open-Meteo geocoding and forecast APIs.
#[derive(Debug)]
pub struct OpenMeteo<'a, T> {
    executor: &'a RequestExecutor<T>,
    geocoding_url: String,
    forecast_url: String,
}

impl<'a, T: Transport> OpenMeteo<'a, T> {
    pub fn new(executor: &'a RequestExecutor<T>) -> Self {
        Self {
            executor,
            geocoding_url: DEFAULT_GEOCODING_URL.to_owned(),
            forecast_url: DEFAULT_FORECAST_URL.to_owned(),
        }
    }

    /// Points both APIs at one base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.geocoding_url = base_url.clone();
        self.forecast_url = base_url;
        self
    }

    /// Searches places by name. No match is an empty list, not an error.
    pub async fn geocode(&self, name: &str, count: usize) -> Result<Vec<Place>> {
        let url = build_url(
            &self.geocoding_url,
            "search",
            &[("name", name.trim().to_owned()), ("count", count.to_string())],
        )?;
        let response: GeocodingResponse = self.executor.get_json(&url).await?;
        Ok(response.results)
    }

    pub async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<CurrentWeather> {
        let url = build_url(
            &self.forecast_url,
            "forecast",
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_owned()),
                ("timezone", "auto".to_owned()),
            ],
        )?;
        let response: ForecastResponse = self.executor.get_json(&url).await?;
        Ok(response.current_weather)
    }

    /// Resolves `city` from the builtin table or, failing that, the
    /// geocoding API, then fetches its current weather.
    pub async fn weather_for_city(&self, city: &str) -> Result<CityWeather> {
        if city.trim().is_empty() {
            return Err(FetchError::Validation("city name is empty".to_owned()));
        }
        let place = match known_city(city) {
            Some(place) => place,
            None => self
                .geocode(city, 1)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    FetchError::Validation(format!("city '{}' not found", city.trim()))
                })?,
        };
        let current = self.current_weather(place.latitude, place.longitude).await?;
        Ok(CityWeather { place, current })
    }
}
