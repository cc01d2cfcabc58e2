//! Typed clients for the public JSON APIs used by the dashboard.
//!
//! Every client borrows a [`RequestExecutor`](crate::RequestExecutor), so
//! retries, timeouts and error classification apply uniformly.

mod crypto;
mod openweather;
mod placeholder;
mod weather;

pub use crypto::{coin_id, CoinPaprika, Quotes, Ticker, UsdQuote, COIN_ALIASES};
pub use openweather::{
    Condition, MainReadings, OpenWeather, OpenWeatherReport, SysInfo, Wind,
};
pub use placeholder::{Address, Comment, Placeholder, Post, Todo, User};
pub use weather::{
    known_city, weather_code_description, CityWeather, CurrentWeather, OpenMeteo, Place,
    KNOWN_CITIES,
};

use reqwest::Url;

use crate::FetchError;

/// Joins `base` and `path`, appending `params` as an encoded query string.
pub(crate) fn build_url(
    base: &str,
    path: &str,
    params: &[(&str, String)],
) -> Result<String, FetchError> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse_with_params(&joined, params)
        .map(String::from)
        .map_err(|err| FetchError::Transport(format!("invalid url '{joined}': {err}")))
}
