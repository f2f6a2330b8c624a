use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use thiserror::Error;

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const USER_AGENT: &str = "omw/0.1";

/// Failures surfaced by the geocode/forecast pipeline. There is no retry;
/// the caller simply tries again on the next query change.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("location not found")]
    NotFound,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// First geocoder candidate for a query.
#[derive(Deserialize, Debug, Clone)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub country_code: String,
}

/// One day of the daily forecast, in the provider's ascending-date order.
/// The first element of a fetched sequence is always today.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub code: i64,
    pub t_min: f64,
    pub t_max: f64,
}

#[derive(Deserialize, Debug, Default)]
struct SearchResponse {
    // Absent entirely when the geocoder has no match.
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Deserialize, Debug)]
struct ForecastResponse {
    daily: Daily,
}

/// Index-aligned daily arrays as returned by the forecast endpoint.
#[derive(Deserialize, Debug, Default)]
struct Daily {
    time: Vec<NaiveDate>,
    weathercode: Vec<i64>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

impl Daily {
    /// Zip the parallel arrays into per-day records, truncating to the
    /// shortest array if the provider ever misaligns them.
    fn into_days(self) -> Vec<ForecastDay> {
        self.time
            .into_iter()
            .zip(self.weathercode)
            .zip(self.temperature_2m_max.into_iter().zip(self.temperature_2m_min))
            .map(|((date, code), (t_max, t_min))| ForecastDay {
                date,
                code,
                t_min,
                t_max,
            })
            .collect()
    }
}

/// Resolve a free-text location to its first geocoder candidate.
pub fn geocode(query: &str) -> Result<Place, FetchError> {
    let response: SearchResponse = get_web_json(GEOCODING_URL, &[("name", query)])?
        .error_for_status()?
        .json()?;
    first_candidate(response)
}

/// Fetch the daily forecast (weather code, min/max temperature) for a
/// resolved place over the provider's default day range.
pub fn daily_forecast(place: &Place) -> Result<Vec<ForecastDay>, FetchError> {
    let latitude = place.latitude.to_string();
    let longitude = place.longitude.to_string();
    let response: ForecastResponse = get_web_json(
        FORECAST_URL,
        &[
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("timezone", place.timezone.as_str()),
            ("daily", "weathercode,temperature_2m_max,temperature_2m_min"),
        ],
    )?
    .error_for_status()?
    .json()?;
    Ok(response.daily.into_days())
}

fn first_candidate(response: SearchResponse) -> Result<Place, FetchError> {
    response
        .results
        .into_iter()
        .next()
        .ok_or(FetchError::NotFound)
}

fn get_web_json(url: &str, query: &[(&str, &str)]) -> Result<Response, reqwest::Error> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    client.get(url).query(query).send()
}
