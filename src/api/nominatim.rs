use serde::Deserialize;
use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::GeocoderConfig;
use crate::domain::CityCoordinates;

/// Nominatim asks for at most one request per second
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("City not found: {0}")]
    NotFound(String),
    #[error("Nominatim request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Nominatim API returned error status: {0}")]
    Status(reqwest::StatusCode),
    #[error("Invalid coordinate '{value}' for {city}")]
    InvalidCoordinate { city: String, value: String },
}

/// Resolves a free-text place name to coordinates
pub trait Geocoder {
    fn geocode(&self, city: &str) -> Result<CityCoordinates, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Blocking client for the Nominatim search endpoint
pub struct NominatimClient {
    client: reqwest::blocking::Client,
    base_url: String,
    last_request: Cell<Option<Instant>>,
}

impl NominatimClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            last_request: Cell::new(None),
        })
    }

    fn wait_for_rate_limit(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                thread::sleep(MIN_REQUEST_INTERVAL - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

impl Geocoder for NominatimClient {
    /// Geocode a city name to latitude/longitude.
    ///
    /// The name is sent as-is as a free-text query and the first match wins.
    fn geocode(&self, city: &str) -> Result<CityCoordinates, GeocodeError> {
        self.wait_for_rate_limit();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", city), ("format", "json"), ("limit", "1")])
            .send()?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let results: Vec<NominatimResult> = response.json()?;
        first_match(city, results)
    }
}

fn first_match(city: &str, results: Vec<NominatimResult>) -> Result<CityCoordinates, GeocodeError> {
    let result = results
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound(city.to_string()))?;

    log::debug!("Geocoded {} as {}", city, result.display_name);

    let parse = |value: &str| {
        value
            .parse::<f64>()
            .map_err(|_| GeocodeError::InvalidCoordinate {
                city: city.to_string(),
                value: value.to_string(),
            })
    };

    Ok(CityCoordinates::new(city, parse(&result.lat)?, parse(&result.lon)?))
}
