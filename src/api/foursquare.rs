use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::PlacesConfig;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Places request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Places API returned a non-JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A places search endpoint queried once per (location, category)
pub trait PlaceSearch {
    /// Search for places of `category` within `radius` meters of the point.
    ///
    /// The body is returned untouched, whatever the HTTP status.
    fn make_request(
        &self,
        latitude: f64,
        longitude: f64,
        category: &str,
        radius: u32,
    ) -> Result<Value, PlacesError>;
}

/// Blocking client for the Foursquare v3 place search
pub struct FoursquareClient {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl FoursquareClient {
    /// Build a client authenticating with `token`.
    ///
    /// No request timeout is set unless `config.timeout_secs` is present.
    pub fn new(token: String, config: &PlacesConfig) -> Result<Self, PlacesError> {
        let mut builder = reqwest::blocking::Client::builder();
        builder = match config.timeout_secs {
            Some(secs) => builder.timeout(Duration::from_secs(secs)),
            None => builder.timeout(None),
        };

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            token,
        })
    }
}

/// Query parameters for a single category search, sorted nearest first
pub fn search_params(latitude: f64, longitude: f64, category: &str, radius: u32) -> Vec<(&'static str, String)> {
    vec![
        ("categories", category.to_string()),
        ("ll", format!("{},{}", latitude, longitude)),
        ("sort", "DISTANCE".to_string()),
        ("radius", radius.to_string()),
    ]
}

impl FoursquareClient {
    /// Build the GET for one category search without sending it
    pub fn build_request(
        &self,
        latitude: f64,
        longitude: f64,
        category: &str,
        radius: u32,
    ) -> reqwest::Result<reqwest::blocking::Request> {
        self.client
            .get(&self.base_url)
            .query(&search_params(latitude, longitude, category, radius))
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.token.as_str())
            .build()
    }
}

impl PlaceSearch for FoursquareClient {
    fn make_request(
        &self,
        latitude: f64,
        longitude: f64,
        category: &str,
        radius: u32,
    ) -> Result<Value, PlacesError> {
        let request = self.build_request(latitude, longitude, category, radius)?;
        let response = self.client.execute(request)?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("Places API returned status {} for category {}", status, category);
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params() {
        let params = search_params(48.8566, 2.3522, "food", 500);

        assert_eq!(
            params,
            vec![
                ("categories", "food".to_string()),
                ("ll", "48.8566,2.3522".to_string()),
                ("sort", "DISTANCE".to_string()),
                ("radius", "500".to_string()),
            ]
        );
    }

    #[test]
    fn test_negative_coordinates_in_ll() {
        let params = search_params(-33.8688, 151.2093, "16032", 1000);
        assert_eq!(params[1], ("ll", "-33.8688,151.2093".to_string()));
    }

    #[test]
    fn test_request_wire_format() {
        let client = FoursquareClient::new("fsq-token".to_string(), &PlacesConfig::default()).unwrap();
        let request = client.build_request(48.8566, 2.3522, "food", 500).unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(request.url().scheme(), "https");
        assert_eq!(request.url().host_str(), Some("api.foursquare.com"));
        assert_eq!(request.url().path(), "/v3/places/search");
        assert_eq!(
            request.url().query(),
            Some("categories=food&ll=48.8566%2C2.3522&sort=DISTANCE&radius=500")
        );

        let headers = request.headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "fsq-token");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_request_uses_configured_base_url() {
        let config = PlacesConfig {
            base_url: "http://localhost:8080/search".to_string(),
            ..PlacesConfig::default()
        };
        let client = FoursquareClient::new("other-token".to_string(), &config).unwrap();
        let request = client.build_request(-33.8688, 151.2093, "16032", 1000).unwrap();

        assert_eq!(request.url().host_str(), Some("localhost"));
        assert_eq!(request.url().port(), Some(8080));
        assert_eq!(request.url().path(), "/search");
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "other-token");
    }

    #[test]
    fn test_client_builds_without_timeout() {
        let config = PlacesConfig::default();
        assert!(config.timeout_secs.is_none());
        assert!(FoursquareClient::new("fsq-token".to_string(), &config).is_ok());
    }
}
