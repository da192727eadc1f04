use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::pipeline::UnresolvedPolicy;

pub const DEFAULT_TOKEN_ENV: &str = "FOURSQUARE_TOKEN";

fn default_radius() -> u32 {
    500
}
fn default_max_delay_secs() -> u64 {
    3
}
fn default_on_unresolved() -> UnresolvedPolicy {
    UnresolvedPolicy::Abort
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub coordinates_output: Option<PathBuf>,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
    #[serde(default = "default_on_unresolved")]
    pub on_unresolved: UnresolvedPolicy,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub places: Option<PlacesConfig>,
    #[serde(default)]
    pub geocoder: Option<GeocoderConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            cities: Vec::new(),
            categories: Vec::new(),
            radius: default_radius(),
            output: None,
            coordinates_output: None,
            max_delay_secs: default_max_delay_secs(),
            on_unresolved: default_on_unresolved(),
            verbose: false,
            places: None,
            geocoder: None,
        }
    }
}

fn default_places_url() -> String {
    "https://api.foursquare.com/v3/places/search".to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlacesConfig {
    #[serde(default = "default_places_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Unset means requests may hang for as long as the upstream does
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: default_places_url(),
            token_env: default_token_env(),
            timeout_secs: None,
        }
    }
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_user_agent() -> String {
    concat!("placescout/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_geocoder_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoder_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout_secs(),
        }
    }
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        log::debug!("Loaded config from {}", path.display());
                        return Some(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("placescout.toml"));
    paths.push(PathBuf::from(".placescout.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("placescout").join("config.toml"));
        paths.push(config_dir.join("placescout.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".placescout.toml"));
    }

    paths
}

/// Read the places API token from the environment (after `.env` is loaded)
pub fn load_token(var: &str) -> Result<String> {
    let token = std::env::var(var)
        .with_context(|| format!("Environment variable {} is not set", var))?;
    if token.trim().is_empty() {
        anyhow::bail!("Environment variable {} is empty", var);
    }
    Ok(token)
}
