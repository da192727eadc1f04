use serde::Deserialize;

use crate::api::{GeocodeError, Geocoder};
use crate::domain::CoordinateTable;

/// What to do with a city the geocoder cannot resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Stop the run on the first unresolved city
    Abort,
    /// Leave the city out and keep going
    Skip,
}

#[derive(Debug, Default)]
pub struct GeocodeOutcome {
    pub coordinates: CoordinateTable,
    /// Cities left out under [`UnresolvedPolicy::Skip`], in input order
    pub unresolved: Vec<String>,
}

/// Geocode every city, preserving input order.
///
/// Transport and HTTP status failures always abort. Cities with no usable
/// match abort or are skipped according to `policy`.
pub fn geocode_cities<G: Geocoder + ?Sized>(
    geocoder: &G,
    cities: &[String],
    policy: UnresolvedPolicy,
) -> Result<GeocodeOutcome, GeocodeError> {
    let mut outcome = GeocodeOutcome::default();

    for city in cities {
        match geocoder.geocode(city) {
            Ok(coords) => {
                log::info!(
                    "Geocoded {} -> ({:.4}, {:.4})",
                    city,
                    coords.latitude,
                    coords.longitude
                );
                outcome.coordinates.push(coords);
            }
            Err(err @ (GeocodeError::NotFound(_) | GeocodeError::InvalidCoordinate { .. })) => {
                match policy {
                    UnresolvedPolicy::Abort => return Err(err),
                    UnresolvedPolicy::Skip => {
                        log::warn!("Skipping {}: {}", city, err);
                        outcome.unresolved.push(city.clone());
                    }
                }
            }
            Err(err) => return Err(err),
        }
    }

    Ok(outcome)
}
