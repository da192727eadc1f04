use indicatif::ProgressBar;

use crate::api::{PlaceSearch, PlacesError};
use crate::domain::{CityCoordinates, CoordinateTable, PlaceTable};
use crate::flatten::{FlattenError, flatten_results};

use super::throttle::{Sleeper, Throttle};

/// Result of one (city, category) search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub city: String,
    pub category: String,
    pub rows: usize,
    /// Set when the response was dropped as malformed
    pub error: Option<FlattenError>,
}

impl SearchOutcome {
    pub fn is_malformed(&self) -> bool {
        self.error.is_some()
    }
}

/// Per-search bookkeeping for a run, in request order
#[derive(Debug, Default)]
pub struct RunReport {
    pub searches: Vec<SearchOutcome>,
}

impl RunReport {
    pub fn total_rows(&self) -> usize {
        self.searches.iter().map(|s| s.rows).sum()
    }

    pub fn malformed(&self) -> impl Iterator<Item = &SearchOutcome> {
        self.searches.iter().filter(|s| s.is_malformed())
    }
}

#[derive(Debug, Default)]
pub struct FanOut {
    pub places: PlaceTable,
    pub report: RunReport,
}

/// Search every category around one city and tag the merged rows with it.
///
/// A malformed response contributes no rows and is recorded in `report`;
/// transport failures abort.
pub fn get_nearby_places<S: PlaceSearch + ?Sized>(
    search: &S,
    city: &CityCoordinates,
    categories: &[String],
    radius: u32,
    report: &mut RunReport,
) -> Result<PlaceTable, PlacesError> {
    let mut nearby = PlaceTable::new();

    for category in categories {
        let response = search.make_request(city.latitude, city.longitude, category, radius)?;

        let (table, error) = match flatten_results(&response, category) {
            Ok(table) => (table, None),
            Err(err) => {
                log::warn!(
                    "Dropping places response for '{}' near {}: {}",
                    category,
                    city.city,
                    err
                );
                (PlaceTable::new(), Some(err))
            }
        };

        log::debug!("{} results for '{}' near {}", table.len(), category, city.city);
        report.searches.push(SearchOutcome {
            city: city.city.clone(),
            category: category.clone(),
            rows: table.len(),
            error,
        });
        nearby = nearby.concat(table);
    }

    Ok(nearby.with_city(&city.city))
}

/// Collect nearby places for every geocoded city.
///
/// Cities run in table order, categories in list order, one blocking
/// request at a time. The throttle pauses before each city.
pub fn generate_nearby_places<S, Z>(
    search: &S,
    throttle: &Throttle<Z>,
    coordinates: &CoordinateTable,
    categories: &[String],
    radius: u32,
    progress: &ProgressBar,
) -> Result<FanOut, PlacesError>
where
    S: PlaceSearch + ?Sized,
    Z: Sleeper,
{
    let mut places = PlaceTable::new();
    let mut report = RunReport::default();

    for city in coordinates {
        progress.set_message(format!("Searching near {}", city.city));
        throttle.pause();

        let city_places = get_nearby_places(search, city, categories, radius, &mut report)?;
        log::info!("Found {} places near {}", city_places.len(), city.city);

        places = places.concat(city_places);
        progress.inc(1);
    }

    Ok(FanOut { places, report })
}
