use serde_json::Value;
use thiserror::Error;

use crate::domain::{PlaceRecord, PlaceTable};

/// Why a whole response was rejected
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlattenError {
    #[error(
        "response has no results list{}",
        .message.as_ref().map(|m| format!(" ({m})")).unwrap_or_default()
    )]
    MissingResults { message: Option<String> },
    #[error("result #{index} has no usable {field}")]
    MalformedEntry { index: usize, field: &'static str },
}

/// Flatten a places search response into one row per entry of its `results` list
///
/// # Errors
/// The whole response is rejected when the top-level `results` list is absent
/// or when an entry lacks its name, distance or formatted address. A `null` or
/// non-numeric distance counts as missing. A missing or malformed
/// `geocodes.main` point only blanks that entry's coordinates.
///
/// Rows come back without a city; the caller stamps it once every category
/// for a city has been merged.
pub fn flatten_results(response: &Value, category: &str) -> Result<PlaceTable, FlattenError> {
    let results = response
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| FlattenError::MissingResults {
            message: response
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        })?;

    let rows = results
        .iter()
        .enumerate()
        .map(|(index, entry)| flatten_entry(index, entry, category))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PlaceTable::from_rows(rows))
}

fn flatten_entry(index: usize, entry: &Value, category: &str) -> Result<PlaceRecord, FlattenError> {
    let malformed = |field| FlattenError::MalformedEntry { index, field };

    let place_name = entry
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("name"))?;
    let distance = entry
        .get("distance")
        .and_then(Value::as_f64)
        .ok_or_else(|| malformed("distance"))?;
    let address = entry
        .pointer("/location/formatted_address")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("location.formatted_address"))?;

    let (main_latitude, main_longitude) = main_geocode(entry).unzip();

    Ok(PlaceRecord {
        place_name: place_name.to_string(),
        distance,
        main_latitude,
        main_longitude,
        address: address.to_string(),
        searched_category: category.to_string(),
        category_name: place_name.to_string(),
        city: None,
    })
}

/// Both halves of `geocodes.main` or nothing
fn main_geocode(entry: &Value) -> Option<(f64, f64)> {
    let main = entry.pointer("/geocodes/main")?;
    let lat = main.get("latitude")?.as_f64()?;
    let lon = main.get("longitude")?.as_f64()?;
    Some((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FLATTENED_COLUMNS;
    use serde_json::json;

    fn sample_response() -> Value {
        serde_json::from_str(
            r#"{
                "results": [
                    {
                        "fsq_id": "4adcda10f964a520af3521e3",
                        "name": "Le Comptoir du Relais",
                        "distance": 212,
                        "categories": [{"id": 13065, "name": "Restaurant"}],
                        "geocodes": {"main": {"latitude": 48.8521, "longitude": 2.3389}},
                        "location": {"formatted_address": "9 Carrefour de l'Odéon, 75006 Paris"}
                    },
                    {
                        "fsq_id": "4b0587f3f964a5200a9022e3",
                        "name": "Café de Flore",
                        "distance": 405.5,
                        "categories": [],
                        "geocodes": {"roof": {"latitude": 48.854, "longitude": 2.3326}},
                        "location": {"formatted_address": "172 Boulevard Saint-Germain, 75006 Paris"}
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_flatten_results() {
        let table = flatten_results(&sample_response(), "13065").unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.rows()[0];
        assert_eq!(first.place_name, "Le Comptoir du Relais");
        assert_eq!(first.distance, 212.0);
        assert_eq!(first.main_latitude, Some(48.8521));
        assert_eq!(first.main_longitude, Some(2.3389));
        assert_eq!(first.address, "9 Carrefour de l'Odéon, 75006 Paris");
        assert_eq!(first.searched_category, "13065");
        assert_eq!(first.category_name, "Le Comptoir du Relais");
        assert_eq!(first.city, None);
    }

    #[test]
    fn test_missing_main_geocode_blanks_coordinates_only() {
        let table = flatten_results(&sample_response(), "13065").unwrap();
        let second = &table.rows()[1];

        assert_eq!(second.main_latitude, None);
        assert_eq!(second.main_longitude, None);
        assert_eq!(second.place_name, "Café de Flore");
        assert_eq!(second.distance, 405.5);
        assert_eq!(second.address, "172 Boulevard Saint-Germain, 75006 Paris");
        assert_eq!(second.searched_category, "13065");
        assert_eq!(second.category_name, "Café de Flore");
    }

    #[test]
    fn test_category_name_ignores_category_labels() {
        let response = json!({
            "results": [{
                "name": "Le Comptoir",
                "distance": 80,
                "categories": [{"id": 13065, "name": "Restaurant"}],
                "location": {"formatted_address": "9 Carrefour de l'Odéon"}
            }]
        });
        let table = flatten_results(&response, "13065").unwrap();

        assert_eq!(table.rows()[0].category_name, "Le Comptoir");
        assert_eq!(table.rows()[0].searched_category, "13065");
    }

    #[test]
    fn test_null_distance_drops_response() {
        let response = json!({
            "results": [
                {"name": "A", "distance": 10, "location": {"formatted_address": "x"}},
                {"name": "B", "distance": null, "location": {"formatted_address": "y"}}
            ]
        });

        assert_eq!(
            flatten_results(&response, "food"),
            Err(FlattenError::MalformedEntry {
                index: 1,
                field: "distance"
            })
        );

        let text = json!({
            "results": [{"name": "C", "distance": "far", "location": {"formatted_address": "z"}}]
        });
        assert_eq!(
            flatten_results(&text, "food"),
            Err(FlattenError::MalformedEntry {
                index: 0,
                field: "distance"
            })
        );
    }

    #[test]
    fn test_half_a_geocode_is_no_geocode() {
        let response = json!({
            "results": [{
                "name": "Kiosk",
                "distance": 3,
                "geocodes": {"main": {"latitude": 48.85}},
                "location": {"formatted_address": "Pont Neuf"}
            }]
        });
        let table = flatten_results(&response, "food").unwrap();

        assert!(!table.rows()[0].has_coordinates());
        assert_eq!(table.rows()[0].main_latitude, None);
    }

    #[test]
    fn test_empty_results_list() {
        let table = flatten_results(&json!({"results": []}), "food").unwrap();

        assert!(table.is_empty());
        assert_eq!(&table.columns()[..7], &FLATTENED_COLUMNS);
    }

    #[test]
    fn test_missing_results_key() {
        let response = json!({"message": "Invalid request token."});

        let err = flatten_results(&response, "food").unwrap_err();
        assert_eq!(
            err,
            FlattenError::MissingResults {
                message: Some("Invalid request token.".to_string())
            }
        );
        assert_eq!(
            err.to_string(),
            "response has no results list (Invalid request token.)"
        );
    }

    #[test]
    fn test_non_object_response() {
        let err = flatten_results(&json!([1, 2, 3]), "food").unwrap_err();
        assert_eq!(err, FlattenError::MissingResults { message: None });
        assert_eq!(err.to_string(), "response has no results list");
    }

    #[test]
    fn test_entry_without_address_drops_response() {
        let response = json!({
            "results": [
                {"name": "A", "distance": 1, "location": {"formatted_address": "x"}},
                {"name": "B", "distance": 2, "location": {}}
            ]
        });

        assert_eq!(
            flatten_results(&response, "food"),
            Err(FlattenError::MalformedEntry {
                index: 1,
                field: "location.formatted_address"
            })
        );
    }
}
