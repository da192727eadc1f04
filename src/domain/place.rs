use serde::Serialize;

/// Columns produced by flattening a single places response
pub const FLATTENED_COLUMNS: [&str; 7] = [
    "place_name",
    "distance",
    "main_latitude",
    "main_longitude",
    "address",
    "searched_category",
    "category_name",
];

/// Full column set of a places table, `city` is stamped after flattening
pub const COLUMNS: [&str; 8] = [
    "place_name",
    "distance",
    "main_latitude",
    "main_longitude",
    "address",
    "searched_category",
    "category_name",
    "city",
];

/// One point of interest returned by a places search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceRecord {
    pub place_name: String,
    /// Distance from the search center in meters
    pub distance: f64,
    /// `None` when the entry carries no usable `geocodes.main` point
    pub main_latitude: Option<f64>,
    pub main_longitude: Option<f64>,
    pub address: String,
    pub searched_category: String,
    /// Carries the place name, the category searched is in `searched_category`
    pub category_name: String,
    pub city: Option<String>,
}

impl PlaceRecord {
    pub fn has_coordinates(&self) -> bool {
        self.main_latitude.is_some() && self.main_longitude.is_some()
    }
}

/// Rows of flattened places sharing the [`COLUMNS`] schema
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlaceTable {
    rows: Vec<PlaceRecord>,
}

impl PlaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<PlaceRecord>) -> Self {
        Self { rows }
    }

    /// The column set is fixed, so an empty table still reports every column
    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn rows(&self) -> &[PlaceRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<PlaceRecord> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlaceRecord> {
        self.rows.iter()
    }

    /// Append `other` below this table's rows
    pub fn concat(mut self, other: PlaceTable) -> Self {
        self.rows.extend(other.rows);
        self
    }

    /// Tag every row with the city the search was centered on
    pub fn with_city(mut self, city: &str) -> Self {
        for row in &mut self.rows {
            row.city = Some(city.to_string());
        }
        self
    }
}

impl<'a> IntoIterator for &'a PlaceTable {
    type Item = &'a PlaceRecord;
    type IntoIter = std::slice::Iter<'a, PlaceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
