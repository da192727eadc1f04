use serde::Serialize;

/// A city name resolved to WGS84 coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCoordinates {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityCoordinates {
    pub fn new(city: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            city: city.into(),
            latitude,
            longitude,
        }
    }

    /// Format as the `lat,lon` pair expected by the places search `ll` parameter
    pub fn ll(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Geocoded cities, in the order they were requested
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CoordinateTable {
    rows: Vec<CityCoordinates>,
}

impl CoordinateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: CityCoordinates) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[CityCoordinates] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CityCoordinates> {
        self.rows.iter()
    }
}

impl FromIterator<CityCoordinates> for CoordinateTable {
    fn from_iter<I: IntoIterator<Item = CityCoordinates>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CoordinateTable {
    type Item = &'a CityCoordinates;
    type IntoIter = std::slice::Iter<'a, CityCoordinates>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
