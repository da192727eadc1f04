pub mod city;
pub mod place;

pub use city::{CityCoordinates, CoordinateTable};
pub use place::{COLUMNS, FLATTENED_COLUMNS, PlaceRecord, PlaceTable};
