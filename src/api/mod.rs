pub mod foursquare;
pub mod nominatim;

pub use foursquare::{FoursquareClient, PlaceSearch, PlacesError};
pub use nominatim::{GeocodeError, Geocoder, NominatimClient};
