pub mod fanout;
pub mod geocode;
pub mod throttle;

pub use fanout::{FanOut, RunReport, SearchOutcome, generate_nearby_places, get_nearby_places};
pub use geocode::{GeocodeOutcome, UnresolvedPolicy, geocode_cities};
pub use throttle::{Sleeper, ThreadSleeper, Throttle};
