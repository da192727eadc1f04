//! Flattening of places search responses into [`PlaceTable`](crate::domain::PlaceTable) rows

pub mod results;

pub use results::{FlattenError, flatten_results};
