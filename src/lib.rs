//! placescout - Collect nearby points of interest for a list of cities

pub mod api;
pub mod config;
pub mod domain;
pub mod flatten;
pub mod output;
pub mod pipeline;
