//! destcheck: checks that a travel destination city exists in the chosen
//! country, using OpenStreetMap Nominatim and an in-memory LRU of verdicts.

pub mod config;
pub mod itinerary;
pub mod location;
pub mod server;
