//! Location validation subsystem for destcheck.
//!
//! Confirms that a free-text city exists inside a chosen country using
//! Nominatim text search, flags matches that span several provinces,
//! and memoizes verdicts in a bounded LRU cache.

pub mod cache;
pub mod countries;
pub mod disambiguate;
pub mod providers;
pub mod resolver;
pub mod types;

pub use cache::VerdictCache;
pub use countries::{CountryList, CountryListError};
pub use providers::{Geocoder, GeocoderConfig, NominatimClient};
pub use resolver::Validator;
pub use types::{Candidate, GeocodeError, LocationQuery, Verdict};
