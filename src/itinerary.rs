//! Trip-level destination checks.
//!
//! A trip may proceed only when every destination names a city, a known
//! country, and resolves to a single unambiguous match.

use crate::location::{CountryList, Geocoder, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One leg of a trip as entered by the traveller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl Destination {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }
}

/// Why a destination blocks the trip. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationIssue {
    NoDestinations,
    MissingCity { index: usize },
    MissingCountry { index: usize },
    UnknownCountry { index: usize, country: String },
    NotFound { index: usize, city: String, country: String },
    Ambiguous { index: usize, city: String },
    Unverified { index: usize, city: String, reason: String },
}

impl DestinationIssue {
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::NoDestinations => None,
            Self::MissingCity { index }
            | Self::MissingCountry { index }
            | Self::UnknownCountry { index, .. }
            | Self::NotFound { index, .. }
            | Self::Ambiguous { index, .. }
            | Self::Unverified { index, .. } => Some(*index),
        }
    }
}

impl fmt::Display for DestinationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDestinations => write!(f, "At least one destination is required."),
            Self::MissingCity { index } => write!(f, "City is required for destination #{}.", index),
            Self::MissingCountry { index } => {
                write!(f, "Please select a country for destination #{}.", index)
            }
            Self::UnknownCountry { index, country } => {
                write!(f, "Unknown country '{}' for destination #{}.", country, index)
            }
            Self::NotFound { city, country, .. } => {
                write!(f, "City '{}' not found in {}.", city, country)
            }
            Self::Ambiguous { city, .. } => {
                write!(f, "City '{}' is ambiguous; please specify province/state.", city)
            }
            Self::Unverified { city, reason, .. } => {
                write!(f, "Could not verify location '{}': {}", city, reason)
            }
        }
    }
}

/// Check every destination; an empty result means the trip may proceed.
///
/// Geocoding failures become `Unverified` issues rather than aborting,
/// so the remaining destinations are still checked.
pub fn check_destinations<G: Geocoder>(
    validator: &mut Validator<G>,
    countries: &CountryList,
    destinations: &[Destination],
) -> Vec<DestinationIssue> {
    if destinations.is_empty() {
        return vec![DestinationIssue::NoDestinations];
    }

    destinations
        .iter()
        .enumerate()
        .filter_map(|(i, dest)| check_one(validator, countries, i + 1, dest))
        .collect()
}

fn check_one<G: Geocoder>(
    validator: &mut Validator<G>,
    countries: &CountryList,
    index: usize,
    dest: &Destination,
) -> Option<DestinationIssue> {
    let city = dest.city.trim();
    let country = dest.country.trim();

    if city.is_empty() {
        return Some(DestinationIssue::MissingCity { index });
    }
    if country.is_empty() {
        return Some(DestinationIssue::MissingCountry { index });
    }
    if !countries.contains(country) {
        return Some(DestinationIssue::UnknownCountry {
            index,
            country: country.to_string(),
        });
    }

    match validator.validate(city, country) {
        Ok(v) if !v.valid => Some(DestinationIssue::NotFound {
            index,
            city: city.to_string(),
            country: country.to_string(),
        }),
        Ok(v) if v.ambiguous => Some(DestinationIssue::Ambiguous {
            index,
            city: city.to_string(),
        }),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(index, city, country, error = %e, "destination could not be verified");
            Some(DestinationIssue::Unverified {
                index,
                city: city.to_string(),
                reason: e.to_string(),
            })
        }
    }
}
