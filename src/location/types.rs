//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A city/country pair as supplied by the caller.
///
/// Equality and hashing are exact (case-sensitive); only the country
/// comparison inside disambiguation folds case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationQuery {
    pub city: String,
    pub country: String,
}

impl LocationQuery {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }

    /// Free-text search string sent to the geocoder: "<city>, <country>".
    pub fn search_text(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

/// Address breakdown attached to a search result (`addressdetails=1`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateAddress {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub county: String,
}

/// One raw search result row from the geocoding service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub address: CandidateAddress,
}

impl Candidate {
    pub fn new(country: &str, state: &str, county: &str) -> Self {
        Self {
            display_name: String::new(),
            address: CandidateAddress {
                country: country.to_string(),
                state: state.to_string(),
                county: county.to_string(),
            },
        }
    }

    /// Administrative subdivision used as the disambiguation key:
    /// state if present, otherwise county. `None` when neither is set.
    pub fn province(&self) -> Option<&str> {
        [self.address.state.as_str(), self.address.county.as_str()]
            .into_iter()
            .find(|p| !p.is_empty())
    }
}

/// The answer for a city/country pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
    pub ambiguous: bool,
}

impl Verdict {
    /// No match inside the requested country.
    pub const fn not_found() -> Self {
        Self { valid: false, ambiguous: false }
    }

    /// At least one match inside the requested country.
    pub const fn found(ambiguous: bool) -> Self {
        Self { valid: true, ambiguous }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.valid, self.ambiguous) {
            (false, _) => write!(f, "not found"),
            (true, false) => write!(f, "valid"),
            (true, true) => write!(f, "ambiguous"),
        }
    }
}

/// Geocoding failures. Neither kind is retried or cached.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// Network unreachable or the request exceeded its timeout.
    #[error("Network error: {0}")]
    Transport(String),
    /// Non-success HTTP status (`status` set) or an unreadable payload.
    #[error("{}", service_message(.status, .message))]
    Service { status: Option<u16>, message: String },
}

fn service_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Geocoding service returned HTTP {}: {}", code, message),
        None => format!("Invalid geocoding response: {}", message),
    }
}

impl GeocodeError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => *status,
            Self::Transport(_) => None,
        }
    }
}
