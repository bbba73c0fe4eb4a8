//! Destination validator: orchestrates the lookup pipeline.
//!
//! Flow:  Cache → Geocoder → disambiguation → cache store → verdict
//!
//! Every validation blocks until the cache answers or the single
//! outbound search completes (or times out).

use super::cache::VerdictCache;
use super::disambiguate;
use super::providers::{Geocoder, GeocoderConfig, NominatimClient};
use super::types::{GeocodeError, Verdict};

/// Validates city/country pairs against a geocoder, memoizing verdicts.
pub struct Validator<G = NominatimClient> {
    geocoder: G,
    cache: VerdictCache,
}

impl Validator<NominatimClient> {
    /// Nominatim-backed validator with the given settings and cache.
    pub fn nominatim(config: GeocoderConfig, cache: VerdictCache) -> Self {
        Self::new(NominatimClient::new(config), cache)
    }
}

impl<G: Geocoder> Validator<G> {
    pub fn new(geocoder: G, cache: VerdictCache) -> Self {
        Self { geocoder, cache }
    }

    /// Does `city` plausibly exist in `country`, and is it ambiguous there?
    ///
    /// Performs at most one network request; a cache hit performs none.
    pub fn validate(&mut self, city: &str, country: &str) -> Result<Verdict, GeocodeError> {
        let geocoder = &self.geocoder;
        self.cache.get_or_compute(city, country, || {
            let candidates = geocoder.search(city, country)?;
            let verdict = disambiguate::resolve(&candidates, country);
            tracing::debug!(city, country, rows = candidates.len(), %verdict, "resolved");
            Ok(verdict)
        })
    }

    pub fn cache(&self) -> &VerdictCache {
        &self.cache
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }
}
