use crate::location::{CountryList, Geocoder, Validator};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub type SharedValidator = Validator<Box<dyn Geocoder>>;

pub struct AppState {
    /// Held for the whole lookup, so concurrent misses on one key
    /// collapse into a single outbound request.
    pub validator: Mutex<SharedValidator>,
    pub countries: CountryList,
}

impl AppState {
    pub fn new(validator: SharedValidator, countries: CountryList) -> Self {
        Self {
            validator: Mutex::new(validator),
            countries,
        }
    }

    pub fn lock_validator(&self) -> MutexGuard<'_, SharedValidator> {
        // Cache state stays consistent across a panic, so keep serving.
        self.validator.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
