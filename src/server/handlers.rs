use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::itinerary::{self, Destination};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

/// Run blocking validator work off the async executor.
async fn blocking<T, F>(state: &Arc<AppState>, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> T + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Validation task failed: {}", e)))
}

// ─── GET /api/validate ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct ValidateQuery {
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub city: String,
    pub country: String,
    pub valid: bool,
    pub ambiguous: bool,
}

pub async fn validate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ValidateQuery>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let start = Instant::now();

    let city = params.city.as_deref().unwrap_or("").trim().to_string();
    let country = params.country.as_deref().unwrap_or("").trim().to_string();
    if city.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'city' parameter"));
    }
    if country.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'country' parameter"));
    }
    if !state.countries.contains(&country) {
        return Err(api_error(StatusCode::BAD_REQUEST, format!("Unknown country '{}'", country)));
    }

    let (c, k) = (city.clone(), country.clone());
    let verdict = blocking(&state, move |s| s.lock_validator().validate(&c, &k))
        .await?
        .map_err(|e| {
            tracing::warn!(%city, %country, error = %e, "geocoding failed");
            api_error(StatusCode::BAD_GATEWAY, format!("Could not verify location: {}", e))
        })?;

    tracing::info!(
        %city, %country, %verdict,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/validate"
    );

    Ok(Json(ValidateResponse {
        city,
        country,
        valid: verdict.valid,
        ambiguous: verdict.ambiguous,
    }))
}

// ─── POST /api/itinerary ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct ItineraryRequest {
    #[serde(default)]
    pub destinations: Vec<Destination>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IssueBody {
    pub index: Option<usize>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItineraryResponse {
    pub ok: bool,
    pub issues: Vec<IssueBody>,
}

pub async fn check_itinerary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ItineraryRequest>,
) -> Result<Json<ItineraryResponse>, ApiError> {
    let start = Instant::now();
    let count = req.destinations.len();

    let issues = blocking(&state, move |s| {
        let mut validator = s.lock_validator();
        itinerary::check_destinations(&mut *validator, &s.countries, &req.destinations)
    })
    .await?;

    tracing::info!(
        destinations = count,
        issues = issues.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "POST /api/itinerary"
    );

    Ok(Json(ItineraryResponse {
        ok: issues.is_empty(),
        issues: issues
            .iter()
            .map(|i| IssueBody {
                index: i.index(),
                message: i.to_string(),
            })
            .collect(),
    }))
}

// ─── GET /api/countries ──────────────────────────────────────────

pub async fn country_list(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.countries.names().to_vec())
}
