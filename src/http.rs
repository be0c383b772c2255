use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use uuid::Uuid;

use crate::backend::BookingBackend;
use crate::engine::AvailabilityEngine;
use crate::error::BookingError;
use crate::locale::locale_for_tag;
use crate::types::{BookingDraft, DateRange};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct AvailabilityParams {
    doctor_id: Uuid,
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AppointmentsParams {
    doctor_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CancelRequest {
    id: Uuid,
}

pub fn create_app<T: BookingBackend>(backend: T, engine: Arc<AvailabilityEngine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState { backend, engine };

    Router::new()
        .route("/availability", get(get_availability))
        .route("/appointments", get(get_appointments))
        .route("/book", post(book_appointment))
        .route("/cancel", post(cancel_appointment))
        .with_state(state)
        .layer(cors)
}

async fn get_availability<T: BookingBackend>(
    State(state): State<AppState<T>>,
    Query(params): Query<AvailabilityParams>,
) -> impl IntoResponse {
    let engine = &state.engine;
    let today = Local::now().date_naive();
    let range = DateRange {
        from: Local::now(),
        to: Local::now() + Duration::days(engine.config().max_lookahead_days as i64 + 1),
    };

    let bookings = state.backend.list_bookings(params.doctor_id, Some(range));
    let locale = locale_for_tag(params.locale.as_deref().unwrap_or("en"));
    let window = engine.availability_window(today, &bookings, params.doctor_id, locale);
    Json(window)
}

async fn get_appointments<T: BookingBackend>(
    State(state): State<AppState<T>>,
    Query(params): Query<AppointmentsParams>,
) -> impl IntoResponse {
    Json(state.backend.list_bookings(params.doctor_id, None))
}

/// Validates against a snapshot fetched immediately before submission to
/// minimize staleness, then hands off to the backend, which stays the
/// authoritative conflict check.
async fn book_appointment<T: BookingBackend>(
    State(state): State<AppState<T>>,
    Json(draft): Json<BookingDraft>,
) -> Response {
    let snapshot = match draft.doctor_id {
        Some(doctor_id) => state.backend.list_bookings(doctor_id, None),
        None => Vec::new(),
    };

    let request = match state.engine.validate_booking_request(&draft, &snapshot) {
        Ok(request) => request,
        Err(err) => {
            warn!(%err, "booking rejected by availability check");
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(err)).into_response();
        }
    };

    match state.backend.create_booking(request) {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(BookingError::Conflict) => {
            warn!("booking lost the race for its slot");
            (StatusCode::CONFLICT, "slot already taken".to_string()).into_response()
        }
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn cancel_appointment<T: BookingBackend>(
    State(state): State<AppState<T>>,
    Json(cancel): Json<CancelRequest>,
) -> Response {
    match state.backend.cancel_booking(cancel.id) {
        Ok(()) => (StatusCode::OK, "booking cancelled".to_string()).into_response(),
        Err(BookingError::NotFound) => {
            (StatusCode::NOT_FOUND, "booking does not exist".to_string()).into_response()
        }
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}
