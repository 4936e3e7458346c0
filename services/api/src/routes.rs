use crate::infra::{deserialize_optional_date, session_for_dates, AppState};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use stay_desk::error::AppError;
use stay_desk::reservation::calendar::CalendarMonth;
use stay_desk::reservation::pricing::{CancellationCharge, PriceBreakdown};
use stay_desk::reservation::{
    BlockOverview, BookingSession, BookingSnapshot, BookingSummary, Filters, MealCounts,
    MemberProfile, Requirements, Room, RoomKey, SelectionState,
};
use stay_desk::settings::GuestCategory;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AvailabilityRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) check_in: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) check_out: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) filters: Filters,
    /// Block whose rooms are listed; defaults to the first block.
    #[serde(default)]
    pub(crate) block: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AvailabilityResponse {
    pub(crate) selection: SelectionState,
    pub(crate) filters: Filters,
    pub(crate) rooms: Vec<Room>,
    pub(crate) blocks: Vec<BlockOverview>,
    pub(crate) open_block_rooms: Vec<RoomOption>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RoomOption {
    pub(crate) key: RoomKey,
    pub(crate) occupancy_options: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoomRequest {
    pub(crate) key: RoomKey,
    /// Head count for the room; omitted means the filter occupancy.
    #[serde(default)]
    pub(crate) occupants: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) check_in: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) check_out: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) rooms: Vec<RoomRequest>,
    #[serde(default)]
    pub(crate) filters: Filters,
    #[serde(default)]
    pub(crate) meals: MealCounts,
    #[serde(default)]
    pub(crate) requirements: Requirements,
    #[serde(default)]
    pub(crate) member: MemberProfile,
    #[serde(default)]
    pub(crate) category: Option<GuestCategory>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuoteResponse {
    pub(crate) summary: BookingSummary,
    /// Requested rooms the inventory does not know.
    pub(crate) unknown_rooms: Vec<RoomKey>,
    /// Requested rooms already booked for part of the stay.
    pub(crate) unavailable_rooms: Vec<RoomKey>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CancellationRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) check_in: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) check_out: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) rooms: Vec<RoomKey>,
    #[serde(default)]
    pub(crate) group: bool,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) cancelled_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CancellationResponse {
    pub(crate) cancelled_on: NaiveDate,
    pub(crate) quote: PriceBreakdown,
    pub(crate) cancellation: CancellationCharge,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CalendarQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) check_in: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) check_out: Option<NaiveDate>,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/availability", post(availability_endpoint))
        .route("/api/v1/quote", post(quote_endpoint))
        .route("/api/v1/cancellation", post(cancellation_endpoint))
        .route("/api/v1/calendar", get(calendar_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "rooms": state.snapshot.rooms.len() })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn today_or(value: Option<NaiveDate>) -> NaiveDate {
    value.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn availability(
    snapshot: &BookingSnapshot,
    request: AvailabilityRequest,
) -> Result<AvailabilityResponse, AppError> {
    let mut session = session_for_dates(snapshot, request.check_in, request.check_out)?;
    session.set_filters(request.filters);
    if let Some(block) = request.block.as_deref() {
        session.open_block(block);
    }

    Ok(AvailabilityResponse {
        selection: *session.selection(),
        filters: *session.filters(),
        rooms: session
            .available_rooms(snapshot)
            .into_iter()
            .cloned()
            .collect(),
        blocks: session.block_overview(snapshot),
        open_block_rooms: session
            .open_block_rooms(snapshot)
            .into_iter()
            .map(|room| RoomOption {
                key: room.key(),
                occupancy_options: room.occupancy_options(),
            })
            .collect(),
    })
}

pub(crate) fn quote(
    snapshot: &BookingSnapshot,
    request: QuoteRequest,
) -> Result<QuoteResponse, AppError> {
    let mut session = session_for_dates(snapshot, request.check_in, request.check_out)?;
    session.set_filters(request.filters);
    session.meals = request.meals;
    session.requirements = request.requirements;
    session.member = request.member;

    let mut unknown_rooms = Vec::new();
    let mut unavailable_rooms = Vec::new();
    for requested in request.rooms {
        let Some(room) = snapshot.room(&requested.key) else {
            debug!(room = %requested.key, "quote skips unknown room");
            unknown_rooms.push(requested.key);
            continue;
        };

        match requested.occupants {
            Some(occupants) => session.set_room_occupants(room, occupants),
            None => {
                if !session.rooms_selected().contains_key(&requested.key) {
                    session.toggle_room(room);
                }
            }
        }

        if let Some(stay) = session.selection().stay() {
            if !stay_desk::reservation::availability::is_free_for(room, &snapshot.index, stay) {
                unavailable_rooms.push(requested.key);
            }
        }
    }

    let today = today_or(request.today);
    let category = request.category.unwrap_or(GuestCategory::Member);

    Ok(QuoteResponse {
        summary: session.summary(snapshot, today, category),
        unknown_rooms,
        unavailable_rooms,
    })
}

pub(crate) fn cancellation(
    snapshot: &BookingSnapshot,
    request: CancellationRequest,
) -> Result<CancellationResponse, AppError> {
    let (Some(check_in), Some(check_out)) = (request.check_in, request.check_out) else {
        return Err(AppError::BadRequest(
            "cancellation needs both check_in and check_out".to_string(),
        ));
    };
    let mut session = session_for_dates(snapshot, Some(check_in), Some(check_out))?;
    let mut filters = *session.filters();
    filters.group = request.group;
    session.set_filters(filters);
    select_known_rooms(&mut session, snapshot, &request.rooms);

    let cancelled_on = today_or(request.cancelled_on);
    let cancellation = session
        .cancellation(snapshot, cancelled_on)
        .ok_or_else(|| AppError::BadRequest("stay is incomplete".to_string()))?;

    Ok(CancellationResponse {
        cancelled_on,
        quote: session.quote(snapshot),
        cancellation,
    })
}

fn select_known_rooms(session: &mut BookingSession, snapshot: &BookingSnapshot, keys: &[RoomKey]) {
    for key in keys {
        if let Some(room) = snapshot.room(key) {
            if !session.rooms_selected().contains_key(key) {
                session.toggle_room(room);
            }
        }
    }
}

pub(crate) fn calendar(
    snapshot: &BookingSnapshot,
    query: CalendarQuery,
) -> Result<Vec<CalendarMonth>, AppError> {
    let session = session_for_dates(snapshot, query.check_in, query.check_out)?;
    Ok(snapshot.calendar(today_or(query.today), session.selection()))
}

pub(crate) async fn availability_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    availability(&state.snapshot, payload).map(Json)
}

pub(crate) async fn quote_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    quote(&state.snapshot, payload).map(Json)
}

pub(crate) async fn cancellation_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CancellationRequest>,
) -> Result<Json<CancellationResponse>, AppError> {
    cancellation(&state.snapshot, payload).map(Json)
}

pub(crate) async fn calendar_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Vec<CalendarMonth>>, AppError> {
    calendar(&state.snapshot, query).map(Json)
}
