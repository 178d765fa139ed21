//! API Routes
//!
//! HTTP endpoint definitions. Event listing and reads are public; the
//! rest requires a bearer token, and admin-only handlers gate on the
//! caller's role. Literal path segments (`badge/:badgeId`,
//! `event/:eventId/stats`) are separate routes, so they always win over
//! the generic `:id` wildcard.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AuthService, LoginRequest, LoginResponse, RegisterUser};
use crate::domain::{
    Attendee, CheckInRequest, CreateEntrance, CreateEvent, Entrance, Event, RegisterAttendee,
    UpdateEntrance, UpdateEvent, User,
};
use crate::error::AppError;
use crate::registry::{AttendeeRegistry, EntranceRegistry, EventRegistry};
use crate::stats::{EntranceStatistics, EventStatistics, StatsService};
use crate::workflow::{BulkUpload, BulkUploadResult, CheckInWorkflow, RegistrationWorkflow};

use super::middleware::{auth_middleware, AuthUser};
use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilterQuery {
    #[serde(default)]
    pub event_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct RecentCheckInsQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    // Event reads and the auth endpoints are public
    let public = Router::new()
        .route("/events", get(list_events))
        .route("/events/:id", get(get_event))
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login));

    let protected = Router::new()
        .route("/events", post(create_event))
        .route("/events/:id", axum::routing::put(update_event).delete(delete_event))
        .route("/attendees", get(list_attendees))
        .route("/attendees/badge/:badge_id", get(get_attendee_by_badge))
        .route("/attendees/event/:event_id/stats", get(get_event_statistics))
        .route(
            "/attendees/event/:event_id/recent-check-ins",
            get(get_recent_check_ins),
        )
        .route("/attendees/register", post(register_attendee))
        .route("/attendees/check-in", post(check_in))
        .route("/attendees/bulk-upload", post(bulk_upload))
        .route("/attendees/:id", get(get_attendee).delete(delete_attendee))
        .route("/entrances", get(list_entrances).post(create_entrance))
        .route(
            "/entrances/event/:event_id/stats",
            get(get_entrance_statistics),
        )
        .route("/entrances/:id/increment-scan", post(increment_scan_count))
        .route(
            "/entrances/:id",
            get(get_entrance)
                .put(update_entrance)
                .delete(delete_entrance),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public
        .merge(protected)
        .layer(middleware::from_fn(super::middleware::logging_middleware))
        .with_state(state)
}

// =========================================================================
// Auth
// =========================================================================

async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let auth = AuthService::new(&state.stores);
    let user = auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let auth = AuthService::new(&state.stores);
    Ok(Json(auth.login(request).await?))
}

// =========================================================================
// Events
// =========================================================================

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let registry = EventRegistry::new(&state.stores);
    Ok(Json(registry.find_all().await?))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    let registry = EventRegistry::new(&state.stores);
    Ok(Json(registry.find_by_id(id).await?))
}

async fn create_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateEvent>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    user.require_admin()?;
    let registry = EventRegistry::new(&state.stores);
    let event = registry.create(request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn update_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEvent>,
) -> Result<Json<Event>, AppError> {
    user.require_admin()?;
    let registry = EventRegistry::new(&state.stores);
    Ok(Json(registry.update(id, request).await?))
}

async fn delete_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require_admin()?;
    let registry = EventRegistry::new(&state.stores);
    registry.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Attendees
// =========================================================================

async fn list_attendees(
    State(state): State<AppState>,
    Query(query): Query<EventFilterQuery>,
) -> Result<Json<Vec<Attendee>>, AppError> {
    let registry = AttendeeRegistry::new(&state.stores);
    let attendees = match query.event_id {
        Some(event_id) => registry.find_by_event(event_id).await?,
        None => registry.find_all().await?,
    };
    Ok(Json(attendees))
}

async fn get_attendee_by_badge(
    State(state): State<AppState>,
    Path(badge_id): Path<String>,
) -> Result<Json<Attendee>, AppError> {
    let registry = AttendeeRegistry::new(&state.stores);
    Ok(Json(registry.find_by_badge_id(&badge_id).await?))
}

async fn get_event_statistics(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventStatistics>, AppError> {
    let stats = StatsService::new(&state.stores);
    Ok(Json(stats.event_statistics(event_id).await?))
}

async fn get_recent_check_ins(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<RecentCheckInsQuery>,
) -> Result<Json<Vec<Attendee>>, AppError> {
    let stats = StatsService::new(&state.stores);
    Ok(Json(stats.recent_check_ins(event_id, query.limit).await?))
}

async fn get_attendee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Attendee>, AppError> {
    let registry = AttendeeRegistry::new(&state.stores);
    Ok(Json(registry.find_by_id(id).await?))
}

async fn register_attendee(
    State(state): State<AppState>,
    Json(request): Json<RegisterAttendee>,
) -> Result<(StatusCode, Json<Attendee>), AppError> {
    let workflow = RegistrationWorkflow::new(&state.stores, state.badges.clone());
    let attendee = workflow.register(request).await?;
    Ok((StatusCode::CREATED, Json(attendee)))
}

async fn check_in(
    State(state): State<AppState>,
    Json(request): Json<CheckInRequest>,
) -> Result<Json<Attendee>, AppError> {
    let workflow = CheckInWorkflow::new(&state.stores);
    Ok(Json(workflow.check_in(request).await?))
}

async fn delete_attendee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require_admin()?;
    let registry = AttendeeRegistry::new(&state.stores);
    registry.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bulk_upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<BulkUpload>,
) -> Result<Json<BulkUploadResult>, AppError> {
    user.require_admin()?;
    let workflow = RegistrationWorkflow::new(&state.stores, state.badges.clone());
    Ok(Json(workflow.bulk_upload(request).await?))
}

// =========================================================================
// Entrances
// =========================================================================

async fn list_entrances(
    State(state): State<AppState>,
    Query(query): Query<EventFilterQuery>,
) -> Result<Json<Vec<Entrance>>, AppError> {
    let registry = EntranceRegistry::new(&state.stores);
    let entrances = match query.event_id {
        Some(event_id) => registry.find_by_event(event_id).await?,
        None => registry.find_all().await?,
    };
    Ok(Json(entrances))
}

async fn get_entrance_statistics(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EntranceStatistics>, AppError> {
    let stats = StatsService::new(&state.stores);
    Ok(Json(stats.entrance_statistics(event_id).await?))
}

async fn get_entrance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Entrance>, AppError> {
    let registry = EntranceRegistry::new(&state.stores);
    Ok(Json(registry.find_by_id(id).await?))
}

async fn create_entrance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateEntrance>,
) -> Result<(StatusCode, Json<Entrance>), AppError> {
    user.require_admin()?;
    let registry = EntranceRegistry::new(&state.stores);
    let entrance = registry.create(request).await?;
    Ok((StatusCode::CREATED, Json(entrance)))
}

async fn update_entrance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEntrance>,
) -> Result<Json<Entrance>, AppError> {
    user.require_admin()?;
    let registry = EntranceRegistry::new(&state.stores);
    Ok(Json(registry.update(id, request).await?))
}

async fn delete_entrance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require_admin()?;
    let registry = EntranceRegistry::new(&state.stores);
    registry.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn increment_scan_count(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Entrance>, AppError> {
    let registry = EntranceRegistry::new(&state.stores);
    Ok(Json(registry.increment_scan_count(id).await?))
}
