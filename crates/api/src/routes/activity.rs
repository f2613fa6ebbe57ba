//! Route definitions for activity logs, the medicine catalogue and the timeline.
//!
//! Every log kind exposes the same shape:
//!
//! ```text
//! GET    /       -> list (?babyId=&startDate=&endDate=&limit=)
//! POST   /       -> create
//! GET    /{id}   -> get
//! PUT    /{id}   -> update
//! DELETE /{id}   -> delete (soft)
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{
    bath_log, diaper_log, feed_log, measurement, medicine, milestone, note, sleep_log, timeline,
};
use crate::state::AppState;

/// Routes mounted at `/sleep-log`.
pub fn sleep_log_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(sleep_log::list_sleep_logs).post(sleep_log::create_sleep_log),
        )
        .route(
            "/{id}",
            get(sleep_log::get_sleep_log)
                .put(sleep_log::update_sleep_log)
                .delete(sleep_log::delete_sleep_log),
        )
}

/// Routes mounted at `/feed-log`, plus `GET /last?babyId=`.
pub fn feed_log_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(feed_log::list_feed_logs).post(feed_log::create_feed_log),
        )
        .route("/last", get(feed_log::last_feed))
        .route(
            "/{id}",
            get(feed_log::get_feed_log)
                .put(feed_log::update_feed_log)
                .delete(feed_log::delete_feed_log),
        )
}

/// Routes mounted at `/diaper-log`.
pub fn diaper_log_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(diaper_log::list_diaper_logs).post(diaper_log::create_diaper_log),
        )
        .route(
            "/{id}",
            get(diaper_log::get_diaper_log)
                .put(diaper_log::update_diaper_log)
                .delete(diaper_log::delete_diaper_log),
        )
}

/// Routes mounted at `/bath-log`.
pub fn bath_log_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bath_log::list_bath_logs).post(bath_log::create_bath_log),
        )
        .route(
            "/{id}",
            get(bath_log::get_bath_log)
                .put(bath_log::update_bath_log)
                .delete(bath_log::delete_bath_log),
        )
}

/// Routes mounted at `/milestone`.
pub fn milestone_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(milestone::list_milestones).post(milestone::create_milestone),
        )
        .route(
            "/{id}",
            get(milestone::get_milestone)
                .put(milestone::update_milestone)
                .delete(milestone::delete_milestone),
        )
}

/// Routes mounted at `/note`.
pub fn note_router() -> Router<AppState> {
    Router::new()
        .route("/", get(note::list_notes).post(note::create_note))
        .route(
            "/{id}",
            get(note::get_note)
                .put(note::update_note)
                .delete(note::delete_note),
        )
}

/// Routes mounted at `/measurement`.
pub fn measurement_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(measurement::list_measurements).post(measurement::create_measurement),
        )
        .route(
            "/{id}",
            get(measurement::get_measurement)
                .put(measurement::update_measurement)
                .delete(measurement::delete_measurement),
        )
}

/// Routes mounted at `/medicine-log`.
pub fn medicine_log_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(medicine::list_medicine_logs).post(medicine::create_medicine_log),
        )
        .route(
            "/{id}",
            get(medicine::get_medicine_log)
                .put(medicine::update_medicine_log)
                .delete(medicine::delete_medicine_log),
        )
}

/// Catalogue routes mounted at `/medicine`.
///
/// ```text
/// GET    /      -> list_medicines (?includeInactive=)
/// POST   /      -> create_medicine
/// PUT    /{id}  -> update_medicine
/// DELETE /{id}  -> delete_medicine
/// ```
pub fn medicine_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(medicine::list_medicines).post(medicine::create_medicine),
        )
        .route(
            "/{id}",
            put(medicine::update_medicine).delete(medicine::delete_medicine),
        )
}

/// Routes mounted at `/timeline`.
pub fn timeline_router() -> Router<AppState> {
    Router::new().route("/", get(timeline::get_timeline))
}
