pub mod account;
pub mod activity;
pub mod auth;
pub mod baby;
pub mod caretaker;
pub mod family;
pub mod health;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/caretaker                         caretaker or system PIN login (public)
/// /auth/sysadmin                          sysadmin login (public)
/// /auth/setup-token                       exchange a setup link (public)
/// /auth/me                                current identity
///
/// /accounts/register                      register (public)
/// /accounts/login                         login (public)
/// /accounts/verify                        verify email (public)
/// /accounts/forgot-password               request reset (public)
/// /accounts/reset-password                reset password (public)
/// /accounts/status                        account + access status
/// /accounts/profile                       update profile (PUT)
/// /accounts/close                         close account (POST)
/// /accounts/payments/*                    Stripe checkout and subscription
///
/// /family                                 get (member), update (admin)
/// /family/by-slug/{slug}                  public lookup
/// /family/check-slug                      slug availability (public)
/// /family/list                            all families (sysadmin)
/// /family/{id}                            update (sysadmin)
/// /family/setup-link                      issue setup link (sysadmin)
/// /setup/start                            create a family
///
/// /settings                               get (member), update (admin)
/// /units                                  list units (public)
///
/// /baby                                   list
/// /baby/create                            create
/// /baby/{id}                              get, update, delete
/// /caretaker                              list, create (admin)
/// /caretaker/{id}                         update, delete (admin)
///
/// /sleep-log, /feed-log, /diaper-log,
/// /bath-log, /milestone, /note,
/// /measurement, /medicine-log             list, create
/// /{kind}/{id}                            get, update, delete
/// /feed-log/last                          latest feed for a baby
/// /medicine                               list, create
/// /medicine/{id}                          update, delete
/// /timeline                               merged recent activity
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Logins for every principal kind.
        .nest("/auth", auth::router())
        // Paying account owners, including billing.
        .nest("/accounts", account::router())
        // Families and the setup wizard.
        .nest("/family", family::router())
        .nest("/setup", family::setup_router())
        .nest("/settings", settings::router())
        .nest("/units", settings::units_router())
        .nest("/baby", baby::router())
        .nest("/caretaker", caretaker::router())
        // Activity logs.
        .nest("/sleep-log", activity::sleep_log_router())
        .nest("/feed-log", activity::feed_log_router())
        .nest("/diaper-log", activity::diaper_log_router())
        .nest("/bath-log", activity::bath_log_router())
        .nest("/milestone", activity::milestone_router())
        .nest("/note", activity::note_router())
        .nest("/measurement", activity::measurement_router())
        .nest("/medicine-log", activity::medicine_log_router())
        .nest("/medicine", activity::medicine_router())
        .nest("/timeline", activity::timeline_router())
}
