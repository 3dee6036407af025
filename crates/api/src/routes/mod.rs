pub mod admin;
pub mod availability;
pub mod badges;
pub mod bookings;
pub mod contractors;
pub mod governance;
pub mod health;
pub mod mastery;
pub mod points;
pub mod profiles;
pub mod reviews;
pub mod rewards;
pub mod service_packages;
pub mod verification;
pub mod warranty_claims;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                               WebSocket (?token=)
///
/// /profiles/me                                      get, upsert own profile
/// /profiles/{id}                                    get profile
///
/// /service-packages                                 list, create (contractor)
/// /service-packages/{id}                            get, update, delete
/// /service-packages/{id}/reviews                    reviews of a package
///
/// /bookings                                         list, create (client)
/// /bookings/{id}                                    get
/// /bookings/{id}/status                             status transition (PUT)
/// /bookings/{id}/messages                           list, send
/// /bookings/{id}/messages/read                      mark read (POST)
/// /messages/unread-count                            unread total (GET)
///
/// /reviews                                          create (client)
/// /external-reviews                                 link listing (PUT)
/// /external-reviews/{id}                            unlink (DELETE)
///
/// /contractors/{id}/reviews                         reviews received
/// /contractors/{id}/rating                          rating summary
/// /contractors/{id}/external-reviews                linked listings
/// /contractors/{id}/availability                    slots
/// /contractors/{id}/availability/check              coverage of a window
///
/// /availability                                     create own slot
/// /availability/{id}                                update, delete own slot
///
/// /warranty-claims                                  list, file (client)
/// /warranty-claims/{id}                             get
/// /warranty-claims/{id}/status                      status transition (PUT)
///
/// /verification/me                                  get, submit (contractor)
/// /verification/me/background-check                 start check (POST)
///
/// /points/me                                        balance summary
/// /points/me/transactions                           ledger
/// /points/spend                                     spend (POST)
/// /points/leaderboard                               top balances
///
/// /mastery/top                                      highest scores
/// /mastery/{profile_id}                             score, level, progress
/// /gamification/me                                  role, permissions, mastery, points, badges
///
/// /badges                                           catalog
/// /badges/me                                        own badges
/// /badges/me/check                                  award newly earned (POST)
/// /badges/me/{user_badge_id}/featured               feature a badge (PUT)
/// /rewards                                          catalog
/// /rewards/me                                       own redemptions
/// /rewards/{id}                                     get
/// /rewards/{id}/redeem                              redeem (POST)
///
/// /governance/proposals                             list, create
/// /governance/proposals/{id}                        get with own vote
/// /governance/proposals/{id}/vote                   cast or change vote (POST)
/// /governance/proposals/{id}/close                  decide outcome (POST)
///
/// /admin/profiles                                   list (admin only)
/// /admin/profiles/{id}/role                         change role (PUT)
/// /admin/profiles/{id}                              delete
/// /admin/verifications                              list
/// /admin/verifications/{contractor_id}              get
/// /admin/verifications/{contractor_id}/decision     approve, reject (POST)
/// /admin/verifications/{contractor_id}/background-check   record result (PUT)
/// /admin/points/award                               award points (POST)
/// /admin/mastery/{profile_id}                       set score components (PUT)
/// /admin/badges                                     add badge (POST)
/// /admin/rewards                                    add reward (POST)
/// /admin/rewards/{id}                               update reward (PUT)
/// /admin/events                                     domain event log
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        // Profiles and roles.
        .nest("/profiles", profiles::router())
        .nest("/admin/profiles", profiles::admin_router())
        // Marketplace.
        .nest("/service-packages", service_packages::router())
        .nest("/bookings", bookings::router())
        .nest("/messages", bookings::messages_router())
        .nest("/reviews", reviews::router())
        .nest("/external-reviews", reviews::external_router())
        .nest("/contractors", contractors::router())
        .nest("/availability", availability::router())
        .nest("/warranty-claims", warranty_claims::router())
        // Contractor verification.
        .nest("/verification", verification::router())
        .nest("/admin/verifications", verification::admin_router())
        // Gamification.
        .nest("/points", points::router())
        .nest("/mastery", mastery::router())
        .nest("/gamification", mastery::gamification_router())
        .nest("/badges", badges::router())
        .nest("/rewards", rewards::router())
        // Governance.
        .nest("/governance/proposals", governance::router())
        // Remaining admin endpoints.
        .nest("/admin", admin::router())
}
