//! Route definitions for contractor service packages.

use axum::routing::get;
use axum::Router;

use crate::handlers::service_packages;
use crate::state::AppState;

/// Routes mounted at `/service-packages`.
///
/// ```text
/// GET    /               -> list_packages
/// POST   /               -> create_package
/// GET    /{id}           -> get_package
/// PUT    /{id}           -> update_package
/// DELETE /{id}           -> delete_package
/// GET    /{id}/reviews   -> list_package_reviews
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(service_packages::list_packages).post(service_packages::create_package),
        )
        .route(
            "/{id}",
            get(service_packages::get_package)
                .put(service_packages::update_package)
                .delete(service_packages::delete_package),
        )
        .route("/{id}/reviews", get(service_packages::list_package_reviews))
}
