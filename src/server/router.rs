//! HTTP routing and OpenAPI documentation configuration.
//!
//! This module defines the application's HTTP routes and generates OpenAPI documentation
//! using utoipa. All API endpoints are registered here with their OpenAPI specifications,
//! and Swagger UI is configured to provide interactive API documentation at `/api/docs`.

use axum::{middleware::from_fn_with_state, Router};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller,
    middleware::rate_limit::{rate_limit, RateLimiter},
    model::app::AppState,
};

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// # Registered Endpoints
/// - `GET /api/delivery-dates/available` - Delivery dates available at checkout
/// - `DELETE /api/delivery-dates/cache` - Clear the cached upstream dates, unless disabled
///   through `ENABLE_CACHE_CLEAR`
/// - `GET /health` - Service health
///
/// # Rate Limiting
/// Unless disabled through `ENABLE_RATE_LIMITING`, every route is guarded by the general
/// limiter, `/api` routes additionally by the api limiter and clearing the cache by the strict
/// limiter as well.
///
/// # OpenAPI Documentation
/// The OpenAPI specification is available at `/api/docs/openapi.json` and Swagger UI at
/// `/api/docs`.
///
/// # Returns
/// An Axum `Router` with state applied, ready to be served.
pub fn routes(state: AppState) -> Router {
    #[derive(OpenApi)]
    #[openapi(info(title = "Leverdag", description = "Leverdag delivery date API"), tags(
        (name = controller::delivery_date::DELIVERY_DATE_TAG, description = "Delivery date API routes"),
        (name = controller::health::HEALTH_TAG, description = "Service health"),
    ))]
    struct ApiDoc;

    let limiters = state
        .config
        .flags
        .enable_rate_limiting
        .then(|| state.rate_limiters.clone());

    let mut api_routes =
        OpenApiRouter::new().routes(routes!(controller::delivery_date::get_available_dates));

    if state.config.flags.enable_cache_clear {
        let cache_routes = guard(
            OpenApiRouter::new().routes(routes!(controller::delivery_date::clear_cache)),
            limiters.as_ref().map(|l| &l.strict),
        );
        api_routes = api_routes.merge(cache_routes);
    }

    let api_routes = guard(api_routes, limiters.as_ref().map(|l| &l.api));

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(api_routes)
        .routes(routes!(controller::health::health))
        .split_for_parts();

    let routes = routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api));

    let routes = match limiters {
        Some(limiters) => routes.layer(from_fn_with_state(limiters.general, rate_limit)),
        None => {
            tracing::warn!("Rate limiting is disabled");
            routes
        }
    };

    routes.with_state(state)
}

fn guard(
    router: OpenApiRouter<AppState>,
    limiter: Option<&RateLimiter>,
) -> OpenApiRouter<AppState> {
    match limiter {
        Some(limiter) => router.layer(from_fn_with_state(limiter.clone(), rate_limit)),
        None => router,
    }
}
