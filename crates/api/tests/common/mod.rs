#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use stride_api::config::{ServerConfig, SweepConfig};
use stride_api::routes;
use stride_api::state::AppState;
use stride_core::snapshot::CatalogProduct;
use stride_engine::{
    Clock, EnrollmentService, EscalationService, Mailer, NoopMailer, ProgressService,
    StaticCatalog, SystemClock,
};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        sweep: SweepConfig {
            interval_secs: 86_400,
            email_timeout_secs: 2,
            nudge_after_days: 2,
            warning_after_days: 5,
            reset_after_days: 7,
        },
    }
}

/// Static catalog covering every product the seeded challenges reference,
/// so enrollment tests produce non-empty snapshots without a storefront.
pub fn test_catalog() -> StaticCatalog {
    StaticCatalog::new([
        product("prod-diffuser-01", "Stone Diffuser", 11_900),
        product("prod-oil-lavender", "Lavender Essential Oil", 2_400),
        product("prod-journal-02", "Guided Journal", 3_200),
        product("prod-tea-sampler", "Morning Tea Sampler", 1_800),
        product("prod-mat-01", "Cork Yoga Mat", 8_900),
        product("prod-band-02", "Resistance Band Set", 2_600),
    ])
}

fn product(id: &str, name: &str, price_cents: i64) -> CatalogProduct {
    CatalogProduct {
        id: id.to_string(),
        name: name.to_string(),
        price_cents,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. Emails go to a [`NoopMailer`] and
/// product lookups hit a [`StaticCatalog`] seeded with the migration's
/// product IDs.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mailer: Arc<dyn Mailer> = Arc::new(NoopMailer);
    let catalog = Arc::new(test_catalog());

    let enrollments = Arc::new(EnrollmentService::new(
        pool.clone(),
        Arc::clone(&clock),
        Arc::clone(&mailer),
        catalog,
    ));
    let progress = Arc::new(ProgressService::new(pool.clone(), Arc::clone(&clock)));
    let escalation = Arc::new(EscalationService::new(
        pool.clone(),
        clock,
        mailer,
        config.sweep.policy(),
        config.sweep.email_timeout(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config),
        enrollments,
        progress,
        escalation,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to the app.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body to the app.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with an empty body to the app.
pub async fn post_empty(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PUT request with a JSON body to the app.
pub async fn put_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request to the app.
pub async fn delete(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
