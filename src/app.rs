use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{extract::State, response::Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::gateway::Gateway;
use crate::handlers;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let gateway = Gateway::new(config.backend.base_url.clone());
        Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Console API
        .merge(auth_routes())
        .merge(company_routes())
        .merge(customer_routes())
        .merge(device_routes())
        .merge(permission_routes())
        .merge(user_routes())
        .merge(settings_routes())
        .merge(dashboard_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/auth/session",
            get(auth::session).delete(auth::logout),
        )
}

fn company_routes() -> Router<AppState> {
    use handlers::companies;

    Router::new()
        .route(
            "/api/companies",
            get(companies::list).post(companies::create),
        )
        .route(
            "/api/companies/:id",
            get(companies::show)
                .put(companies::update)
                .delete(companies::remove),
        )
        .route("/api/companies/:id/contacts", get(companies::contacts))
        .route("/api/companies/:id/devices", get(companies::devices))
        .route("/api/companies/:id/permissions", get(companies::permissions))
}

fn customer_routes() -> Router<AppState> {
    use handlers::customers;

    Router::new()
        .route(
            "/api/customers",
            get(customers::list).post(customers::create),
        )
        .route(
            "/api/customers/:id",
            get(customers::show)
                .put(customers::update)
                .delete(customers::remove),
        )
}

fn device_routes() -> Router<AppState> {
    use handlers::devices;

    Router::new()
        .route("/api/devices", get(devices::list).post(devices::create))
        .route(
            "/api/devices/:id",
            get(devices::show)
                .put(devices::update)
                .delete(devices::remove),
        )
}

fn permission_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::permissions;

    Router::new().route(
        "/api/permissions",
        post(permissions::create).delete(permissions::remove),
    )
}

fn user_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::users;

    Router::new()
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/:id",
            axum::routing::put(users::update).delete(users::remove),
        )
        .route("/api/users/:id/reset-password", post(users::reset_password))
        .route("/api/users/:id/unlock", post(users::unlock))
}

fn settings_routes() -> Router<AppState> {
    use handlers::settings;

    Router::new().route(
        "/api/settings/default-password",
        get(settings::show_default_password).put(settings::update_default_password),
    )
}

fn dashboard_routes() -> Router<AppState> {
    use handlers::dashboard;

    Router::new().route("/api/dashboard/stats", get(dashboard::stats))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "SmartFlex Admin Console",
        "version": version,
        "endpoints": {
            "auth": "/api/auth/login, /api/auth/session",
            "companies": "/api/companies[/:id[/{contacts,devices,permissions}]]",
            "customers": "/api/customers[/:id]",
            "devices": "/api/devices[/:id]",
            "permissions": "/api/permissions",
            "users": "/api/users[/:id[/{reset-password,unlock}]]",
            "settings": "/api/settings/default-password (superadmin)",
            "dashboard": "/api/dashboard/stats",
            "health": "/health",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.gateway.health().await.into_data() {
        Ok(backend) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "backend": backend,
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "backend_error": e.message(),
            })),
        ),
    }
}
