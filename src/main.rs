use smartflex_admin::config::AppConfig;
use smartflex_admin::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up BACKEND_URL, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!(
        "starting SmartFlex admin console in {:?} mode, backend at {}",
        config.environment,
        config.backend.base_url
    );

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let state = AppState::new(config);
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("SmartFlex admin console listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
