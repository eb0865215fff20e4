use axum::{middleware as axum_middleware, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use flux_crm_api::config;
use flux_crm_api::database;
use flux_crm_api::middleware::auth::require_auth;
use flux_crm_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Flux CRM API in {:?} mode", config.environment);

    let pool = database::connect(&config.database).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState::new(pool.clone());
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Flux CRM API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Database pool closed, shutting down");
    Ok(())
}

fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth_routes())
        .merge(contact_routes())
        .merge(lead_routes())
        .merge(task_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Everything else sits behind the auth gate
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use axum::routing::post;
    use flux_crm_api::handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn auth_routes() -> Router<AppState> {
    use flux_crm_api::handlers::protected::auth;

    Router::new().route("/auth/me", get(auth::me))
}

fn contact_routes() -> Router<AppState> {
    use flux_crm_api::handlers::protected::contacts;

    Router::new()
        .route("/contacts", get(contacts::list).post(contacts::create))
        .route(
            "/contacts/:id",
            get(contacts::get_one)
                .put(contacts::update)
                .delete(contacts::remove),
        )
}

fn lead_routes() -> Router<AppState> {
    use flux_crm_api::handlers::protected::leads;

    Router::new()
        .route("/leads", get(leads::list).post(leads::create))
        .route("/leads/stats/pipeline", get(leads::pipeline))
        .route(
            "/leads/:id",
            get(leads::get_one).put(leads::update).delete(leads::remove),
        )
}

fn task_routes() -> Router<AppState> {
    use flux_crm_api::handlers::protected::tasks;

    Router::new()
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/stats/overview", get(tasks::overview))
        .route(
            "/tasks/:id",
            get(tasks::get_one).put(tasks::update).delete(tasks::remove),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Flux CRM API",
        "version": version,
        "description": "Multi-tenant CRM backend API built with Rust (Axum)",
        "endpoints": {
            "auth": "/auth/register, /auth/login (public), /auth/me (protected)",
            "contacts": "/contacts[/:id] (protected)",
            "leads": "/leads[/:id], /leads/stats/pipeline (protected)",
            "tasks": "/tasks[/:id], /tasks/stats/overview (protected)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
