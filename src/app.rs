use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::auth::TokenKeys;
use crate::config::{AppConfig, StorageBackend};
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};
use crate::handlers::{self, protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{AuthService, CommentService, ProjectService};

/// Shared, cheaply clonable handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: AuthService,
    pub projects: ProjectService,
    pub comments: CommentService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, keys: TokenKeys) -> Self {
        Self {
            auth: AuthService::new(store.clone(), keys),
            projects: ProjectService::new(store.clone()),
            comments: CommentService::new(store.clone()),
            store,
        }
    }
}

/// Open the configured store. The returned manager, if any, owns the Postgres pool.
pub async fn connect_store(config: &AppConfig) -> anyhow::Result<(Arc<dyn Store>, Option<DatabaseManager>)> {
    match config.storage_backend()? {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Ok((Arc::new(MemoryStore::new()), None))
        }
        StorageBackend::Postgres => {
            let manager = DatabaseManager::connect(&config.database).await?;
            if config.database.run_migrations {
                manager.migrate().await?;
            }
            Ok((Arc::new(PgStore::new(manager.clone())), Some(manager)))
        }
    }
}

/// Build the full HTTP router
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(user_routes())
        // Bearer token required
        .merge(project_routes(state.clone()))
        .fallback(handlers::not_found)
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security.cors_origins))
        .with_state(state);

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/user/signup", post(public::signup))
        .route("/api/v1/user/signin", post(public::signin))
}

fn project_routes(state: AppState) -> Router<AppState> {
    use protected::{comments, projects};

    Router::new()
        .route("/api/v1/projects", get(projects::list).post(projects::create))
        .route(
            "/api/v1/projects/:id",
            get(projects::get).put(projects::update).delete(projects::delete),
        )
        .route(
            "/api/v1/projects/:id/comments",
            get(comments::list).post(comments::create),
        )
        .route("/api/v1/comments/:id", delete(comments::delete))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            // a wildcard cannot sit in an origin list or go with credentials
            Ok(value) if value != "*" => Some(value),
            _ => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    info!("CORS allowed origins: {}", origins.len());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(Duration::from_secs(600))
        .allow_credentials(true)
}
