use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{Environment, SecurityConfig};
use crate::error::{ApiError, ApiResult};
use crate::handlers::protected::{favorites, session};
use crate::handlers::public::{cooks, photos, recipes, users};
use crate::middleware::require_session_middleware;
use crate::state::AppState;

/// The complete HTTP surface
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(catalog_routes())
        .merge(photo_routes(&state))
        .merge(user_routes(&state))
        .nest_service(&config.uploads.public_path, ServeDir::new(&config.uploads.dir))
        // Global middleware
        .layer(cors_layer(config.environment, &config.security))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cooks", get(cooks::list_cooks).post(cooks::create_cook))
        .route("/api/cooks/:cook_id", put(cooks::update_cook).delete(cooks::delete_cook))
        .route(
            "/api/cooks/:cook_id/recipes",
            get(recipes::list_cook_recipes).post(recipes::create_recipe),
        )
        .route(
            "/api/cooks/:cook_id/recipes/:recipe_id",
            put(recipes::update_recipe).delete(recipes::delete_recipe),
        )
        .route("/api/recipes", get(recipes::list_recipes))
        .route("/api/recipes/:recipe_id", get(recipes::get_recipe))
}

fn photo_routes(state: &AppState) -> Router<AppState> {
    let limit = state.config.uploads.max_file_size_bytes + photos::MULTIPART_OVERHEAD_BYTES;

    Router::new().route(
        "/api/photos",
        post(photos::upload_photo).layer(DefaultBodyLimit::max(limit)),
    )
}

/// Registration and login are public; everything else under /api/users
/// needs a session.
fn user_routes(state: &AppState) -> Router<AppState> {
    let require_session = from_fn_with_state(state.clone(), require_session_middleware);

    Router::new()
        .route(
            "/api/users",
            post(users::register).merge(
                get(session::whoami)
                    .delete(session::logout)
                    .route_layer(require_session.clone()),
            ),
        )
        .route("/api/users/login", post(users::login))
        .route(
            "/api/users/add/:recipe_id",
            post(favorites::add_favorite).route_layer(require_session.clone()),
        )
        .route(
            "/api/users/recipes",
            get(favorites::list_favorites).route_layer(require_session.clone()),
        )
        .route(
            "/api/users/remove/:recipe_id",
            delete(favorites::remove_favorite).route_layer(require_session),
        )
}

/// Any origin in development. Elsewhere only the configured origins, with
/// credentials so the session cookie crosses origins.
fn cors_layer(environment: Environment, security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Recipes API",
            "version": version,
            "description": "Recipe catalog: cooks, recipes, user accounts and favorites",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "cooks": "/api/cooks[/:cookID] (public)",
                "recipes": "/api/cooks/:cookID/recipes[/:recipeID], /api/recipes[/:recipeID] (public)",
                "photos": "/api/photos (public, multipart 'photo')",
                "images": "/images/:name (public, static)",
                "users": "/api/users, /api/users/login (public - registration and login)",
                "session": "/api/users (GET whoami, DELETE logout - session required)",
                "favorites": "/api/users/add/:recipeID, /api/users/recipes, /api/users/remove/:recipeID (session required)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let now = chrono::Utc::now();

    state.db.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("database unavailable")
    })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        }
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AppConfig, StorageBackend};
    use crate::database::{Database, MemoryDatabase};

    fn test_state(db: Arc<MemoryDatabase>) -> AppState {
        let mut config = AppConfig::development();
        config.database.backend = StorageBackend::Memory;
        config.password.memory_cost_kib = 1024;
        config.password.time_cost = 1;
        AppState::new(config, db).unwrap()
    }

    fn test_app() -> Router {
        app(test_state(Arc::new(MemoryDatabase::new())))
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        test_app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn root_and_health_are_public() {
        assert_eq!(status_of("GET", "/").await, StatusCode::OK);
        assert_eq!(status_of("GET", "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_is_unavailable_once_the_store_is_closed() {
        let db = Arc::new(MemoryDatabase::new());
        let router = app(test_state(db.clone()));
        db.close().await;

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
        assert_eq!(body["message"], "database unavailable");
    }

    #[tokio::test]
    async fn session_routes_require_login() {
        assert_eq!(status_of("GET", "/api/users").await, StatusCode::FORBIDDEN);
        assert_eq!(status_of("DELETE", "/api/users").await, StatusCode::FORBIDDEN);
        assert_eq!(status_of("GET", "/api/users/recipes").await, StatusCode::FORBIDDEN);
        assert_eq!(
            status_of("POST", &format!("/api/users/add/{}", uuid::Uuid::new_v4())).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of("DELETE", &format!("/api/users/remove/{}", uuid::Uuid::new_v4())).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn catalog_routes_are_public() {
        assert_eq!(status_of("GET", "/api/cooks").await, StatusCode::OK);
        assert_eq!(status_of("GET", "/api/recipes").await, StatusCode::OK);
        assert_eq!(status_of("GET", "/api/recipes/not-an-id").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_of("DELETE", "/api/cooks/not-an-id").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_image_is_not_found() {
        assert_eq!(status_of("GET", "/images/nothing-here").await, StatusCode::NOT_FOUND);
    }
}
