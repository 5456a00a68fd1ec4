//! HTTP router
//!
//! Route groups are built as `Router<AppState>` so they can share paths
//! with different guards, then merged and given their state once.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::ErrorResponse;
use super::middleware::{admin_middleware, auth_middleware, AuthState};
use super::modules::metrics::{http_metrics_middleware, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{auth, documents, health, profiles};
use crate::application::ProfileService;
use crate::config::AppConfig;
use crate::infrastructure::database::repositories::ProfileRepository;
use crate::infrastructure::storage::LocalDocumentStore;

/// Shared application state; handlers extract the part they need.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub profiles: profiles::ProfileHandlerState,
    pub auth: AuthState,
    pub health: health::HealthState,
    pub metrics: MetricsState,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /jwt"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::health_check,
        super::modules::metrics::prometheus_metrics,
        auth::issue_jwt,
        profiles::create_profile,
        profiles::check_admin,
        profiles::get_own_profile,
        profiles::update_profile,
        profiles::get_profile_by_id,
        profiles::list_profiles,
        profiles::promote_profile,
        profiles::delete_profile,
        documents::upload_documents,
        documents::replace_documents,
    ),
    components(
        schemas(
            ErrorResponse,
            auth::TokenResponse,
            auth::TokenRequestDoc,
            profiles::ProfileDto,
            profiles::CreateProfileRequest,
            profiles::UpdateProfileRequest,
            profiles::InsertResultDto,
            profiles::UpdateResultDto,
            profiles::DeleteResultDto,
            profiles::AdminStatusDto,
            documents::DocumentsForm,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness, health report and metrics"),
        (name = "Authentication", description = "Token issuance"),
        (name = "Profiles", description = "Profile registration, self-service and administration"),
        (name = "Documents", description = "Passport, visa and photo uploads"),
    ),
    info(
        title = "LiveColab API",
        version = "1.0.0",
        description = "Profile and document backend for the LiveColab frontend"
    )
)]
pub struct ApiDoc;

/// Credentialed CORS needs concrete origins; an empty list allows any
/// origin without credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn create_api_router(
    db: DatabaseConnection,
    config: &AppConfig,
    metrics_handle: PrometheusHandle,
) -> Router {
    let documents = LocalDocumentStore::new(config.storage.documents_dir.clone());
    let profile_service = Arc::new(ProfileService::new(
        Arc::new(ProfileRepository::new(db.clone())),
        documents,
    ));

    let auth_state = AuthState {
        jwt_config: config.jwt_config(),
        profiles: profile_service.clone(),
    };

    let state = AppState {
        profiles: profiles::ProfileHandlerState {
            profiles: profile_service,
        },
        auth: auth_state.clone(),
        health: health::HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        },
        metrics: MetricsState {
            handle: metrics_handle,
        },
    };

    let require_token = middleware::from_fn_with_state(auth_state.clone(), auth_middleware);
    let require_admin = middleware::from_fn_with_state(auth_state, admin_middleware);

    let public_routes: Router<AppState> = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(super::modules::metrics::prometheus_metrics))
        .route("/jwt", post(auth::issue_jwt))
        .route("/users", post(profiles::create_profile));

    // Paths shared between groups must use the same parameter name.
    let user_routes: Router<AppState> = Router::new()
        .route("/users/admin/{key}", get(profiles::check_admin))
        .route(
            "/user/{key}",
            get(profiles::get_own_profile).patch(profiles::update_profile),
        )
        .route("/upload-files/{email}", post(documents::upload_documents))
        .route("/update-files/{email}", put(documents::replace_documents))
        .route_layer(require_token.clone());

    let admin_routes: Router<AppState> = Router::new()
        .route("/users", get(profiles::list_profiles))
        .route("/user/admin/{id}", get(profiles::get_profile_by_id))
        .route("/users/{id}", delete(profiles::delete_profile));

    let promotion_route: Router<AppState> =
        Router::new().route("/users/admin/{key}", patch(profiles::promote_profile));

    let admin_routes = if config.security.open_admin_promotion {
        warn!("Admin promotion is open to unauthenticated callers (security.open_admin_promotion)");
        admin_routes
            .route_layer(require_admin)
            .route_layer(require_token)
            .merge(promotion_route)
    } else {
        admin_routes
            .merge(promotion_route)
            .route_layer(require_admin)
            .route_layer(require_token)
    };

    let swagger = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .nest_service(
            &config.storage.public_path,
            ServeDir::new(&config.storage.documents_dir),
        )
        .with_state(state)
        .merge(swagger)
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.cors_origins))
}
