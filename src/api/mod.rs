// Axum web server layer

use axum::{error_handling::HandleErrorLayer, http::StatusCode, routing::{get, post}, BoxError, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

pub mod handlers;
pub mod middleware;
pub mod responses;

use crate::auth::audit_logger::AuditLogger;
use crate::auth::credentials::{CredentialVerifier, IdentityStore};
use crate::auth::session::SessionManager;
use crate::auth::token_issuer::TokenIssuer;
use crate::core::crypto::TokenSigner;
use crate::core::errors::CampError;
use crate::core::models::{Camp, Speaker, Talk};
use crate::mapping::url::RouteTable;
use crate::utils::time::Clock;

pub use crate::config::Config;

/// Persistence operations the camp endpoints rely on
#[async_trait::async_trait]
pub trait CampRepository: Send + Sync {
    async fn list_camps(&self) -> Result<Vec<Camp>, CampError>;
    async fn get_camp(&self, id: i32) -> Result<Option<Camp>, CampError>;
    /// Stores a new camp and returns it with its assigned id
    async fn add_camp(&self, camp: Camp) -> Result<Camp, CampError>;
    async fn update_camp(&self, camp: Camp) -> Result<(), CampError>;
    /// Returns false when no camp had that id
    async fn delete_camp(&self, id: i32) -> Result<bool, CampError>;
    async fn list_speakers(&self, camp_id: i32) -> Result<Vec<Speaker>, CampError>;
    async fn get_speaker(&self, camp_id: i32, id: i32) -> Result<Option<Speaker>, CampError>;
    async fn list_talks(&self, camp_id: i32, speaker_id: i32) -> Result<Vec<Talk>, CampError>;
    async fn get_talk(&self, camp_id: i32, speaker_id: i32, id: i32) -> Result<Option<Talk>, CampError>;

    /// A camp together with its speakers
    async fn get_camp_with_speakers(&self, id: i32) -> Result<Option<(Camp, Vec<Speaker>)>, CampError> {
        match self.get_camp(id).await? {
            Some(camp) => {
                let speakers = self.list_speakers(id).await?;
                Ok(Some((camp, speakers)))
            }
            None => Ok(None),
        }
    }
}

/// Application state containing all shared dependencies
///
/// All components are wrapped in Arc for shared ownership across async tasks.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn CampRepository>,
    pub token_issuer: Arc<TokenIssuer>,
    pub sessions: Arc<SessionManager>,
    pub route_table: Arc<RouteTable>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the authentication services around one shared credential verifier
    pub fn new(
        config: Config,
        repository: Arc<dyn CampRepository>,
        identities: Arc<dyn IdentityStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CampError> {
        let verifier = CredentialVerifier::new(identities);
        let audit_logger = AuditLogger::new();

        let signer = Arc::new(TokenSigner::new(
            config.jwt_secret_bytes(),
            config.jwt_issuer.clone(),
            config.jwt_audience.clone(),
        )?);

        let validity_minutes = i64::try_from(config.token_validity_minutes).map_err(|_| {
            CampError::ConfigurationError("token validity out of range".to_string())
        })?;

        let token_issuer = TokenIssuer::new(
            verifier.clone(),
            signer,
            clock.clone(),
            chrono::Duration::minutes(validity_minutes),
            audit_logger.clone(),
        );

        let sessions = SessionManager::new(
            verifier,
            clock,
            Duration::from_secs(config.session_ttl_secs),
            audit_logger,
        )?;

        Ok(Self {
            repository,
            token_issuer: Arc::new(token_issuer),
            sessions: Arc::new(sessions),
            route_table: Arc::new(RouteTable::default()),
            config: Arc::new(config),
        })
    }
}

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - Request timeout (tower::timeout), surfaced as 408
/// - Body size limit (tower-http::limit)
/// - Tracing (tower-http::trace)
pub fn create_router(app_state: AppState) -> Router {
    let body_limit = app_state.config.body_size_limit_bytes;
    let timeout_secs = app_state.config.request_timeout_secs;

    let router = Router::new()
        .route("/api/auth/token", post(handlers::create_token_handler))
        .route("/api/auth/login", post(handlers::login_handler))
        .route(
            "/api/camps",
            get(handlers::list_camps_handler).post(handlers::create_camp_handler),
        )
        .route(
            "/api/camps/:camp_id",
            get(handlers::get_camp_handler)
                .put(handlers::update_camp_handler)
                .delete(handlers::delete_camp_handler),
        )
        .route("/api/camps/:camp_id/speakers", get(handlers::list_speakers_handler))
        .route(
            "/api/camps/:camp_id/speakers/:speaker_id",
            get(handlers::get_speaker_handler),
        )
        .route(
            "/api/camps/:camp_id/speakers/:speaker_id/talks",
            get(handlers::list_talks_handler),
        )
        .route(
            "/api/camps/:camp_id/speakers/:speaker_id/talks/:talk_id",
            get(handlers::get_talk_handler),
        )
        .route("/health", get(handlers::health_handler))
        .with_state(app_state);

    // Layers wrap in reverse order: the last one added is outermost
    let router = router
        .layer(middleware::tracing_layer())
        .layer(RequestBodyLimitLayer::new(body_limit));

    // HandleErrorLayer must come BEFORE timeout to catch the timeout error
    let timeout_stack = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|e: BoxError| async move {
            let status = if e.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string())
        }))
        .timeout(Duration::from_secs(timeout_secs))
        .into_inner();

    router.layer(timeout_stack)
}
