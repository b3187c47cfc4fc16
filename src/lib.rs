pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod templates;
pub mod validation;

use std::sync::Arc;
use actix_web::{web, HttpResponse};
use tracing::{info, warn};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use crate::config::Settings;

pub use auth::{AccessGuard, AuthService, Authenticated, TokenService};
pub use db::{Account, DbOperations, Template, TemplateFields};
pub use templates::TemplateService;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Registers every route. Template routes take the `Authenticated`
/// extractor and so always pass through the access guard.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use auth::handlers::{login, register};
    use templates::handlers::{
        create_template, delete_template, get_template, list_templates, update_template,
    };

    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .route("/health", web::get().to(health_check))
    .route("/register", web::post().to(register))
    .route("/login", web::post().to(login))
    .service(
        web::resource("/template")
            .route(web::post().to(create_template))
            .route(web::get().to(list_templates)),
    )
    .service(
        web::resource("/template/{id}")
            .route(web::get().to(get_template))
            .route(web::put().to(update_template))
            .route(web::delete().to(delete_template)),
    );
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: DbOperations,
    pub auth_service: Arc<AuthService>,
    pub templates: Arc<TemplateService>,
    pub guard: Arc<AccessGuard>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::connect(&config.database).await?;
        info!("Database ready at {}", config.database.url);

        let secret = match config.auth.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => secret.to_string(),
            None => {
                warn!("auth.jwt_secret is not set; generated a process-local secret, tokens will not survive a restart");
                auth::generate_secret()
            }
        };
        let tokens = Arc::new(TokenService::new(
            &secret,
            chrono::Duration::hours(config.auth.token_expiry_hours),
        ));

        let auth_service = Arc::new(AuthService::new(
            db.clone(),
            tokens.clone(),
            config.auth.bcrypt_cost,
        )?);
        let guard = Arc::new(AccessGuard::new(auth_service.clone(), tokens));
        let templates = Arc::new(TemplateService::new(db.clone()));

        Ok(Self {
            config: Arc::new(config),
            db,
            auth_service,
            templates,
            guard,
        })
    }

    pub async fn shutdown(&self) -> Result<()> {
        // Close database connections
        self.db.close().await;
        Ok(())
    }
}
