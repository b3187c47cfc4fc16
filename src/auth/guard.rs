use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use std::sync::Arc;
use tracing::warn;
use crate::auth::service::AuthService;
use crate::auth::token::TokenService;
use crate::db::models::Account;
use crate::error::{AppError, AuthError};
use crate::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves the acting account from an `Authorization` header.
pub struct AccessGuard {
    auth: Arc<AuthService>,
    tokens: Arc<TokenService>,
}

impl AccessGuard {
    pub fn new(auth: Arc<AuthService>, tokens: Arc<TokenService>) -> Self {
        Self { auth, tokens }
    }

    pub async fn authenticate(&self, raw_header: Option<&str>) -> Result<Account, AppError> {
        let token = raw_header
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .ok_or(AuthError::MissingOrMalformedHeader)?;

        let claims = self.tokens.validate(token)?;

        let account = self
            .auth
            .find_by_email(&claims.email)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        Ok(account)
    }
}

/// Extractor for handlers that must run as an authenticated account.
///
/// Taking `Authenticated` as a handler argument is what makes a route
/// protected; the handler body only runs once the guard has resolved the
/// caller.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Account);

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // A header that is not valid ASCII is treated like a missing one.
        let raw_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned);
        let guard = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.guard.clone());
        let path = req.path().to_owned();

        Box::pin(async move {
            let guard = guard
                .ok_or_else(|| AppError::InternalError("access guard is not configured".into()))?;

            match guard.authenticate(raw_header.as_deref()).await {
                Ok(account) => Ok(Authenticated(account)),
                Err(e) => {
                    warn!("Rejected request to {}: {}", path, e);
                    Err(e)
                }
            }
        })
    }
}
