use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use crate::AppState;
use crate::db::models::NewAccount;
use crate::error::AppError;
use crate::validation::RequiredFields;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let mut required = RequiredFields::new();
    let email = required.take("email", req.email);
    let password = required.take("password", req.password);
    required.finish()?;

    info!("Received login request for email: {}", email);
    match state.auth_service.login(&email, &password).await {
        Ok(access_token) => {
            info!("Login successful for email: {}", email);
            Ok(HttpResponse::Ok().json(AuthResponse { access_token }))
        }
        Err(e) => {
            warn!("Login failed for email: {}: {}", email, e);
            Err(e)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    fn validate(self) -> Result<NewAccount, AppError> {
        let mut required = RequiredFields::new();
        let account = NewAccount {
            email: required.take("email", self.email),
            first_name: required.take("first_name", self.first_name),
            last_name: required.take("last_name", self.last_name),
            password: required.take("password", self.password),
        };
        required.finish()?;
        Ok(account)
    }
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let new_account = req.into_inner().validate()?;
    info!("Received registration request for email: {}", new_account.email);

    state.auth_service.register(new_account).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User registered"
    })))
}
