use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use crate::AppState;
use crate::auth::Authenticated;
use crate::db::models::TemplateFields;
use crate::error::{AppError, TemplateError};
use crate::validation::RequiredFields;

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub template_name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl TemplateRequest {
    /// All three fields are required, for creation and for updates alike.
    fn validate(self) -> Result<TemplateFields, AppError> {
        let mut required = RequiredFields::new();
        let fields = TemplateFields {
            template_name: required.take("template_name", self.template_name),
            subject: required.take("subject", self.subject),
            body: required.take("body", self.body),
        };
        required.finish()?;
        Ok(fields)
    }
}

// An id that is not a UUID cannot name any template.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| TemplateError::NotFound.into())
}

pub async fn create_template(
    Authenticated(account): Authenticated,
    req: web::Json<TemplateRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let fields = req.into_inner().validate()?;
    let template = state.templates.create(&account.email, fields).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Template created",
        "template": template
    })))
}

pub async fn list_templates(
    Authenticated(account): Authenticated,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let templates = state.templates.list_by_owner(&account.email).await?;
    Ok(HttpResponse::Ok().json(json!({ "templates": templates })))
}

pub async fn get_template(
    Authenticated(account): Authenticated,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let template = state.templates.get(id, &account.email).await?;
    Ok(HttpResponse::Ok().json(template))
}

pub async fn update_template(
    Authenticated(account): Authenticated,
    path: web::Path<String>,
    req: web::Json<TemplateRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let fields = req.into_inner().validate()?;
    let template = state.templates.update(id, &account.email, fields).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Template updated",
        "template": template
    })))
}

pub async fn delete_template(
    Authenticated(account): Authenticated,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    state.templates.delete(id, &account.email).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Template deleted" })))
}
