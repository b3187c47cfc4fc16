use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Template {
    pub id: Uuid,
    pub template_name: String,
    pub subject: String,
    pub body: String,
    pub owner_email: String,
}

/// The caller-supplied fields of a template. Updates overwrite all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFields {
    pub template_name: String,
    pub subject: String,
    pub body: String,
}

impl Template {
    pub fn new(owner_email: &str, fields: TemplateFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_name: fields.template_name,
            subject: fields.subject,
            body: fields.body,
            owner_email: owner_email.to_string(),
        }
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        self.owner_email == email
    }
}
