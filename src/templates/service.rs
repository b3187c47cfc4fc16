use tracing::{info, warn};
use uuid::Uuid;
use crate::db::models::{Template, TemplateFields};
use crate::db::operations::DbOperations;
use crate::error::{AppError, TemplateError};

/// Template access scoped to the owning account.
///
/// `get` reports a template owned by someone else as `NotFound`, while
/// `update` and `delete` report it as `Forbidden`.
pub struct TemplateService {
    db: DbOperations,
}

impl TemplateService {
    pub fn new(db: DbOperations) -> Self {
        Self { db }
    }

    pub async fn create(&self, owner_email: &str, fields: TemplateFields) -> Result<Template, AppError> {
        let template = self.db.create_template(&Template::new(owner_email, fields)).await?;
        info!("Template {} created by {}", template.id, owner_email);
        Ok(template)
    }

    pub async fn list_by_owner(&self, owner_email: &str) -> Result<Vec<Template>, AppError> {
        self.db.list_templates_by_owner(owner_email).await
    }

    pub async fn get(&self, id: Uuid, owner_email: &str) -> Result<Template, AppError> {
        self.db
            .get_template_by_id_and_owner(id, owner_email)
            .await?
            .ok_or_else(|| TemplateError::NotFound.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_email: &str,
        fields: TemplateFields,
    ) -> Result<Template, AppError> {
        self.authorize(id, owner_email).await?;

        // The row can disappear between the ownership check and the write.
        let template = self
            .db
            .update_template(id, &fields)
            .await?
            .ok_or(TemplateError::NotFound)?;
        info!("Template {} updated by {}", id, owner_email);
        Ok(template)
    }

    pub async fn delete(&self, id: Uuid, owner_email: &str) -> Result<(), AppError> {
        self.authorize(id, owner_email).await?;

        if self.db.delete_template(id).await? == 0 {
            return Err(TemplateError::NotFound.into());
        }
        info!("Template {} deleted by {}", id, owner_email);
        Ok(())
    }

    async fn authorize(&self, id: Uuid, owner_email: &str) -> Result<Template, AppError> {
        let template = self
            .db
            .get_template_by_id(id)
            .await?
            .ok_or(TemplateError::NotFound)?;

        if !template.is_owned_by(owner_email) {
            warn!("{} attempted to modify template {} owned by another account", owner_email, id);
            return Err(TemplateError::Forbidden.into());
        }
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::models::Account;

    const ALICE: &str = "alice@example.com";
    const BOB: &str = "bob@example.com";

    async fn setup() -> TemplateService {
        let db = DbOperations::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();
        for email in [ALICE, BOB] {
            db.create_account(&Account {
                email: email.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        }
        TemplateService::new(db)
    }

    fn fields(name: &str) -> TemplateFields {
        TemplateFields {
            template_name: name.to_string(),
            subject: "Welcome aboard".to_string(),
            body: "Hello {{name}}".to_string(),
        }
    }

    fn template_err(result: Result<impl std::fmt::Debug, AppError>) -> TemplateError {
        match result {
            Err(AppError::TemplateError(e)) => e,
            other => panic!("expected template error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let service = setup().await;
        let created = service.create(ALICE, fields("welcome")).await.unwrap();

        let fetched = service.get(created.id, ALICE).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.template_name, "welcome");
        assert_eq!(fetched.subject, "Welcome aboard");
        assert_eq!(fetched.body, "Hello {{name}}");
        assert_eq!(fetched.owner_email, ALICE);
    }

    #[tokio::test]
    async fn test_template_invisible_to_other_owner() {
        let service = setup().await;
        let created = service.create(ALICE, fields("welcome")).await.unwrap();

        assert!(service.list_by_owner(BOB).await.unwrap().is_empty());
        assert_eq!(template_err(service.get(created.id, BOB).await), TemplateError::NotFound);
        assert_eq!(
            template_err(service.update(created.id, BOB, fields("stolen")).await),
            TemplateError::Forbidden
        );
        assert_eq!(template_err(service.delete(created.id, BOB).await), TemplateError::Forbidden);

        // Nothing changed for the owner.
        assert_eq!(service.get(created.id, ALICE).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let service = setup().await;
        let id = Uuid::new_v4();
        assert_eq!(template_err(service.get(id, ALICE).await), TemplateError::NotFound);
        assert_eq!(
            template_err(service.update(id, ALICE, fields("x")).await),
            TemplateError::NotFound
        );
        assert_eq!(template_err(service.delete(id, ALICE).await), TemplateError::NotFound);
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let service = setup().await;
        let created = service.create(ALICE, fields("welcome")).await.unwrap();

        let replacement = TemplateFields {
            template_name: "farewell".to_string(),
            subject: "Goodbye".to_string(),
            body: "See you".to_string(),
        };
        let updated = service.update(created.id, ALICE, replacement.clone()).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.owner_email, ALICE);
        assert_eq!(updated.template_name, replacement.template_name);
        assert_eq!(updated.subject, replacement.subject);
        assert_eq!(updated.body, replacement.body);
        assert_eq!(service.get(created.id, ALICE).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let service = setup().await;
        let keep = service.create(ALICE, fields("keep")).await.unwrap();
        let gone = service.create(ALICE, fields("gone")).await.unwrap();

        service.delete(gone.id, ALICE).await.unwrap();
        assert_eq!(template_err(service.get(gone.id, ALICE).await), TemplateError::NotFound);
        assert_eq!(service.list_by_owner(ALICE).await.unwrap(), vec![keep]);
    }
}
