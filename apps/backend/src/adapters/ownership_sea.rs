//! Postgres-backed ownership store (SeaORM).
//!
//! `users.excursion_refs` and `users.item_refs` are `uuid[]` columns. The
//! append/remove primitives are single `UPDATE` statements over
//! `array_append`/`array_remove`, so concurrent writers to the same user
//! cannot lose each other's refs the way a read-modify-write of the whole
//! list would.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, Set,
    Statement,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::{excursions, users};
use crate::repos::ownership::{Excursion, OwnershipStore, User};
use crate::AppError;

pub struct SeaOwnershipStore {
    db: DatabaseConnection,
}

impl SeaOwnershipStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OwnershipStore for SeaOwnershipStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = users::Entity::find_by_id(id).one(&self.db).await?;
        Ok(user.map(User::from))
    }

    async fn update_user_excursion_refs(
        &self,
        id: Uuid,
        refs: Vec<Uuid>,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = users::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        active.excursion_refs = Set(refs);
        active.updated_at = Set(OffsetDateTime::now_utc());
        let updated = active.update(&self.db).await?;
        Ok(Some(User::from(updated)))
    }

    async fn append_excursion_ref(
        &self,
        id: Uuid,
        excursion_id: Uuid,
    ) -> Result<Option<User>, AppError> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"UPDATE "users"
               SET "excursion_refs" = array_append("excursion_refs", $1),
                   "updated_at" = $2
               WHERE "id" = $3"#,
            [
                excursion_id.into(),
                OffsetDateTime::now_utc().into(),
                id.into(),
            ],
        );

        let result = self.db.execute(stmt).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user(id).await
    }

    async fn remove_excursion_ref(
        &self,
        id: Uuid,
        excursion_id: Uuid,
    ) -> Result<Option<User>, AppError> {
        // array_remove drops every exact-match element and is a no-op when
        // the id is absent, which is exactly the delete-path contract.
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"UPDATE "users"
               SET "excursion_refs" = array_remove("excursion_refs", $1),
                   "updated_at" = $2
               WHERE "id" = $3"#,
            [
                excursion_id.into(),
                OffsetDateTime::now_utc().into(),
                id.into(),
            ],
        );

        let result = self.db.execute(stmt).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user(id).await
    }

    async fn create_excursion(&self, name: &str) -> Result<Excursion, AppError> {
        let now = OffsetDateTime::now_utc();
        let active = excursions::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            item_refs: Set(Vec::new()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = active.insert(&self.db).await?;
        Ok(Excursion::from(created))
    }

    async fn get_excursion(&self, id: Uuid) -> Result<Option<Excursion>, AppError> {
        let excursion = excursions::Entity::find_by_id(id).one(&self.db).await?;
        Ok(excursion.map(Excursion::from))
    }

    async fn rename_excursion(
        &self,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Excursion>, AppError> {
        let Some(excursion) = excursions::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: excursions::ActiveModel = excursion.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(OffsetDateTime::now_utc());
        let updated = active.update(&self.db).await?;
        Ok(Some(Excursion::from(updated)))
    }

    async fn delete_excursion(&self, id: Uuid) -> Result<Option<Excursion>, AppError> {
        let Some(excursion) = excursions::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        excursions::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(Some(Excursion::from(excursion)))
    }

    async fn list_all_excursions(&self) -> Result<Vec<Excursion>, AppError> {
        let excursions = excursions::Entity::find().all(&self.db).await?;
        Ok(excursions.into_iter().map(Excursion::from).collect())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = users::Entity::find().all(&self.db).await?;
        Ok(users.into_iter().map(User::from).collect())
    }
}

// Conversions between SeaORM models and domain models

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            item_refs: model.item_refs,
            excursion_refs: model.excursion_refs,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<excursions::Model> for Excursion {
    fn from(model: excursions::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            item_refs: model.item_refs,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
