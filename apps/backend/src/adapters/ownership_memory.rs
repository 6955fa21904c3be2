//! In-process ownership store.
//!
//! Backs the test suites and local development without Postgres. The trait
//! contract is the same as the SeaORM adapter's, including the deliberate
//! absence of any cross-collection guarantees.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::repos::ownership::{Excursion, OwnershipStore, User};
use crate::AppError;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    excursions: HashMap<Uuid, Excursion>,
}

#[derive(Default)]
pub struct MemoryOwnershipStore {
    inner: RwLock<Inner>,
}

impl MemoryOwnershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user with empty ref lists. Returns the created record.
    pub fn insert_user(&self, first_name: &str, last_name: &str, email: &str) -> User {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            item_refs: Vec::new(),
            excursion_refs: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.inner.write().users.insert(user.id, user.clone());
        user
    }

    /// Seed an excursion record as-is, timestamps included. Lets tests stage
    /// orphaned or aged records directly.
    pub fn insert_excursion(&self, excursion: Excursion) {
        self.inner
            .write()
            .excursions
            .insert(excursion.id, excursion);
    }

    /// Drop a user record outright, leaving whatever it referenced behind.
    pub fn remove_user(&self, id: Uuid) {
        self.inner.write().users.remove(&id);
    }
}

#[async_trait]
impl OwnershipStore for MemoryOwnershipStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().users.get(&id).cloned())
    }

    async fn update_user_excursion_refs(
        &self,
        id: Uuid,
        refs: Vec<Uuid>,
    ) -> Result<Option<User>, AppError> {
        let mut inner = self.inner.write();
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        user.excursion_refs = refs;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn append_excursion_ref(
        &self,
        id: Uuid,
        excursion_id: Uuid,
    ) -> Result<Option<User>, AppError> {
        let mut inner = self.inner.write();
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        user.excursion_refs.push(excursion_id);
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn remove_excursion_ref(
        &self,
        id: Uuid,
        excursion_id: Uuid,
    ) -> Result<Option<User>, AppError> {
        let mut inner = self.inner.write();
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        user.excursion_refs.retain(|r| *r != excursion_id);
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn create_excursion(&self, name: &str) -> Result<Excursion, AppError> {
        let now = OffsetDateTime::now_utc();
        let excursion = Excursion {
            id: Uuid::new_v4(),
            name: name.to_string(),
            item_refs: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .excursions
            .insert(excursion.id, excursion.clone());
        Ok(excursion)
    }

    async fn get_excursion(&self, id: Uuid) -> Result<Option<Excursion>, AppError> {
        Ok(self.inner.read().excursions.get(&id).cloned())
    }

    async fn rename_excursion(
        &self,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Excursion>, AppError> {
        let mut inner = self.inner.write();
        let Some(excursion) = inner.excursions.get_mut(&id) else {
            return Ok(None);
        };
        excursion.name = name.to_string();
        excursion.updated_at = OffsetDateTime::now_utc();
        Ok(Some(excursion.clone()))
    }

    async fn delete_excursion(&self, id: Uuid) -> Result<Option<Excursion>, AppError> {
        Ok(self.inner.write().excursions.remove(&id))
    }

    async fn list_all_excursions(&self) -> Result<Vec<Excursion>, AppError> {
        Ok(self.inner.read().excursions.values().cloned().collect())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.inner.read().users.values().cloned().collect())
    }
}
