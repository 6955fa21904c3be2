//! The ownership store: users, excursions, and the reference list that ties
//! them together.
//!
//! Two logically separate collections with a manual referential link:
//! `users.excursion_refs` holds the ids of the excursions a user owns, and
//! nothing at the storage layer enforces that those ids exist. Keeping the
//! link honest is the synchronizer's job (`services::excursions`), with
//! `services::repair` as the backstop.

use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::AppError;

/// User domain model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Item records the user owns; the item entity itself lives elsewhere.
    pub item_refs: Vec<Uuid>,
    /// Owned excursions, in insertion order. Insertion order is display order.
    pub excursion_refs: Vec<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Excursion domain model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Excursion {
    pub id: Uuid,
    pub name: String,
    pub item_refs: Vec<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// What an authenticated caller gets back after any excursion operation:
/// the owning user's profile with every excursion ref expanded to its record.
/// Always assembled from a fresh post-mutation read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub first_name: String,
    pub last_name: String,
    pub items: Vec<Uuid>,
    pub excursions: Vec<Excursion>,
}

/// Abstract persistence interface consumed by the excursion synchronizer.
///
/// Every method is a single logical operation on one collection; there is no
/// multi-collection transaction primitive, and no method enforces the
/// cross-entity invariant. Absence is `Ok(None)`, anything else that goes
/// wrong is a storage failure.
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Whole-list overwrite of a user's excursion refs. Used by the repair
    /// pass only; the hot paths use the atomic append/remove primitives below
    /// to avoid losing concurrent updates.
    async fn update_user_excursion_refs(
        &self,
        id: Uuid,
        refs: Vec<Uuid>,
    ) -> Result<Option<User>, AppError>;

    /// Atomically append one excursion id at the end of the user's ref list.
    /// Returns the updated user, or `None` if no such user exists.
    async fn append_excursion_ref(
        &self,
        id: Uuid,
        excursion_id: Uuid,
    ) -> Result<Option<User>, AppError>;

    /// Atomically remove every exact-match occurrence of the id from the
    /// user's ref list. Removing an id that is not present is a silent no-op.
    async fn remove_excursion_ref(
        &self,
        id: Uuid,
        excursion_id: Uuid,
    ) -> Result<Option<User>, AppError>;

    async fn create_excursion(&self, name: &str) -> Result<Excursion, AppError>;

    async fn get_excursion(&self, id: Uuid) -> Result<Option<Excursion>, AppError>;

    async fn rename_excursion(&self, id: Uuid, name: &str)
        -> Result<Option<Excursion>, AppError>;

    /// Delete and return the excursion, or `None` if it was already gone.
    async fn delete_excursion(&self, id: Uuid) -> Result<Option<Excursion>, AppError>;

    async fn list_all_excursions(&self) -> Result<Vec<Excursion>, AppError>;

    /// Full user scan for the consistency-repair pass.
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
}
