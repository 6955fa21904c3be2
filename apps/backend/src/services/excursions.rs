//! Excursion synchronizer.
//!
//! Create and delete touch two collections that the store will not keep
//! consistent for us: the excursion record itself and the owning user's
//! `excursion_refs` list. Both operations run their store calls in a fixed
//! order (excursion mutation first, ref mutation second) so that a failure
//! between the two leaves an orphaned excursion rather than a ref pointing at
//! nothing. An orphan is invisible to readers; a dangling ref breaks the view
//! expansion for its owner on every read. No compensating rollback is
//! attempted, and nothing here retries; `services::repair` sweeps up the
//! leftovers.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{identity, jwt};
use crate::repos::ownership::{Excursion, OwnershipStore, UserView};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

pub struct ExcursionService {
    store: Arc<dyn OwnershipStore>,
    security: SecurityConfig,
}

impl ExcursionService {
    pub fn new(store: Arc<dyn OwnershipStore>, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(Arc::clone(&state.store), state.security.clone())
    }

    /// Verify the token and resolve it to a user id. Fails before any store
    /// write is attempted, so a bad token can never mutate either collection.
    fn authenticate(&self, token: &str) -> Result<Uuid, AppError> {
        let claims = jwt::verify_access_token(token, &self.security)?;
        identity::resolve(&claims)
    }

    /// Create an excursion owned by the token's subject and return the
    /// owner's refreshed view.
    ///
    /// Duplicate names are allowed; identity is the generated id only.
    pub async fn create_excursion(&self, token: &str, name: &str) -> Result<UserView, AppError> {
        let user_id = self.authenticate(token)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request(
                "INVALID_NAME",
                "Excursion name must not be empty".to_string(),
            ));
        }

        let excursion = self.store.create_excursion(name).await?;

        let appended = self
            .store
            .append_excursion_ref(user_id, excursion.id)
            .await?;
        if appended.is_none() {
            // The excursion record exists but no user now owns it. Accepted
            // orphan risk of the two-step write; the repair pass removes it.
            warn!(
                user_id = %user_id,
                excursion_id = %excursion.id,
                "user vanished after excursion create; record left orphaned"
            );
            return Err(AppError::unauthorized_user_not_found());
        }

        info!(user_id = %user_id, excursion_id = %excursion.id, name, "excursion created");
        self.view_for(user_id).await
    }

    /// Delete an excursion and detach it from the token's subject, returning
    /// the owner's refreshed view.
    ///
    /// If the owner's list never held the id, the detach is a silent no-op.
    pub async fn delete_excursion(
        &self,
        token: &str,
        excursion_id: Uuid,
    ) -> Result<UserView, AppError> {
        let user_id = self.authenticate(token)?;

        let deleted = self
            .store
            .delete_excursion(excursion_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "EXCURSION_NOT_FOUND",
                    format!("No excursion with id {excursion_id}"),
                )
            })?;

        let updated = self.store.remove_excursion_ref(user_id, deleted.id).await?;
        if updated.is_none() {
            // Mirror of the create-path orphan: the record is gone but some
            // other user's list may still hold the ref.
            warn!(
                user_id = %user_id,
                excursion_id = %deleted.id,
                "user vanished after excursion delete; stale refs may remain"
            );
            return Err(AppError::unauthorized_user_not_found());
        }

        info!(user_id = %user_id, excursion_id = %deleted.id, "excursion deleted");
        self.view_for(user_id).await
    }

    /// Rename an excursion. Touches only the excursion collection, so the
    /// ownership link cannot break; the caller still has to present a valid
    /// token.
    pub async fn rename_excursion(
        &self,
        token: &str,
        excursion_id: Uuid,
        name: &str,
    ) -> Result<Excursion, AppError> {
        self.authenticate(token)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request(
                "INVALID_NAME",
                "Excursion name must not be empty".to_string(),
            ));
        }

        let renamed = self
            .store
            .rename_excursion(excursion_id, name)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "EXCURSION_NOT_FOUND",
                    format!("No excursion with id {excursion_id}"),
                )
            })?;

        info!(excursion_id = %renamed.id, name, "excursion renamed");
        Ok(renamed)
    }

    /// The authenticated caller's current view: profile fields plus every
    /// owned excursion expanded to its record.
    pub async fn user_view(&self, token: &str) -> Result<UserView, AppError> {
        let user_id = self.authenticate(token)?;
        self.view_for(user_id).await
    }

    /// Fresh read of the post-mutation state. Responses are never assembled
    /// from in-memory values, so sibling data cannot be stale.
    async fn view_for(&self, user_id: Uuid) -> Result<UserView, AppError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(AppError::unauthorized_user_not_found)?;

        let mut excursions = Vec::with_capacity(user.excursion_refs.len());
        for ref_id in &user.excursion_refs {
            match self.store.get_excursion(*ref_id).await? {
                Some(excursion) => excursions.push(excursion),
                None => {
                    // Transient with the write ordering above; repair removes it.
                    warn!(
                        user_id = %user_id,
                        excursion_id = %ref_id,
                        "skipping dangling excursion ref during view expansion"
                    );
                }
            }
        }

        Ok(UserView {
            first_name: user.first_name,
            last_name: user.last_name,
            items: user.item_refs,
            excursions,
        })
    }
}
