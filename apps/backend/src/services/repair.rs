//! Consistency repair for the users/excursions link.
//!
//! The synchronizer's two-step writes can strand records on either side:
//! an excursion created whose owner vanished before the ref landed, or a ref
//! whose excursion was deleted out from under it. This pass restores the
//! invariant in two sweeps:
//!
//! 1. refs pointing at no excursion are removed from their user's list;
//! 2. excursions referenced by no user are deleted, but only once they are
//!    older than a grace period, so an in-flight create whose append has not
//!    landed yet cannot be swept.
//!
//! Best-effort by design: the whole-list rewrite in sweep 1 can race a
//! concurrent writer, and anything missed is caught on the next run.

use std::collections::HashSet;
use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tracing::{error, info};
use uuid::Uuid;

use crate::repos::ownership::OwnershipStore;
use crate::AppError;

/// Orphaned excursions younger than this are left alone.
pub const DEFAULT_ORPHAN_GRACE: Duration = Duration::hours(1);

#[derive(Debug, Default, PartialEq)]
pub struct RepairReport {
    pub dangling_refs_removed: usize,
    pub orphan_excursions_removed: usize,
}

impl RepairReport {
    pub fn changed(&self) -> bool {
        self.dangling_refs_removed > 0 || self.orphan_excursions_removed > 0
    }
}

/// Run one repair pass over the whole store.
pub async fn repair(
    store: &dyn OwnershipStore,
    orphan_grace: Duration,
) -> Result<RepairReport, AppError> {
    let users = store.list_users().await?;
    let excursions = store.list_all_excursions().await?;

    let existing: HashSet<Uuid> = excursions.iter().map(|e| e.id).collect();
    let mut referenced: HashSet<Uuid> = HashSet::new();
    let mut report = RepairReport::default();

    for user in users {
        let kept: Vec<Uuid> = user
            .excursion_refs
            .iter()
            .copied()
            .filter(|r| existing.contains(r))
            .collect();
        referenced.extend(kept.iter().copied());

        let dropped = user.excursion_refs.len() - kept.len();
        if dropped > 0
            && store
                .update_user_excursion_refs(user.id, kept)
                .await?
                .is_some()
        {
            report.dangling_refs_removed += dropped;
        }
    }

    let cutoff = OffsetDateTime::now_utc() - orphan_grace;
    for excursion in excursions {
        if !referenced.contains(&excursion.id)
            && excursion.created_at < cutoff
            && store.delete_excursion(excursion.id).await?.is_some()
        {
            report.orphan_excursions_removed += 1;
        }
    }

    if report.changed() {
        info!(
            dangling_refs_removed = report.dangling_refs_removed,
            orphan_excursions_removed = report.orphan_excursions_removed,
            "consistency repair applied"
        );
    }

    Ok(report)
}

/// Spawn the periodic repair task. Call once at startup.
pub fn spawn_periodic(
    store: Arc<dyn OwnershipStore>,
    every: std::time::Duration,
    orphan_grace: Duration,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            if let Err(e) = repair(store.as_ref(), orphan_grace).await {
                error!(error = %e, "consistency repair pass failed");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use super::{repair, RepairReport};
    use crate::adapters::ownership_memory::MemoryOwnershipStore;
    use crate::repos::ownership::{Excursion, OwnershipStore};

    fn aged_excursion(name: &str, age: Duration) -> Excursion {
        let stamp = OffsetDateTime::now_utc() - age;
        Excursion {
            id: Uuid::new_v4(),
            name: name.to_string(),
            item_refs: Vec::new(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[tokio::test]
    async fn removes_dangling_refs() {
        let store = MemoryOwnershipStore::new();
        let user = store.insert_user("Zee", "Canyon", "zee@example.com");
        let kept = store.create_excursion("Zion").await.unwrap();
        store.append_excursion_ref(user.id, kept.id).await.unwrap();
        store
            .append_excursion_ref(user.id, Uuid::new_v4())
            .await
            .unwrap();

        let report = repair(&store, Duration::hours(1)).await.unwrap();

        assert_eq!(report.dangling_refs_removed, 1);
        let user = store.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(user.excursion_refs, vec![kept.id]);
    }

    #[tokio::test]
    async fn deletes_only_aged_orphans() {
        let store = MemoryOwnershipStore::new();
        let old_orphan = aged_excursion("Forgotten", Duration::hours(2));
        let fresh_orphan = aged_excursion("InFlight", Duration::minutes(1));
        store.insert_excursion(old_orphan.clone());
        store.insert_excursion(fresh_orphan.clone());

        let report = repair(&store, Duration::hours(1)).await.unwrap();

        assert_eq!(report.orphan_excursions_removed, 1);
        assert!(store.get_excursion(old_orphan.id).await.unwrap().is_none());
        assert!(store
            .get_excursion(fresh_orphan.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn consistent_store_is_untouched() {
        let store = MemoryOwnershipStore::new();
        let user = store.insert_user("Zee", "Canyon", "zee@example.com");
        let excursion = store.create_excursion("Zion").await.unwrap();
        store
            .append_excursion_ref(user.id, excursion.id)
            .await
            .unwrap();

        let report = repair(&store, Duration::ZERO).await.unwrap();

        assert_eq!(report, RepairReport::default());
        let user = store.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(user.excursion_refs, vec![excursion.id]);
        assert!(store.get_excursion(excursion.id).await.unwrap().is_some());
    }
}
