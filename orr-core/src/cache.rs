//! Derived read cache for catalog pages.
//!
//! The read layer (an external collaborator) renders vehicle detail and
//! summary payloads and caches them here under string keys of the form
//! `"cars:<purpose>:<vehicle_id>"`. Reconciliation only ever *deletes*
//! entries: invalidation is coarse, whole-entity, and a missing key is
//! not an error.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const ENTITY: &str = "cars";

/// Cache purposes with a key per vehicle.
const PURPOSES: [&str; 2] = ["details", "summary"];

/// JSON-valued key-value cache with a provider-defined TTL.
#[derive(Clone)]
pub struct DerivedCache {
    inner: moka::future::Cache<String, Arc<serde_json::Value>>,
}

impl DerivedCache {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        Self {
            inner: moka::future::Cache::builder()
                .time_to_live(ttl)
                .max_capacity(capacity)
                .build(),
        }
    }

    fn key(purpose: &str, vehicle_id: Uuid) -> String {
        format!("{ENTITY}:{purpose}:{vehicle_id}")
    }

    pub async fn get(&self, purpose: &str, vehicle_id: Uuid) -> Option<Arc<serde_json::Value>> {
        self.inner.get(&Self::key(purpose, vehicle_id)).await
    }

    pub async fn put(&self, purpose: &str, vehicle_id: Uuid, value: serde_json::Value) {
        self.inner
            .insert(Self::key(purpose, vehicle_id), Arc::new(value))
            .await;
    }

    /// Drop every derived entry for a vehicle.
    pub async fn invalidate_vehicle(&self, vehicle_id: Uuid) {
        for purpose in PURPOSES {
            self.inner.invalidate(&Self::key(purpose, vehicle_id)).await;
        }
        tracing::debug!(vehicle_id = %vehicle_id, "invalidated derived cache entries");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> DerivedCache {
        DerivedCache::new(Duration::from_secs(60), 1024)
    }

    #[tokio::test]
    async fn invalidate_removes_all_purposes() {
        let cache = cache();
        let id = Uuid::now_v7();
        cache.put("details", id, serde_json::json!({"vin": "X"})).await;
        cache.put("summary", id, serde_json::json!({"vin": "X"})).await;

        cache.invalidate_vehicle(id).await;

        assert!(cache.get("details", id).await.is_none());
        assert!(cache.get("summary", id).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_missing_key_is_not_an_error() {
        let cache = cache();
        cache.invalidate_vehicle(Uuid::now_v7()).await;
    }

    #[tokio::test]
    async fn other_vehicles_survive_invalidation() {
        let cache = cache();
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        cache.put("details", a, serde_json::json!(1)).await;
        cache.put("details", b, serde_json::json!(2)).await;

        cache.invalidate_vehicle(a).await;

        assert!(cache.get("details", a).await.is_none());
        assert_eq!(
            cache.get("details", b).await.as_deref(),
            Some(&serde_json::json!(2))
        );
    }
}
