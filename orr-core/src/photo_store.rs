//! Photo staging and canonical namespaces on object storage.
//!
//! Both namespaces live in one `object_store` backend resolved from a URL
//! (`file://` for on-disk deployments, `memory://` for tests). Keys are
//! derived from the vehicle id:
//!
//! ```text
//! photos/pending/{vehicle_id}   -- awaiting review
//! photos/cars/{vehicle_id}     -- approved, served to the catalog
//! ```

use bytes::Bytes;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use std::sync::Arc;
use uuid::Uuid;

const PENDING_PREFIX: &str = "photos/pending";
const CANONICAL_PREFIX: &str = "photos/cars";

/// Staged and approved photo storage for the registry.
#[derive(Clone)]
pub struct PhotoStore {
    store: Arc<dyn ObjectStore>,
}

impl PhotoStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Resolve a backend from a storage URL (`file:///...`, `memory:///`).
    pub fn from_url(url: &url::Url) -> Result<Self, object_store::Error> {
        let (store, _) = object_store::parse_url(url)?;
        Ok(Self::new(Arc::from(store)))
    }

    /// In-memory backend for tests.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(object_store::memory::InMemory::new()))
    }

    /// Pending-namespace key for a vehicle, as stored in the staging row.
    pub fn pending_key(vehicle_id: Uuid) -> String {
        format!("{PENDING_PREFIX}/{vehicle_id}")
    }

    fn pending_path(vehicle_id: Uuid) -> ObjectPath {
        ObjectPath::from(Self::pending_key(vehicle_id))
    }

    fn canonical_path(vehicle_id: Uuid) -> ObjectPath {
        ObjectPath::from(format!("{CANONICAL_PREFIX}/{vehicle_id}"))
    }

    /// Write submitted bytes into the pending namespace.
    pub async fn put_pending(
        &self,
        vehicle_id: Uuid,
        bytes: Bytes,
    ) -> Result<(), object_store::Error> {
        self.store
            .put(&Self::pending_path(vehicle_id), PutPayload::from(bytes))
            .await?;
        Ok(())
    }

    pub async fn get_pending(&self, vehicle_id: Uuid) -> Result<Bytes, object_store::Error> {
        self.store
            .get(&Self::pending_path(vehicle_id))
            .await?
            .bytes()
            .await
    }

    pub async fn get_canonical(&self, vehicle_id: Uuid) -> Result<Bytes, object_store::Error> {
        self.store
            .get(&Self::canonical_path(vehicle_id))
            .await?
            .bytes()
            .await
    }

    /// Copy the pending object into the canonical namespace.
    ///
    /// The pending copy is left in place; callers delete it with
    /// [`discard_pending`](Self::discard_pending) once the approval is
    /// durable.
    pub async fn promote(&self, vehicle_id: Uuid) -> Result<(), object_store::Error> {
        self.store
            .copy(
                &Self::pending_path(vehicle_id),
                &Self::canonical_path(vehicle_id),
            )
            .await
    }

    /// Delete the pending copy. A leftover after a failed delete is an
    /// orphan, not an inconsistency.
    pub async fn discard_pending(&self, vehicle_id: Uuid) -> Result<(), object_store::Error> {
        self.store.delete(&Self::pending_path(vehicle_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn promote_then_discard_moves_bytes_to_canonical() {
        let photos = PhotoStore::in_memory();
        let vehicle = Uuid::now_v7();
        let bytes = Bytes::from_static(b"jpeg-bytes");

        photos.put_pending(vehicle, bytes.clone()).await.unwrap();
        photos.promote(vehicle).await.unwrap();
        photos.discard_pending(vehicle).await.unwrap();

        assert!(matches!(
            photos.get_pending(vehicle).await,
            Err(object_store::Error::NotFound { .. })
        ));
        assert_eq!(photos.get_canonical(vehicle).await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn pending_read_before_promote() {
        let photos = PhotoStore::in_memory();
        let vehicle = Uuid::now_v7();
        let bytes = Bytes::from_static(b"raw");

        photos.put_pending(vehicle, bytes.clone()).await.unwrap();

        assert_eq!(photos.get_pending(vehicle).await.unwrap(), bytes);
        assert!(matches!(
            photos.get_canonical(vehicle).await,
            Err(object_store::Error::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn promote_without_upload_is_not_found() {
        let photos = PhotoStore::in_memory();
        assert!(matches!(
            photos.promote(Uuid::now_v7()).await,
            Err(object_store::Error::NotFound { .. })
        ));
    }
}
