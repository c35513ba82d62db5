//! Application state shared across all request handlers.

use crate::config::runtime::SharedConfig;
use orr_core::events::NotifyEventSender;
use orr_core::photo_store::PhotoStore;
use orr_core::reconcile::Reconciler;
use sqlx::PgPool;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// The approve/reject engine.
    pub reconciler: Arc<Reconciler>,
    /// Photo staging storage.
    pub photos: PhotoStore,
    /// Queue for best-effort outbound notifications.
    pub notify_tx: NotifyEventSender,
}
