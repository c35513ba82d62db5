//! Event type definitions for outbound notifications.
//!
//! Events are idempotent and ephemeral. They carry identifiers rather than
//! full data; the notifier fetches nothing and formats nothing, since
//! message rendering belongs to the email provider.

use crate::entities::ChangeKind;
use uuid::Uuid;

/// Events that trigger an outbound email.
#[derive(Debug, Clone)]
pub enum NotifyEvent {
    /// A new submission landed in the pending store; operators are told so
    /// the moderation queue does not go stale.
    SubmissionReceived {
        kind: ChangeKind,
        pending_id: Uuid,
    },
    /// A submission was approved; the submitter is told when resolvable.
    SubmissionApproved {
        kind: ChangeKind,
        pending_id: Uuid,
        recipient: String,
    },
}
