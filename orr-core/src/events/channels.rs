//! Event channel factories and handles.

use super::types::NotifyEvent;
use tokio::sync::mpsc;

/// Default buffer size for event channels.
///
/// This provides enough buffer to handle bursts while keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for NotifyEvent events.
pub type NotifyEventSender = mpsc::Sender<NotifyEvent>;
/// Receiver handle for NotifyEvent events.
pub type NotifyEventReceiver = mpsc::Receiver<NotifyEvent>;

/// Create a new NotifyEvent channel.
///
/// Returns a (sender, receiver) pair for NotifyEvent events.
/// Multiple senders can be cloned from the returned sender.
pub fn notify_event_channel() -> (NotifyEventSender, NotifyEventReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
