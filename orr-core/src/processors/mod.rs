mod notifier;

pub use notifier::{EmailMessage, Notifier, NotifierConfig, NotifyError, build_message};
