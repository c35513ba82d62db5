pub mod extractors;
pub mod moderation;
pub mod submission;
