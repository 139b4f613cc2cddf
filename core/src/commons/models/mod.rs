pub mod badge;
pub mod event;

pub use badge::{BadgeContent, BadgeRecord, CertificateMetadata};
pub use event::KnownEvent;
