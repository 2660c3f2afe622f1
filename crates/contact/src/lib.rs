//! `localiz-contact` — contact-form messages and their admin inbox.

pub mod message;
pub mod store;

pub use message::{ContactDraft, ContactMessage};
pub use store::ContactMessageStore;
