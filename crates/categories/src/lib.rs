//! `localiz-categories` — the deal/listing taxonomy managed by admins.

pub mod category;
pub mod store;

pub use category::{Category, CategoryKind};
pub use store::CategoryStore;
