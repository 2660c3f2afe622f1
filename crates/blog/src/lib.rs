//! `localiz-blog` — editorial posts shown on the landing page.

pub mod post;
pub mod store;

pub use post::{BlogPost, BlogPostDraft};
pub use store::BlogPostStore;
