//! `localiz-users` — the account lifecycle.
//!
//! The centerpiece is the two-store registration flow: a submission creates a
//! [`PendingRegistration`] that only becomes an [`ActiveUser`] once the emailed
//! verification token comes back. Pending rows expire after a TTL; expiry frees
//! the username and email for a fresh attempt.
//!
//! Storage and mail sit behind traits so the orchestrators stay deterministic
//! under test.

pub mod account;
pub mod credentials;
pub mod error;
pub mod pending;
pub mod profile;
pub mod registration;
pub mod store;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;

pub use account::{ActiveUser, PublicUser};
pub use credentials::{AccountService, AuthError, Session};
pub use error::RegistrationError;
pub use pending::PendingRegistration;
pub use profile::Profile;
pub use registration::{
    ConfirmedAccount, RegisterInput, RegistrationConfig, RegistrationReceipt, RegistrationService,
};
pub use store::{ActiveUserStore, PendingRegistrationStore, StoreError};
pub use validate::{ForbiddenWords, MIN_AGE};
