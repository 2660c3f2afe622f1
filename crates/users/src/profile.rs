use serde::{Deserialize, Serialize};

/// Optional profile fields collected at registration.
///
/// Names are normalized (capitalized) before storage; everything here is
/// safe to expose in the public projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub gender: Option<String>,
}
