//! Explicit normalization functions invoked by write paths before persistence.
//!
//! These replace implicit save-time hooks: every entity constructor or
//! orchestrator calls the function it needs, so normalization is visible at
//! the call site.

/// Lowercase and trim an email address.
pub fn email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trim free text (descriptions, messages).
pub fn text(raw: &str) -> String {
    raw.trim().to_string()
}

/// Capitalize the first letter of each whitespace-separated word, lowercasing
/// the rest ("jean-PIERRE dupont" → "Jean-pierre Dupont").
pub fn capitalize_name(raw: &str) -> String {
    raw.trim()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
