//! Registration input validation: forbidden words, birthday parsing, age.

use chrono::NaiveDate;

/// Minimum age to register, in years.
pub const MIN_AGE: i32 = 16;

const DEFAULT_WORDS: &[&str] = &[
    "admin",
    "moderateur",
    "localiz",
    "merde",
    "putain",
    "connard",
    "connasse",
    "salope",
    "encule",
    "batard",
    "pute",
];

/// Moderation word list for usernames and display names.
///
/// Usernames are rejected on a case-insensitive *substring* match (handles
/// `xX_admin_Xx`); first/last names only on a whole-word match, since family
/// names legitimately contain short word fragments.
#[derive(Debug, Clone)]
pub struct ForbiddenWords {
    words: Vec<String>,
}

impl Default for ForbiddenWords {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl ForbiddenWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(|w| w.into().to_lowercase()).collect(),
        }
    }

    /// Case-insensitive substring match (username rule).
    pub fn contains_substring(&self, input: &str) -> bool {
        let haystack = input.to_lowercase();
        self.words.iter().any(|w| haystack.contains(w.as_str()))
    }

    /// Case-insensitive whole-word match (name rule). Words are delimited by
    /// any non-alphanumeric character.
    pub fn contains_word(&self, input: &str) -> bool {
        let lowered = input.to_lowercase();
        lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .any(|part| self.words.iter().any(|w| w == part))
    }
}

/// Parse a birthday in ISO (`1990-05-17`) or French (`17/05/1990`) form.
pub fn parse_birthday(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

/// Full years elapsed between `birthday` and `today`.
pub fn age_on(birthday: NaiveDate, today: NaiveDate) -> i32 {
    use chrono::Datelike;

    let mut age = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        age -= 1;
    }
    age
}

/// Loose email shape check: one `@` with a dotted domain after it. Real
/// validation is the verification email itself.
pub fn looks_like_email(raw: &str) -> bool {
    let raw = raw.trim();
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !raw.contains(char::is_whitespace)
        }
        None => false,
    }
}
