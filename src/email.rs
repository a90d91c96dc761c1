use once_cell::sync::Lazy;
use regex::Regex;

// Deliberately narrow: no dots in the local part, letters only in the domain.
static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*@[A-Za-z]+\.[A-Za-z]{2,}$").ok());

/// Check a parent contact address against the school's address rule.
///
/// The whole string must match, so trailing text after an otherwise valid
/// address is rejected.
pub fn is_valid(email: &str) -> bool {
    (*EMAIL_PATTERN)
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}
