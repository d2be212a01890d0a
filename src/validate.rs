//! Validation helpers for identity fields arriving through login callbacks.
//!
//! Claims decoded from a token are advisory; the signup flow checks them
//! before trusting them enough to prefill forms or address the user.

/// Nickname length bounds (in characters, not bytes)
const NICKNAME_MIN_CHARS: usize = 2;
const NICKNAME_MAX_CHARS: usize = 20;

/// Validate that a string looks like a plausible email address.
/// Local part, one `@`, and a dotted domain with a 2+ letter TLD.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.contains('@') {
        return false;
    }
    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !name.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Validate a nickname: 2 to 20 characters
pub fn is_valid_nickname(nickname: &str) -> bool {
    let count = nickname.chars().count();
    (NICKNAME_MIN_CHARS..=NICKNAME_MAX_CHARS).contains(&count)
}

/// Validate that a string looks like a valid UUID.
/// UUIDs are 36 characters with dashes: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
pub fn is_valid_uuid(s: &str) -> bool {
    if s.len() != 36 {
        return false;
    }
    s.chars().enumerate().all(|(i, c)| {
        if i == 8 || i == 13 || i == 18 || i == 23 {
            c == '-'
        } else {
            c.is_ascii_hexdigit()
        }
    })
}
