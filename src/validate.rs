//! Small input validators used by the request handlers.
//!
//! Validation failures are collected as `{path, message}` pairs so a single
//! response can report every failed field at once.

/// Loose email shape check: one `@` with a non-empty local part and a domain
/// containing a dot.
pub fn is_valid_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !value.contains(char::is_whitespace)
}

/// URL shape check for redirect targets: http(s) scheme and a non-empty host.
pub fn is_valid_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}
