//! Avatar URL resolution for forum avatar templates.

use crate::constants::snapshots::{AVATAR_SIZE, AVATAR_SIZE_PLACEHOLDER};

/// Resolve a forum avatar template into a fetchable URL
///
/// Every `{size}` placeholder becomes [`AVATAR_SIZE`]. Templates carrying a
/// scheme are used as-is; anything else is joined onto `forum_url`. A missing
/// or blank template resolves to an empty string.
pub fn resolve_avatar_url(template: Option<&str>, forum_url: &str) -> String {
    let Some(template) = template.map(str::trim).filter(|t| !t.is_empty()) else {
        return String::new();
    };

    let sized = template.replace(AVATAR_SIZE_PLACEHOLDER, &AVATAR_SIZE.to_string());
    if is_absolute(&sized) {
        return sized;
    }

    if sized.starts_with('/') {
        format!("{}{}", forum_url.trim_end_matches('/'), sized)
    } else {
        format!("{forum_url}{sized}")
    }
}

/// Protocol-relative, or led by an RFC 3986 scheme (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`)
fn is_absolute(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
