//! Streak number prefix for player names in chat.
//!
//! The text-decoration layer renders `<col=ffd700>12</col> Name`. Re-applying
//! replaces a previously injected prefix instead of stacking another one.

/// Prefix for `streak`, empty below 1.
pub fn streak_prefix(streak: u32, color: &str) -> String {
    if streak < 1 {
        return String::new();
    }
    format!("<col={color}>{streak}</col> ")
}

/// Remove one leading `<col=..>N</col> ` prefix if present.
pub fn strip_streak_prefix(name: &str) -> &str {
    let Some(rest) = name.strip_prefix("<col=") else {
        return name;
    };
    let Some(close) = rest.find('>') else {
        return name;
    };
    if !rest[..close].chars().all(|c| c.is_ascii_hexdigit()) {
        return name;
    }
    let body = &rest[close + 1..];
    let digits = body.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return name;
    }
    body[digits..].strip_prefix("</col> ").unwrap_or(name)
}

/// Prefix `name` with the current streak.
pub fn decorate_name(name: &str, streak: u32, color: &str) -> String {
    let bare = strip_streak_prefix(name);
    format!("{}{}", streak_prefix(streak, color), bare)
}
