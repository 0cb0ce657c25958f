use lazy_static::lazy_static;
use regex::Regex;
use time::{format_description::FormatItem, macros::format_description, Date};

use crate::error::ApiError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Stored-data sanitization: trim plus HTML-escape. Applied before any text
/// reaches the database, since the JSON API is consumed directly as well as
/// rendered into pages.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.trim().chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A required text field: sanitized, and rejected when empty after trimming.
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, ApiError> {
    let v = value.map(sanitize).unwrap_or_default();
    if v.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(v)
}

pub fn parse_date(field: &str, value: &str) -> Result<Date, ApiError> {
    Date::parse(value.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::validation(format!("Invalid {field} format. Use YYYY-MM-DD")))
}

pub fn require_email(value: Option<&str>) -> Result<String, ApiError> {
    let email = value.unwrap_or("").trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Invalid email format"));
    }
    Ok(email)
}

pub fn require_link(value: Option<&str>) -> Result<String, ApiError> {
    let link = value.unwrap_or("").trim().to_string();
    if !(link.starts_with("http://") || link.starts_with("https://"))
        || link.contains(char::is_whitespace)
    {
        return Err(ApiError::validation("link must be an http(s) URL"));
    }
    Ok(link)
}

/// Builds the ILIKE pattern for a user-supplied search term. The term goes
/// through the same escaping as stored text (so `a & b` finds the stored
/// `a &amp; b`) and LIKE metacharacters are escaped so a literal `%` or `_`
/// matches itself instead of acting as a wildcard.
pub fn search_pattern(term: &str) -> String {
    let sanitized = sanitize(term);
    let mut escaped = String::with_capacity(sanitized.len());
    for c in sanitized.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{escaped}%")
}

/// Validated sort direction; anything unrecognized falls back to the
/// resource default. Only these static strings ever reach SQL text.
pub fn sort_order(order: Option<&str>, default_desc: bool) -> &'static str {
    match order.map(|o| o.trim().to_ascii_lowercase()).as_deref() {
        Some("asc") => "ASC",
        Some("desc") => "DESC",
        _ => {
            if default_desc {
                "DESC"
            } else {
                "ASC"
            }
        }
    }
}

/// Parses an `id` query/body parameter, rejecting malformed values with a
/// 400 instead of the framework's plain-text rejection.
pub fn require_id(value: Option<&str>) -> Result<uuid::Uuid, ApiError> {
    let raw = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("id is required"))?;
    raw.parse::<uuid::Uuid>()
        .map_err(|_| ApiError::validation("Invalid id"))
}

/// Sanitizes an optional list of URL-ish strings (assignment files, week
/// links), dropping entries that are empty after trimming.
pub fn sanitize_list(values: Option<Vec<String>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .map(|s| sanitize(s))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_plain_addresses() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("a.b+c@uni.edu"));
    }

    #[test]
    fn email_rejects_garbage() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn sanitize_trims_and_escapes() {
        assert_eq!(
            sanitize("  <script>alert('x')</script>  "),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(sanitize("a & b"), "a &amp; b");
    }

    #[test]
    fn require_text_rejects_whitespace_only() {
        assert!(require_text("title", Some("   ")).is_err());
        assert!(require_text("title", None).is_err());
        assert_eq!(require_text("title", Some(" A1 ")).unwrap(), "A1");
    }

    #[test]
    fn date_parse_round_trip() {
        let d = parse_date("due_date", "2025-11-10").unwrap();
        assert_eq!((d.year(), d.month() as u8, d.day()), (2025, 11, 10));
        assert!(parse_date("due_date", "10/11/2025").is_err());
        assert!(parse_date("due_date", "2025-13-01").is_err());
    }

    #[test]
    fn link_requires_http_scheme() {
        assert!(require_link(Some("https://example.com/x")).is_ok());
        assert!(require_link(Some("ftp://example.com")).is_err());
        assert!(require_link(Some("https://bad url")).is_err());
        assert!(require_link(None).is_err());
    }

    #[test]
    fn sanitize_list_drops_empties() {
        let out = sanitize_list(Some(vec![" a ".into(), "  ".into(), "<b>".into()]));
        assert_eq!(out, vec!["a".to_string(), "&lt;b&gt;".to_string()]);
    }

    #[test]
    fn search_pattern_escapes_like_metacharacters() {
        assert_eq!(search_pattern("50%"), "%50\\%%");
        assert_eq!(search_pattern("a_b"), "%a\\_b%");
        assert_eq!(search_pattern("c:\\tmp"), "%c:\\\\tmp%");
    }

    #[test]
    fn search_pattern_matches_stored_escaping() {
        // Stored text is HTML-escaped, so the search term must be too.
        assert_eq!(search_pattern("a & b"), "%a &amp; b%");
        assert_eq!(search_pattern(" <b> "), "%&lt;b&gt;%");
    }

    #[test]
    fn sort_order_falls_back_to_default() {
        assert_eq!(sort_order(Some("desc"), false), "DESC");
        assert_eq!(sort_order(Some("ASC"), true), "ASC");
        assert_eq!(sort_order(Some("; DROP TABLE students"), false), "ASC");
        assert_eq!(sort_order(None, true), "DESC");
    }

    #[test]
    fn require_id_rejects_missing_and_malformed() {
        assert!(require_id(None).is_err());
        assert!(require_id(Some("  ")).is_err());
        assert!(require_id(Some("123")).is_err());
        let id = uuid::Uuid::new_v4();
        assert_eq!(require_id(Some(&id.to_string())).unwrap(), id);
    }

    #[test]
    fn require_email_lowercases() {
        assert_eq!(
            require_email(Some(" Admin@Example.COM ")).unwrap(),
            "admin@example.com"
        );
    }
}
