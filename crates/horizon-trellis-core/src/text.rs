//! Text helpers used by model/view resolution.
//!
//! Plain prefix/suffix checks are `str::starts_with`/`str::ends_with`; what
//! lives here is the small remainder the binding layer actually needs.

/// Case-insensitive string equality.
///
/// Uses full Unicode lowercasing, so `"STRASSE"` does not equal `"strasse"`
/// but `"FOO"` equals `"foo"` and `"ÉTÉ"` equals `"été"`.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.len() == b.len() && a.eq_ignore_ascii_case(b) {
        return true;
    }
    a.to_lowercase() == b.to_lowercase()
}

/// Derives the data key of an attribute name.
///
/// `data-model` reads as the data key `model`; names without the `data-`
/// prefix (or with nothing after it) have no data key.
pub fn data_key(attribute: &str) -> Option<&str> {
    attribute.strip_prefix("data-").filter(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_ignore_case_ascii() {
        assert!(eq_ignore_case("foo", "FOO"));
        assert!(eq_ignore_case("Item", "iTEM"));
        assert!(!eq_ignore_case("foo", "bar"));
    }

    #[test]
    fn test_eq_ignore_case_unicode() {
        assert!(eq_ignore_case("ÉTÉ", "été"));
        assert!(!eq_ignore_case("été", "ete"));
    }

    #[test]
    fn test_data_key() {
        assert_eq!(data_key("data-model"), Some("model"));
        assert_eq!(data_key("data-view"), Some("view"));
        assert_eq!(data_key("model"), None);
        assert_eq!(data_key("data-"), None);
    }
}
