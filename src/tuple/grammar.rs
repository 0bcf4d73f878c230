//! Lexical rules for namespaces, object ids and relations.
//!
//! The length and character-class bounds are a compatibility contract with
//! tuples already persisted by backends. Do not relax or tighten them.

use std::sync::LazyLock;

use regex::Regex;

/// The reserved subject relation meaning "the subject itself".
pub const ELLIPSIS: &str = "...";

const NAMESPACE_EXPR: &str = "(?:[a-z][a-z0-9_]{1,60}[a-z0-9]/)?[a-z][a-z0-9_]{1,61}[a-z0-9]";
const OBJECT_ID_EXPR: &str = "[a-zA-Z0-9_][a-zA-Z0-9/_-]{0,127}";
const RELATION_EXPR: &str = "[a-z][a-z0-9_]{1,61}[a-z0-9]";

fn onr_expr() -> String {
    [
        format!("(?P<resource_type>{NAMESPACE_EXPR})"),
        format!(":(?P<resource_id>{OBJECT_ID_EXPR})"),
        format!("#(?P<resource_rel>{RELATION_EXPR})"),
    ]
    .concat()
}

fn subject_expr() -> String {
    [
        format!("(?P<subject_type>{NAMESPACE_EXPR})"),
        format!(":(?P<subject_id>{OBJECT_ID_EXPR})"),
        format!(r"(?:#(?P<subject_rel>{RELATION_EXPR}|\.\.\.))?"),
    ]
    .concat()
}

// The expressions are compile-time constants covered by the tests below.
#[allow(clippy::expect_used)]
fn anchored(expr: &str) -> Regex {
    Regex::new(&format!("^{expr}$")).expect("tuple grammar expression must compile")
}

pub(crate) static NAMESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| anchored(NAMESPACE_EXPR));
pub(crate) static OBJECT_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| anchored(OBJECT_ID_EXPR));
pub(crate) static RELATION_REGEX: LazyLock<Regex> = LazyLock::new(|| anchored(RELATION_EXPR));

pub(crate) static ONR_REGEX: LazyLock<Regex> = LazyLock::new(|| anchored(&onr_expr()));
pub(crate) static SUBJECT_REGEX: LazyLock<Regex> = LazyLock::new(|| anchored(&subject_expr()));
pub(crate) static TUPLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| anchored(&format!("{}@{}", onr_expr(), subject_expr())));

/// Returns `true` if `value` is a valid namespace, with or without a tenant prefix.
///
/// ```rust
/// use inferadb_tuple::tuple::is_valid_namespace;
///
/// assert!(is_valid_namespace("document"));
/// assert!(is_valid_namespace("acme/document"));
/// assert!(!is_valid_namespace("Document"));
/// ```
pub fn is_valid_namespace(value: &str) -> bool {
    NAMESPACE_REGEX.is_match(value)
}

/// Returns `true` if `value` is a valid object id.
pub fn is_valid_object_id(value: &str) -> bool {
    OBJECT_ID_REGEX.is_match(value)
}

/// Returns `true` if `value` is a valid relation name.
///
/// The wildcard is not a relation name; see [`is_valid_subject_relation`].
pub fn is_valid_relation(value: &str) -> bool {
    RELATION_REGEX.is_match(value)
}

/// Returns `true` if `value` is a relation name or the wildcard.
pub fn is_valid_subject_relation(value: &str) -> bool {
    value == ELLIPSIS || is_valid_relation(value)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("document" ; "plain")]
    #[test_case("doc" ; "shortest")]
    #[test_case("user_group" ; "underscore")]
    #[test_case("acme/document" ; "tenant prefix")]
    #[test_case("org_1/team2" ; "tenant with digits")]
    fn test_valid_namespace(value: &str) {
        assert!(is_valid_namespace(value));
    }

    #[test_case("" ; "empty")]
    #[test_case("do" ; "too short")]
    #[test_case("Document" ; "uppercase")]
    #[test_case("1doc" ; "leading digit")]
    #[test_case("doc_" ; "trailing underscore")]
    #[test_case("a/document" ; "tenant too short")]
    #[test_case("acme/" ; "tenant without name")]
    #[test_case("acme/team/doc" ; "two tenants")]
    fn test_invalid_namespace(value: &str) {
        assert!(!is_valid_namespace(value));
    }

    #[test]
    fn test_namespace_length_bounds() {
        let longest = format!("a{}b", "c".repeat(61));
        assert_eq!(longest.len(), 63);
        assert!(is_valid_namespace(&longest));

        let too_long = format!("a{}b", "c".repeat(62));
        assert!(!is_valid_namespace(&too_long));

        let longest_tenant = format!("t{}t/doc", "e".repeat(60));
        assert!(is_valid_namespace(&longest_tenant));

        let too_long_tenant = format!("t{}t/doc", "e".repeat(61));
        assert!(!is_valid_namespace(&too_long_tenant));
    }

    #[test_case("1" ; "single digit")]
    #[test_case("_" ; "single underscore")]
    #[test_case("abc-DEF/123_x" ; "mixed")]
    #[test_case("user_123" ; "underscore")]
    fn test_valid_object_id(value: &str) {
        assert!(is_valid_object_id(value));
    }

    #[test_case("" ; "empty")]
    #[test_case("-abc" ; "leading dash")]
    #[test_case("/abc" ; "leading slash")]
    #[test_case("abc def" ; "space")]
    #[test_case("abc#def" ; "hash")]
    #[test_case("abc:def" ; "colon")]
    fn test_invalid_object_id(value: &str) {
        assert!(!is_valid_object_id(value));
    }

    #[test]
    fn test_object_id_length_bounds() {
        assert!(is_valid_object_id(&"a".repeat(128)));
        assert!(!is_valid_object_id(&"a".repeat(129)));
    }

    #[test_case("viewer" ; "plain")]
    #[test_case("can_view2" ; "underscore and digit")]
    #[test_case("rel" ; "shortest")]
    fn test_valid_relation(value: &str) {
        assert!(is_valid_relation(value));
    }

    #[test_case("" ; "empty")]
    #[test_case("re" ; "too short")]
    #[test_case("Viewer" ; "uppercase")]
    #[test_case("viewer_" ; "trailing underscore")]
    #[test_case("..." ; "wildcard")]
    fn test_invalid_relation(value: &str) {
        assert!(!is_valid_relation(value));
    }

    #[test]
    fn test_relation_length_bounds() {
        assert!(is_valid_relation(&format!("r{}n", "e".repeat(61))));
        assert!(!is_valid_relation(&format!("r{}n", "e".repeat(62))));
    }

    #[test]
    fn test_subject_relation_accepts_wildcard() {
        assert!(is_valid_subject_relation(ELLIPSIS));
        assert!(is_valid_subject_relation("member"));
        assert!(!is_valid_subject_relation(".."));
        assert!(!is_valid_subject_relation(""));
    }

    #[test]
    fn test_composite_expressions_compile() {
        assert!(ONR_REGEX.is_match("document:readme#viewer"));
        assert!(SUBJECT_REGEX.is_match("user:alice"));
        assert!(TUPLE_REGEX.is_match("document:readme#viewer@user:alice#..."));
    }
}
