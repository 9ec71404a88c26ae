//! Query string assembly.

use indexmap::IndexMap;

use crate::clients::http_request::QueryValue;

/// Appends `query` to `path` as a percent-encoded query string.
///
/// Pairs keep their insertion order. The separator is `?`, or `&` when the
/// path already carries a query. An empty mapping returns the path as-is.
///
/// # Example
///
/// ```rust
/// use indexmap::IndexMap;
/// use rest_dispatch::clients::{append_query, QueryValue};
///
/// let mut query = IndexMap::new();
/// query.insert("a".to_string(), QueryValue::from("1"));
/// query.insert("b".to_string(), QueryValue::from("x y"));
///
/// assert_eq!(append_query("/items", &query), "/items?a=1&b=x%20y");
/// ```
#[must_use]
pub fn append_query(path: &str, query: &IndexMap<String, QueryValue>) -> String {
    if query.is_empty() {
        return path.to_string();
    }

    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{}", encode_pairs(query))
}

/// Encodes `key=value` pairs joined by `&`, percent-encoding both sides.
fn encode_pairs(query: &IndexMap<String, QueryValue>) -> String {
    query
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, QueryValue)]) -> IndexMap<String, QueryValue> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_empty_query_returns_path_unchanged() {
        assert_eq!(append_query("/items", &IndexMap::new()), "/items");
        assert_eq!(append_query("/items?x=1", &IndexMap::new()), "/items?x=1");
    }

    #[test]
    fn test_pairs_keep_insertion_order_and_escape_spaces() {
        let q = query(&[("a", "1".into()), ("b", "x y".into())]);
        assert_eq!(append_query("/items", &q), "/items?a=1&b=x%20y");

        let q = query(&[("b", "x y".into()), ("a", "1".into())]);
        assert_eq!(append_query("/items", &q), "/items?b=x%20y&a=1");
    }

    #[test]
    fn test_existing_query_uses_ampersand() {
        let q = query(&[("page", 2_i64.into())]);
        assert_eq!(append_query("/items?sort=asc", &q), "/items?sort=asc&page=2");
    }

    #[test]
    fn test_keys_and_values_are_percent_encoded() {
        let q = query(&[
            ("filter[name]", "a&b=c".into()),
            ("email", "me+you@example.com".into()),
        ]);
        assert_eq!(
            append_query("/search", &q),
            "/search?filter%5Bname%5D=a%26b%3Dc&email=me%2Byou%40example.com"
        );
    }

    #[test]
    fn test_unreserved_characters_are_kept() {
        let q = query(&[("id", "a-b_c.d~e".into())]);
        assert_eq!(append_query("/x", &q), "/x?id=a-b_c.d~e");
    }

    #[test]
    fn test_scalar_values_are_rendered() {
        let q = query(&[
            ("n", 5_i64.into()),
            ("f", 0.25_f64.into()),
            ("on", true.into()),
        ]);
        assert_eq!(append_query("/x", &q), "/x?n=5&f=0.25&on=true");
    }
}
