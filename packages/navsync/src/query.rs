//! Query string decoding.

use std::collections::BTreeMap;

/// The decoded parameters of a query string. Repeated keys keep their last value.
pub type QueryMap = BTreeMap<String, String>;

/// Decode a query string into a [`QueryMap`].
///
/// The string may start with a `?`. Pairs are decoded the way a browser's `URLSearchParams` does:
/// `+` becomes a space, percent escapes are decoded, a pair without `=` has an empty value, and
/// the last occurrence of a key wins. This never fails; anything undecodable is skipped or decoded
/// lossily.
///
/// ```rust
/// # use navsync::query::decode_query;
/// let query = decode_query("?tag=rust&page=1&page=2&q=hello+world");
/// assert_eq!(query["tag"], "rust");
/// assert_eq!(query["page"], "2");
/// assert_eq!(query["q"], "hello world");
/// ```
pub fn decode_query(query: &str) -> QueryMap {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Encode a [`QueryMap`] as a query string without the leading `?`.
///
/// ```rust
/// # use navsync::query::{decode_query, encode_query};
/// let query = decode_query("b=2&a=hello%20world");
/// assert_eq!(encode_query(&query), "a=hello+world&b=2");
/// ```
pub fn encode_query(query: &QueryMap) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(pairs: &[(&str, &str)]) -> QueryMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn leading_question_mark_is_optional() {
        assert_eq!(decode_query("?a=1&b=2"), decode_query("a=1&b=2"));
        assert_eq!(decode_query("?a=1&b=2"), map(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn last_value_wins() {
        assert_eq!(
            decode_query("k=first&other=x&k=second&k=third"),
            map(&[("k", "third"), ("other", "x")])
        );
    }

    #[test]
    fn empty_and_degenerate_input() {
        assert!(decode_query("").is_empty());
        assert!(decode_query("?").is_empty());
        assert!(decode_query("&&&").is_empty());
        assert_eq!(decode_query("flag"), map(&[("flag", "")]));
        assert_eq!(decode_query("=orphan"), map(&[("", "orphan")]));
        assert_eq!(decode_query("a==b"), map(&[("a", "=b")]));
    }

    #[test]
    fn escapes_are_decoded() {
        assert_eq!(
            decode_query("name=J%C3%BCrgen&q=a+b%2Bc&broken=%ZZ"),
            map(&[("name", "Jürgen"), ("q", "a b+c"), ("broken", "%ZZ")])
        );
    }

    #[test]
    fn only_one_question_mark_is_stripped() {
        assert_eq!(decode_query("??a=1"), map(&[("?a", "1")]));
    }

    #[test]
    fn decode_is_stable_under_reencoding() {
        let samples = [
            "",
            "?",
            "a=1",
            "?a=1&a=2&b",
            "q=hello+world&x=%26%3D%3F",
            "=&=&k=",
            "emoji=%F0%9F%A6%80&space=%20&plus=%2B",
            "a=1&&b=2&c=3=4",
            "%ZZ=%E2%28",
        ];

        for sample in samples {
            let decoded = decode_query(sample);
            let again = decode_query(&encode_query(&decoded));
            assert_eq!(decoded, again, "decoding {sample:?} is not stable");
        }
    }
}
