//! Prowlarr search URL construction.

use super::Category;

/// `indexerIds` value selecting every indexer Prowlarr aggregates.
pub const ALL_INDEXERS: &str = "-2";

/// Undo any percent-encoding the host applied to the search text.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_search_text(text: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(text.as_bytes())).into_owned()
}

/// Build the Prowlarr search URL.
///
/// `text` is expected to be decoded already (see [`decode_search_text`]).
/// Spaces become `+`; nothing else is encoded, matching what Prowlarr's
/// search endpoint accepts.
pub fn build_search_url(base_url: &str, api_key: &str, text: &str, category: Category) -> String {
    let mut url = format!(
        "{}/api/v1/search?query={}&apikey={}&indexerIds={}",
        base_url.trim_end_matches('/'),
        text.replace(' ', "+"),
        api_key,
        ALL_INDEXERS
    );

    for code in category.codes() {
        url.push_str(&format!("&categories={}", code));
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_search_text() {
        assert_eq!(decode_search_text("ubuntu%20server"), "ubuntu server");
        assert_eq!(decode_search_text("plain text"), "plain text");
        assert_eq!(decode_search_text("a%7Cb"), "a|b");
        assert_eq!(decode_search_text("100%"), "100%");
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        assert_eq!(decode_search_text("%FFx"), "\u{FFFD}x");
    }

    #[test]
    fn test_build_search_url_all() {
        let url = build_search_url("http://localhost:9696", "key", "ubuntu server", Category::All);
        assert_eq!(
            url,
            "http://localhost:9696/api/v1/search?query=ubuntu+server&apikey=key&indexerIds=-2"
        );
        assert!(!url.contains("categories"));
    }

    #[test]
    fn test_build_search_url_trailing_slash() {
        let url = build_search_url("http://localhost:9696/", "key", "x", Category::Tv);
        assert!(url.starts_with("http://localhost:9696/api/v1/search?"));
        assert!(url.ends_with("&indexerIds=-2&categories=5000"));
    }

    #[test]
    fn test_build_search_url_games_is_composite() {
        let url = build_search_url("http://h", "k", "doom", Category::Games);
        assert!(url.ends_with("&categories=1000&categories=4000"));
    }

    #[test]
    fn test_build_search_url_every_category() {
        let expected = [
            (Category::Anime, "&categories=5070"),
            (Category::Books, "&categories=8000"),
            (Category::Movies, "&categories=2000"),
            (Category::Music, "&categories=3000"),
            (Category::Software, "&categories=4000"),
            (Category::Tv, "&categories=5000"),
        ];

        for (category, suffix) in expected {
            let url = build_search_url("http://h", "k", "q", category);
            assert!(url.ends_with(suffix), "{} -> {}", category, url);
            assert_eq!(url.matches("categories=").count(), 1);
        }
    }

    #[test]
    fn test_build_search_url_keeps_other_characters() {
        let url = build_search_url("http://h", "k", "c++ (2020)", Category::All);
        assert!(url.contains("query=c+++(2020)&"));
    }
}
