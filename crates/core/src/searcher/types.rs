//! Types for the Prowlarr search adapter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::fetcher::FetchError;
use crate::config::ConfigError;

/// Content category the host can search in.
///
/// Each category maps to zero or more Torznab category codes; `All` applies
/// no filter at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    All,
    Anime,
    Books,
    Games,
    Movies,
    Music,
    Software,
    Tv,
}

impl Category {
    /// Every category, in the order the host lists them.
    pub const ALL: [Category; 8] = [
        Category::All,
        Category::Anime,
        Category::Books,
        Category::Games,
        Category::Movies,
        Category::Music,
        Category::Software,
        Category::Tv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Anime => "anime",
            Category::Books => "books",
            Category::Games => "games",
            Category::Movies => "movies",
            Category::Music => "music",
            Category::Software => "software",
            Category::Tv => "tv",
        }
    }

    /// Torznab codes sent as `categories` parameters.
    pub fn codes(&self) -> &'static [u32] {
        match self {
            Category::All => &[],
            Category::Anime => &[5070],
            Category::Books => &[8000],
            // Console games live under 1000, PC games under 4000.
            Category::Games => &[1000, 4000],
            Category::Movies => &[2000],
            Category::Music => &[3000],
            Category::Software => &[4000],
            Category::Tv => &[5000],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One search result in the shape the host expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub name: String,
    pub link: String,
    /// Size in bytes, `-1` if unknown.
    pub size: String,
    pub seeds: i64,
    pub leech: i64,
    pub desc_link: String,
    pub engine_url: String,
}

impl ResultRow {
    /// Copy of this row with `|` percent-encoded in every string field.
    ///
    /// The host splits its result lines on `|`.
    pub fn escape_pipes(&self) -> ResultRow {
        let escape = |s: &str| s.replace('|', "%7C");
        ResultRow {
            name: escape(&self.name),
            link: escape(&self.link),
            size: escape(&self.size),
            seeds: self.seeds,
            leech: self.leech,
            desc_link: escape(&self.desc_link),
            engine_url: escape(&self.engine_url),
        }
    }
}

/// A release as returned by Prowlarr's `/api/v1/search`.
///
/// Every field is optional; missing ones degrade to placeholders.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProwlarrRelease {
    pub title: Option<String>,
    pub indexer: Option<String>,
    pub download_url: Option<String>,
    pub magnet_url: Option<String>,
    pub size: Option<i64>,
    pub seeders: Option<i64>,
    pub leechers: Option<i64>,
    pub info_url: Option<String>,
    pub guid: Option<String>,
}

/// Errors that can occur during a search.
///
/// Every variant except `Output` is reported to the host as an error row,
/// using the `Display` text as the error kind.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("malformed configuration file")]
    MalformedConfig,

    #[error("api key error")]
    ApiKey,

    #[error("connection error")]
    Connection(#[source] FetchError),

    #[error("parse error")]
    InvalidResponse(String),

    #[error("Failed to write results: {0}")]
    Output(#[from] std::io::Error),
}

impl SearchError {
    /// Whether this error is shown to the user as an error row.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, SearchError::Output(_))
    }
}

impl From<ConfigError> for SearchError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::PlaceholderApiKey => SearchError::ApiKey,
            _ => SearchError::MalformedConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes() {
        assert!(Category::All.codes().is_empty());
        assert_eq!(Category::Anime.codes(), &[5070]);
        assert_eq!(Category::Books.codes(), &[8000]);
        assert_eq!(Category::Games.codes(), &[1000, 4000]);
        assert_eq!(Category::Movies.codes(), &[2000]);
        assert_eq!(Category::Music.codes(), &[3000]);
        assert_eq!(Category::Software.codes(), &[4000]);
        assert_eq!(Category::Tv.codes(), &[5000]);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("tv".parse::<Category>(), Ok(Category::Tv));
        assert_eq!("Movies".parse::<Category>(), Ok(Category::Movies));
        assert_eq!("ALL".parse::<Category>(), Ok(Category::All));
        assert_eq!(
            "pictures".parse::<Category>(),
            Err(UnknownCategory("pictures".to_string()))
        );
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_escape_pipes() {
        let row = ResultRow {
            name: "a|b".to_string(),
            link: "http://x/?q=1|2".to_string(),
            size: "10".to_string(),
            seeds: 1,
            leech: 2,
            desc_link: "|".to_string(),
            engine_url: "http://x".to_string(),
        };

        let escaped = row.escape_pipes();
        assert_eq!(escaped.name, "a%7Cb");
        assert_eq!(escaped.link, "http://x/?q=1%7C2");
        assert_eq!(escaped.desc_link, "%7C");
        assert_eq!(escaped.seeds, 1);
    }

    #[test]
    fn test_release_deserialize_partial() {
        let json = r#"{"title": "Ubuntu", "magnetUrl": "magnet:?xt=urn:btih:abc", "seeders": 4}"#;
        let release: ProwlarrRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.title.as_deref(), Some("Ubuntu"));
        assert_eq!(release.magnet_url.as_deref(), Some("magnet:?xt=urn:btih:abc"));
        assert_eq!(release.seeders, Some(4));
        assert!(release.download_url.is_none());
        assert!(release.leechers.is_none());
    }

    #[test]
    fn test_search_error_kinds() {
        assert_eq!(SearchError::MalformedConfig.to_string(), "malformed configuration file");
        assert_eq!(SearchError::ApiKey.to_string(), "api key error");
        assert_eq!(
            SearchError::Connection(FetchError::Timeout).to_string(),
            "connection error"
        );
        assert!(SearchError::ApiKey.is_reportable());
        assert!(!SearchError::Output(std::io::Error::other("closed")).is_reportable());
    }

    #[test]
    fn test_search_error_from_config_error() {
        assert!(matches!(
            SearchError::from(ConfigError::PlaceholderApiKey),
            SearchError::ApiKey
        ));
        assert!(matches!(
            SearchError::from(ConfigError::Malformed("x".to_string())),
            SearchError::MalformedConfig
        ));
    }
}
