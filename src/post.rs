//! Defines the [`Post`] and [`Manifest`] types. A manifest is the static JSON
//! document listing every post and its metadata; it is deserialized straight
//! into these types by the [`crate::source`] implementations.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use url::Url;

/// The top-level shape of a manifest document: `{ "posts": [...] }`.
#[derive(Clone, Debug, Deserialize)]
pub struct Manifest {
    pub posts: Vec<Post>,
}

/// A single post's metadata as listed in the manifest. Posts are never
/// mutated after loading.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// Unique identifier for the post. Link targets are built from it (see
    /// [`Post::url`]).
    pub slug: String,

    pub title: String,

    pub excerpt: String,

    pub author: String,

    /// The grouping key used by category filters. Free-form.
    pub category: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// The publication date. Only used for ordering.
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,

    #[serde(default)]
    pub featured: bool,
}

impl Post {
    /// Returns the URL of the post's page, `{posts_url}/{slug}.html`. As with
    /// any [`Url::join`], `posts_url` needs a trailing slash or its last
    /// segment is replaced.
    pub fn url(&self, posts_url: &Url) -> Result<Url, url::ParseError> {
        posts_url.join(&format!("{}.html", self.slug))
    }

    /// Reports whether the title, the excerpt, or any tag contains `needle`,
    /// ignoring case. `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.excerpt.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Parses an ISO-like date. Plain `YYYY-MM-DD` dates are the norm, but
/// RFC 3339 timestamps and zoneless `YYYY-MM-DDTHH:MM:SS` timestamps are
/// accepted too, keeping only their date part.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(&s).ok_or_else(|| D::Error::custom(format!("invalid post date `{}`", s)))
}
