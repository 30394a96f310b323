//! Defines the [`Source`] trait, the abstract fetch-like capability that
//! produces the post set, along with its implementations: [`HttpSource`] for
//! manifests served over HTTP, [`FileSource`] for manifests on disk, and
//! [`StaticSource`] for posts already in memory.

use crate::post::{Manifest, Post};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Something that can asynchronously produce the full list of posts. Failure
/// of any kind is reported as an [`Error`], which the controller converts into
/// an empty post set.
#[async_trait]
pub trait Source: Send + Sync {
    /// Fetches every post. Ordering is not significant; the controller sorts.
    async fn fetch(&self) -> Result<Vec<Post>>;

    /// A human-readable description of where posts come from, for logs.
    fn location(&self) -> String;
}

/// Fetches a manifest document over HTTP(S).
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    /// Builds a source for the manifest at `url`. If `timeout` is given, a
    /// request that takes longer fails with [`Error::Request`].
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<HttpSource> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(HttpSource {
            client: builder.build().map_err(Error::Client)?,
            url,
        })
    }
}

#[async_trait]
impl Source for HttpSource {
    async fn fetch(&self) -> Result<Vec<Post>> {
        let request_error = |source: reqwest::Error| Error::Request {
            url: self.url.clone(),
            source,
        };
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        parse_manifest(&body, self.url.as_str())
    }

    fn location(&self) -> String {
        self.url.to_string()
    }
}

/// Reads a manifest document from the local file system.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> FileSource {
        FileSource { path: path.into() }
    }
}

#[async_trait]
impl Source for FileSource {
    async fn fetch(&self) -> Result<Vec<Post>> {
        let body = tokio::fs::read(&self.path).await.map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_manifest(&body, &self.path.display().to_string())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a fixed set of posts. Useful when the posts were obtained some
/// other way, and in tests.
pub struct StaticSource {
    posts: Vec<Post>,
}

impl StaticSource {
    pub fn new(posts: Vec<Post>) -> StaticSource {
        StaticSource { posts }
    }
}

#[async_trait]
impl Source for StaticSource {
    async fn fetch(&self) -> Result<Vec<Post>> {
        Ok(self.posts.clone())
    }

    fn location(&self) -> String {
        String::from("<memory>")
    }
}

/// Picks a source for a manifest location: `http://` and `https://` URLs
/// are fetched with an [`HttpSource`], `file://` URLs and anything else that
/// isn't a URL are treated as paths. Relative paths resolve against
/// `base_directory`.
pub fn from_location(
    location: &str,
    base_directory: &Path,
    timeout: Option<Duration>,
) -> Result<Box<dyn Source>> {
    match Url::parse(location) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(Box::new(HttpSource::new(url, timeout)?)),
            "file" => match url.to_file_path() {
                Ok(path) => Ok(Box::new(FileSource::new(path))),
                Err(()) => Err(Error::Location(location.to_owned())),
            },
            _ => Err(Error::Location(location.to_owned())),
        },
        Err(_) => Ok(Box::new(FileSource::new(base_directory.join(location)))),
    }
}

fn parse_manifest(body: &[u8], location: &str) -> Result<Vec<Post>> {
    let manifest: Manifest = serde_json::from_slice(body).map_err(|source| Error::Parse {
        location: location.to_owned(),
        source,
    })?;
    Ok(manifest.posts)
}

/// The result of a fallible fetch.
pub type Result<T> = std::result::Result<T, Error>;

/// The load failure: why a manifest could not be turned into posts.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the HTTP client can't be constructed.
    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Returned when the request fails to complete, including timeouts and
    /// failures reading the response body.
    #[error("requesting manifest `{url}`: {source}")]
    Request { url: Url, source: reqwest::Error },

    /// Returned when the server answers with a non-success status.
    #[error("manifest `{url}` returned status {status}")]
    Status { url: Url, status: StatusCode },

    /// Returned when a manifest file can't be read.
    #[error("reading manifest `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Returned when the payload isn't a manifest document.
    #[error("parsing manifest `{location}`: {source}")]
    Parse {
        location: String,
        source: serde_json::Error,
    },

    /// Returned when a manifest location uses a scheme we can't fetch.
    #[error("unsupported manifest location `{0}`")]
    Location(String),
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    const MANIFEST: &str = r#"{"posts": [
        {"slug": "a", "title": "A", "excerpt": "", "author": "Sam",
         "category": "news", "tags": [], "date": "2024-01-01", "featured": false}
    ]}"#;

    #[tokio::test]
    async fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let posts = FileSource::new(file.path()).fetch().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "a");
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileSource::new(dir.path().join("nope.json")).fetch().await;
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[tokio::test]
    async fn test_file_source_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"items": []}"#).unwrap();

        let result = FileSource::new(file.path()).fetch().await;
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[tokio::test]
    async fn test_from_location_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("posts.json"), MANIFEST).unwrap();

        let source = from_location("posts.json", dir.path(), None).unwrap();
        assert_eq!(
            source.location(),
            dir.path().join("posts.json").display().to_string()
        );
        assert_eq!(source.fetch().await.unwrap().len(), 1);
    }

    #[test]
    fn test_from_location_schemes() {
        let base = Path::new("/srv/site");
        let http = from_location("https://example.com/posts.json", base, None).unwrap();
        assert_eq!(http.location(), "https://example.com/posts.json");
        assert!(matches!(
            from_location("ftp://example.com/posts.json", base, None),
            Err(Error::Location(_))
        ));
    }
}
