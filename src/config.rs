//! Loads [`Config`] from a `blogroll.yaml` project file.

use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// The name of the project file [`Config::from_directory`] looks for.
pub const CONFIG_FILE_NAME: &str = "blogroll.yaml";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(crate::controller::DEFAULT_PAGE_SIZE)
    }
}

#[derive(Deserialize)]
struct TimeoutSecs(u64);
impl Default for TimeoutSecs {
    fn default() -> Self {
        TimeoutSecs(10)
    }
}

#[derive(Deserialize)]
struct Project {
    manifest: String,
    posts_url: Url,

    #[serde(default)]
    page_size: PageSize,

    /// 0 disables the timeout.
    #[serde(default)]
    timeout_secs: TimeoutSecs,

    #[serde(default)]
    templates: Vec<PathBuf>,

    #[serde(default)]
    feed: Option<FeedSettings>,
}

/// An author, as credited in the Atom feed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// The `feed` section of the project file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FeedSettings {
    pub title: String,
    pub home_page: Url,

    #[serde(default)]
    pub author: Option<Author>,
}

/// Settings given on the command line. Each one that is set takes precedence
/// over the project file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub manifest: Option<String>,
    pub posts_url: Option<Url>,
    pub page_size: Option<NonZeroUsize>,
}

/// Everything needed to load and render a listing.
#[derive(Clone, Debug)]
pub struct Config {
    /// Where the manifest lives: an `http(s)://` URL or a path. See
    /// [`crate::source::from_location`].
    pub manifest: String,

    /// The directory relative manifest and template paths resolve against.
    /// This is the directory containing the project file.
    pub base_directory: PathBuf,

    /// The base URL for post links.
    pub posts_url: Url,

    pub page_size: NonZeroUsize,

    /// The manifest request timeout, if any.
    pub timeout: Option<Duration>,

    /// Template files, already resolved against `base_directory`. Empty means
    /// the built-in template.
    pub templates: Vec<PathBuf>,

    pub feed: Option<FeedSettings>,
}

impl Config {
    /// A configuration with default settings for everything but the manifest
    /// location and the post base URL.
    pub fn new(manifest: impl Into<String>, posts_url: Url) -> Config {
        Config {
            manifest: manifest.into(),
            base_directory: PathBuf::from("."),
            posts_url,
            page_size: NonZeroUsize::new(PageSize::default().0).unwrap_or(NonZeroUsize::MIN),
            timeout: Some(Duration::from_secs(TimeoutSecs::default().0)),
            templates: Vec::new(),
            feed: None,
        }
    }

    /// Looks for [`CONFIG_FILE_NAME`] in `dir` and then in each of its
    /// ancestors, and loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(dir) = current {
            let path = dir.join(CONFIG_FILE_NAME);
            if path.exists() {
                return Config::from_project_file(&path);
            }
            current = dir.parent();
        }
        Err(Error::NotFound {
            start: dir.to_owned(),
        })
    }

    /// Like [`Config::from_directory`], with `overrides` applied on top. When
    /// there is no project file, `overrides` alone suffice as long as they
    /// name both the manifest and the post base URL.
    pub fn discover(dir: &Path, overrides: &Overrides) -> Result<Config> {
        let config = match Config::from_directory(dir) {
            Ok(config) => config,
            Err(Error::NotFound { start }) => match (&overrides.manifest, &overrides.posts_url) {
                (Some(manifest), Some(posts_url)) => {
                    Config::new(manifest.clone(), posts_url.clone())
                }
                _ => return Err(Error::NotFound { start }),
            },
            Err(err) => return Err(err),
        };
        Ok(config.with_overrides(overrides))
    }

    /// Replaces each setting `overrides` sets.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Config {
        if let Some(manifest) = &overrides.manifest {
            self.manifest = manifest.clone();
        }
        if let Some(posts_url) = &overrides.posts_url {
            self.posts_url = posts_url.clone();
        }
        if let Some(page_size) = overrides.page_size {
            self.page_size = page_size;
        }
        self
    }

    /// Loads the project file at `path`.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = std::fs::File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project = serde_yaml::from_reader(file).map_err(|err| Error::Yaml {
            path: path.to_owned(),
            err,
        })?;

        let base_directory = match path.parent() {
            Some(dir) => dir.to_owned(),
            None => PathBuf::from("."),
        };

        Ok(Config {
            manifest: project.manifest,
            posts_url: project.posts_url,
            page_size: NonZeroUsize::new(project.page_size.0).ok_or_else(|| {
                Error::ZeroPageSize {
                    path: path.to_owned(),
                }
            })?,
            timeout: match project.timeout_secs.0 {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            templates: project
                .templates
                .iter()
                .map(|relpath| base_directory.join(relpath))
                .collect(),
            feed: project.feed,
            base_directory,
        })
    }
}

/// The result of loading configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem finding or loading the project file.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when no project file exists in the start directory or any of
    /// its ancestors.
    #[error("could not find `{}` in `{}` or any parent directory", CONFIG_FILE_NAME, start.display())]
    NotFound { start: PathBuf },

    /// Returned when the project file can't be opened.
    #[error("opening project file `{}`: {err}", path.display())]
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid.
    #[error("parsing project file `{}`: {err}", path.display())]
    Yaml { path: PathBuf, err: serde_yaml::Error },

    /// Returned when `page_size` is 0.
    #[error("project file `{}`: page_size must be at least 1", path.display())]
    ZeroPageSize { path: PathBuf },
}
