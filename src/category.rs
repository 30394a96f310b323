//! Defines the [`Category`] type, which represents the listing's category
//! filter.

use crate::post::Post;
use std::convert::Infallible;
use std::fmt;

/// The sentinel category name meaning "no filter".
pub const ALL: &str = "all";

/// A category filter. [`Category::All`] matches every post; any other value
/// matches posts whose `category` is exactly equal to it. Parsing `"all"`
/// always yields [`Category::All`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    All,
    Named(String),
}

impl Category {
    /// The category's name as shown on a filter control.
    pub fn as_str(&self) -> &str {
        match self {
            Category::All => ALL,
            Category::Named(name) => name,
        }
    }

    /// Reports whether `post` belongs to this category.
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Category::All => true,
            Category::Named(name) => post.category == *name,
        }
    }

    /// A slugified form of the name, so e.g. `Game Dev` and `game-dev` make
    /// the same element id or query parameter.
    pub fn slug(&self) -> String {
        slug::slugify(self.as_str())
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Category {
        match s {
            ALL => Category::All,
            _ => Category::Named(s.to_owned()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Category {
        match s.as_str() {
            ALL => Category::All,
            _ => Category::Named(s),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
