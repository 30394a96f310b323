//! Defines [`PostListController`], which owns the loaded posts along with the
//! current category filter and page, and answers every listing query from
//! them. Nothing derived is cached: each query recomputes its answer from the
//! post set, which is small.

use crate::category::{self, Category};
use crate::pagination::{self, PageItem};
use crate::post::Post;
use crate::source::{self, Source};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use tracing::{debug, info, warn};

/// The number of posts per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// The most posts [`PostListController::featured_posts`] returns.
pub const FEATURED_LIMIT: usize = 3;

/// The usual argument to [`PostListController::recent_posts`].
pub const DEFAULT_RECENT_COUNT: usize = 5;

/// A user action, as raised by category and page controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    SelectCategory(String),

    /// Selects a 1-based page. Page 0 is ignored.
    SelectPage(usize),
}

/// What happened during [`PostListController::load`]. A failed load is not
/// an error for the caller: the controller has already fallen back to an
/// empty post set.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded { count: usize },
    Failed(source::Error),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

/// Holds the listing state: every post (newest first), the category filter
/// and the current page.
#[derive(Debug)]
pub struct PostListController {
    posts: Vec<Post>,
    category: Category,
    page: usize,
    page_size: usize,
}

impl Default for PostListController {
    fn default() -> Self {
        PostListController {
            posts: Vec::new(),
            category: Category::All,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PostListController {
    pub fn new(page_size: NonZeroUsize) -> PostListController {
        PostListController {
            page_size: page_size.get(),
            ..PostListController::default()
        }
    }

    /// Replaces the post set with whatever `source` yields, sorted newest
    /// first. Posts with the same date keep their manifest order. If the
    /// source fails, the failure is logged and the post set becomes empty.
    pub async fn load(&mut self, source: &dyn Source) -> LoadOutcome {
        match source.fetch().await {
            Ok(mut posts) => {
                posts.sort_by(|a, b| b.date.cmp(&a.date));
                warn_duplicate_slugs(&posts);
                info!(location = %source.location(), count = posts.len(), "loaded posts");
                let count = posts.len();
                self.posts = posts;
                LoadOutcome::Loaded { count }
            }
            Err(err) => {
                warn!(
                    location = %source.location(),
                    error = %err,
                    "failed to load posts; showing none"
                );
                self.posts = Vec::new();
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Every loaded post, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns [`Category::All`] followed by each distinct post category in
    /// the order it is first seen. Posts whose category is literally `all`
    /// fold into the leading [`Category::All`].
    pub fn list_categories(&self) -> Vec<Category> {
        let mut seen: HashSet<&str> = HashSet::from([category::ALL]);
        let mut categories = vec![Category::All];
        for post in &self.posts {
            if seen.insert(post.category.as_str()) {
                categories.push(Category::from(post.category.as_str()));
            }
        }
        categories
    }

    /// Switches the filter and goes back to page 1. Unknown categories are
    /// accepted and simply match nothing.
    pub fn set_category(&mut self, category: impl Into<Category>) {
        self.category = category.into();
        self.page = 1;
    }

    /// The posts in the current category, newest first.
    pub fn filtered_posts(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| self.category.matches(p))
            .collect()
    }

    /// The number of pages the current category spans; 0 when it is empty.
    pub fn page_count(&self) -> usize {
        pagination::page_count(self.filtered_posts().len(), self.page_size)
    }

    /// Moves to `page`. No bounds check: a page past the end shows nothing.
    pub fn set_page(&mut self, page: NonZeroUsize) {
        self.page = page.get();
    }

    /// The posts on the current page.
    pub fn current_page_items(&self) -> Vec<&Post> {
        let filtered = self.filtered_posts();
        pagination::page_slice(&filtered, self.page, self.page_size).to_vec()
    }

    /// The page-number controls to show. See [`pagination::window`].
    pub fn pagination_window(&self) -> Vec<PageItem> {
        pagination::window(self.page, self.page_count())
    }

    /// The newest featured posts, at most [`FEATURED_LIMIT`] of them. Ignores
    /// the category filter.
    pub fn featured_posts(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| p.featured)
            .take(FEATURED_LIMIT)
            .collect()
    }

    /// The newest `count` posts. Ignores the category filter.
    pub fn recent_posts(&self, count: usize) -> &[Post] {
        &self.posts[..count.min(self.posts.len())]
    }

    /// Posts whose title, excerpt or tags contain `query`, ignoring case,
    /// newest first. An empty query matches every post.
    pub fn search_posts(&self, query: &str) -> Vec<&Post> {
        let needle = query.to_lowercase();
        self.posts.iter().filter(|p| p.matches(&needle)).collect()
    }

    /// Applies a user action.
    pub fn handle_action(&mut self, action: Action) {
        debug!(?action, "handling action");
        match action {
            Action::SelectCategory(category) => self.set_category(category),
            Action::SelectPage(page) => match NonZeroUsize::new(page) {
                Some(page) => self.set_page(page),
                None => warn!("ignoring selection of page 0"),
            },
        }
    }
}

fn warn_duplicate_slugs(posts: &[Post]) {
    let mut seen: HashSet<&str> = HashSet::new();
    for post in posts {
        if !seen.insert(post.slug.as_str()) {
            warn!(slug = %post.slug, "duplicate post slug in manifest");
        }
    }
}
