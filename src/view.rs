//! Defines the view models handed to a [`crate::render::Renderer`]. These are
//! plain, display-ready records derived from a [`PostListController`]; each
//! can also be converted into a template [`Value`].

use crate::category::Category;
use crate::controller::PostListController;
use crate::pagination::PageItem;
use crate::post::Post;
use chrono::NaiveDate;
use gtmpl_value::Value;
use pulldown_cmark::escape::escape_html;
use pulldown_cmark::{html, Parser};
use std::collections::HashMap;
use url::Url;

/// A post as shown on a listing card.
#[derive(Clone, Debug, PartialEq)]
pub struct PostCard {
    pub slug: String,

    /// Where the card links to. See [`Post::url`].
    pub url: Url,

    /// The title, HTML-escaped.
    pub title: String,

    /// The excerpt rendered from (inline) Markdown to HTML.
    pub excerpt_html: String,

    /// The author, HTML-escaped.
    pub author: String,

    pub category: String,

    /// The tags, HTML-escaped, in manifest order.
    pub tags: Vec<String>,

    pub date: NaiveDate,

    /// The date in long form, e.g. `June 1, 2024`.
    pub display_date: String,

    pub featured: bool,
}

impl PostCard {
    pub fn new(post: &Post, posts_url: &Url) -> Result<PostCard, url::ParseError> {
        let mut excerpt_html = String::new();
        html::push_html(&mut excerpt_html, Parser::new(&post.excerpt));
        Ok(PostCard {
            slug: post.slug.clone(),
            url: post.url(posts_url)?,
            title: escape(&post.title),
            excerpt_html,
            author: escape(&post.author),
            category: escape(&post.category),
            tags: post.tags.iter().map(|t| escape(t)).collect(),
            date: post.date,
            display_date: post.date.format("%B %-d, %Y").to_string(),
            featured: post.featured,
        })
    }
}

/// A category filter control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryButton {
    pub category: Category,

    /// The slugified category name, for element ids.
    pub id: String,

    /// Whether this is the category currently selected.
    pub active: bool,
}

/// A page-number control, or an ellipsis standing in for skipped pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageButton {
    pub item: PageItem,
    pub active: bool,
}

/// Everything a renderer needs to draw the listing: filter controls, the
/// current page's cards, and pagination controls.
#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    pub categories: Vec<CategoryButton>,
    pub cards: Vec<PostCard>,
    pub pagination: Vec<PageButton>,

    /// The current 1-based page.
    pub page: usize,

    /// The total number of pages; 0 when nothing matches the filter.
    pub page_count: usize,

    /// The page before the current one, if any.
    pub prev: Option<usize>,

    /// The page after the current one, if any.
    pub next: Option<usize>,
}

impl Listing {
    /// Builds the listing for the controller's current state. Card links are
    /// resolved against `posts_url`.
    pub fn build(
        controller: &PostListController,
        posts_url: &Url,
    ) -> Result<Listing, url::ParseError> {
        let page = controller.page();
        let page_count = controller.page_count();

        let categories = controller
            .list_categories()
            .into_iter()
            .map(|category| CategoryButton {
                id: category.slug(),
                active: &category == controller.category(),
                category,
            })
            .collect();

        let cards = controller
            .current_page_items()
            .into_iter()
            .map(|post| PostCard::new(post, posts_url))
            .collect::<Result<Vec<_>, _>>()?;

        let pagination = controller
            .pagination_window()
            .into_iter()
            .map(|item| PageButton {
                item,
                active: item == PageItem::Page(page),
            })
            .collect();

        Ok(Listing {
            categories,
            cards,
            pagination,
            page,
            page_count,
            prev: match page > 1 && page_count > 0 {
                true => Some((page - 1).min(page_count)),
                false => None,
            },
            next: match page < page_count {
                true => Some(page + 1),
                false => None,
            },
        })
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_html(&mut out, s).expect("writing to a String can't fail");
    out
}

fn object(fields: Vec<(&str, Value)>) -> Value {
    let m: HashMap<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();
    Value::Object(m)
}

fn number(n: usize) -> Value {
    Value::from(n as u64)
}

fn optional_number(n: Option<usize>) -> Value {
    match n {
        Some(n) => number(n),
        None => Value::Nil,
    }
}

impl From<&PostCard> for Value {
    /// Converts [`PostCard`]s into [`Value`]s for templating.
    fn from(card: &PostCard) -> Value {
        object(vec![
            ("slug", Value::String(card.slug.clone())),
            ("url", Value::String(card.url.to_string())),
            ("title", Value::String(card.title.clone())),
            ("excerpt", Value::String(card.excerpt_html.clone())),
            ("author", Value::String(card.author.clone())),
            ("category", Value::String(card.category.clone())),
            (
                "tags",
                Value::Array(card.tags.iter().map(|t| Value::String(t.clone())).collect()),
            ),
            ("date", Value::String(card.date.format("%Y-%m-%d").to_string())),
            ("display_date", Value::String(card.display_date.clone())),
            ("featured", Value::Bool(card.featured)),
        ])
    }
}

impl From<&CategoryButton> for Value {
    fn from(button: &CategoryButton) -> Value {
        object(vec![
            ("name", Value::String(escape(button.category.as_str()))),
            ("id", Value::String(button.id.clone())),
            ("active", Value::Bool(button.active)),
        ])
    }
}

impl From<&PageButton> for Value {
    /// An ellipsis becomes `{ellipsis: true, page: nil}`.
    fn from(button: &PageButton) -> Value {
        let (page, ellipsis) = match button.item {
            PageItem::Page(n) => (number(n), false),
            PageItem::Ellipsis => (Value::Nil, true),
        };
        object(vec![
            ("page", page),
            ("ellipsis", Value::Bool(ellipsis)),
            ("active", Value::Bool(button.active)),
        ])
    }
}

impl From<&Listing> for Value {
    /// Converts a [`Listing`] into a [`Value::Object`] with fields
    /// `categories`, `cards`, `pagination`, `page`, `page_count`, `prev`,
    /// `next`, and `paginated` (whether there is more than one page).
    fn from(listing: &Listing) -> Value {
        object(vec![
            (
                "categories",
                Value::Array(listing.categories.iter().map(Value::from).collect()),
            ),
            (
                "cards",
                Value::Array(listing.cards.iter().map(Value::from).collect()),
            ),
            (
                "pagination",
                Value::Array(listing.pagination.iter().map(Value::from).collect()),
            ),
            ("page", number(listing.page)),
            ("page_count", number(listing.page_count)),
            ("paginated", Value::Bool(listing.page_count > 1)),
            ("prev", optional_number(listing.prev)),
            ("next", optional_number(listing.next)),
        ])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::test::post;
    use crate::source::StaticSource;
    use std::num::NonZeroUsize;

    fn posts_url() -> Url {
        Url::parse("https://example.com/posts/").unwrap()
    }

    #[test]
    fn test_post_card() {
        let mut p = post("tips", "rust", "2024-06-01");
        p.title = String::from("Tips & <tricks>");
        p.excerpt = String::from("Use *iterators*.");
        p.tags = vec![String::from("a<b")];

        let card = PostCard::new(&p, &posts_url()).unwrap();
        assert_eq!(card.url.as_str(), "https://example.com/posts/tips.html");
        assert_eq!(card.title, "Tips &amp; &lt;tricks&gt;");
        assert_eq!(card.excerpt_html, "<p>Use <em>iterators</em>.</p>\n");
        assert_eq!(card.tags, vec!["a&lt;b"]);
        assert_eq!(card.display_date, "June 1, 2024");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[tokio::test]
    async fn test_listing() {
        let mut posts = Vec::new();
        for day in 1..=9 {
            let category = if day % 2 == 0 { "even" } else { "odd" };
            posts.push(post(&format!("p{}", day), category, &format!("2024-01-0{}", day)));
        }
        let mut controller = PostListController::new(NonZeroUsize::new(2).unwrap());
        controller.load(&StaticSource::new(posts)).await;
        controller.set_page(NonZeroUsize::new(3).unwrap());

        let listing = Listing::build(&controller, &posts_url()).unwrap();
        assert_eq!(listing.page, 3);
        assert_eq!(listing.page_count, 5);
        assert_eq!(listing.prev, Some(2));
        assert_eq!(listing.next, Some(4));

        let cards: Vec<&str> = listing.cards.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(cards, vec!["p5", "p4"]);

        let names: Vec<&str> = listing
            .categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["all", "odd", "even"]);
        assert!(listing.categories[0].active);
        assert!(!listing.categories[1].active);

        let active: Vec<PageItem> = listing
            .pagination
            .iter()
            .filter(|b| b.active)
            .map(|b| b.item)
            .collect();
        assert_eq!(active, vec![PageItem::Page(3)]);
    }

    #[test]
    fn test_listing_empty() {
        let controller = PostListController::default();
        let listing = Listing::build(&controller, &posts_url()).unwrap();
        assert_eq!(listing.categories.len(), 1);
        assert!(listing.cards.is_empty());
        assert!(listing.pagination.is_empty());
        assert_eq!(listing.page_count, 0);
        assert_eq!(listing.prev, None);
        assert_eq!(listing.next, None);
    }

    #[test]
    fn test_listing_to_value() {
        let controller = PostListController::default();
        let listing = Listing::build(&controller, &posts_url()).unwrap();
        match Value::from(&listing) {
            Value::Object(m) => {
                assert!(matches!(m.get("prev"), Some(Value::Nil)));
                assert!(matches!(m.get("cards"), Some(Value::Array(a)) if a.is_empty()));
            }
            _ => panic!("listing should convert to an object"),
        }
    }
}
