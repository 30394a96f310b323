//! Support for creating Atom feeds from a list of posts.

use crate::config::{Author, FeedSettings};
use crate::post::Post;
use atom_syndication::{Category as AtomCategory, Entry, Feed, Link, Person, Text};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use std::io::Write;
use thiserror::Error;
use url::Url;

/// The number of entries a feed carries unless asked otherwise.
pub const DEFAULT_FEED_LENGTH: usize = 20;

/// Creates a feed from `settings` and the given posts (newest first, as the
/// controller keeps them) and writes the result to a [`std::io::Write`]. Post
/// links are resolved against `posts_url`.
pub fn write_feed<W: Write>(
    settings: &FeedSettings,
    posts: &[Post],
    posts_url: &Url,
    w: W,
) -> Result<()> {
    feed(settings, posts, posts_url)?.write_to(w)?;
    Ok(())
}

fn feed(settings: &FeedSettings, posts: &[Post], posts_url: &Url) -> Result<Feed> {
    let mut feed = Feed::default();
    feed.set_title(settings.title.clone());
    feed.set_id(settings.home_page.to_string());
    // The newest post dates the feed, so identical inputs give identical
    // output.
    feed.set_updated(match posts.iter().map(|p| p.date).max() {
        Some(date) => midnight_utc(date),
        None => Utc::now().fixed_offset(),
    });
    feed.set_authors(author_to_people(settings.author.clone()));
    feed.set_links(vec![alternate_link(settings.home_page.as_str())]);
    feed.set_entries(feed_entries(posts, posts_url)?);
    Ok(feed)
}

fn feed_entries(posts: &[Post], posts_url: &Url) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::with_capacity(posts.len());

    for post in posts {
        let url = post.url(posts_url)?;
        let date = midnight_utc(post.date);

        let mut categories = Vec::with_capacity(post.tags.len() + 1);
        for term in std::iter::once(&post.category).chain(post.tags.iter()) {
            let mut category = AtomCategory::default();
            category.set_term(term.clone());
            categories.push(category);
        }

        let mut entry = Entry::default();
        entry.set_id(url.to_string());
        entry.set_title(post.title.clone());
        entry.set_updated(date);
        entry.set_published(Some(date));
        entry.set_summary(Some(Text::plain(post.excerpt.clone())));
        let mut author = Person::default();
        author.set_name(post.author.clone());
        entry.set_authors(vec![author]);
        entry.set_links(vec![alternate_link(url.as_str())]);
        entry.set_categories(categories);
        entries.push(entry);
    }
    Ok(entries)
}

fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

fn alternate_link(href: &str) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel("alternate");
    link
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => {
            let mut person = Person::default();
            person.set_name(author.name);
            person.set_email(author.email);
            vec![person]
        }
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the feed can't be serialized or written.
    #[error("writing feed: {0}")]
    Atom(#[from] atom_syndication::Error),

    /// Returned when a post's link can't be built from its slug.
    #[error("building post URL: {0}")]
    Url(#[from] url::ParseError),
}
