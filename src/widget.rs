//! Exports [`Widget`], which wires a [`PostListController`] to a [`Source`]
//! and a [`Renderer`]: it loads the posts, renders the listing, and re-renders
//! after every user action.

use crate::config::Config;
use crate::controller::{Action, LoadOutcome, PostListController};
use crate::render::{self, load_template, HtmlRenderer, Renderer};
use crate::source::{self, Source};
use crate::view::Listing;
use std::io::Write;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// The listing widget. Owns the controller, so there is exactly one listing
/// state per widget.
pub struct Widget<R> {
    controller: PostListController,
    source: Box<dyn Source>,
    renderer: R,
    posts_url: Url,
}

impl<R: Renderer> Widget<R> {
    pub fn new(
        controller: PostListController,
        source: Box<dyn Source>,
        renderer: R,
        posts_url: Url,
    ) -> Widget<R> {
        Widget {
            controller,
            source,
            renderer,
            posts_url,
        }
    }

    /// Builds a widget from configuration: the manifest location picks the
    /// source and the page size sizes the controller.
    pub fn from_config(config: &Config, renderer: R) -> Result<Widget<R>> {
        let source =
            source::from_location(&config.manifest, &config.base_directory, config.timeout)?;
        Ok(Widget::new(
            PostListController::new(config.page_size),
            source,
            renderer,
            config.posts_url.clone(),
        ))
    }

    /// Loads the posts and renders the first listing. A failed load still
    /// renders (an empty listing); only rendering problems are errors.
    pub async fn init(&mut self) -> Result<LoadOutcome> {
        let outcome = self.load().await;
        self.render()?;
        Ok(outcome)
    }

    /// Applies a user action and renders the resulting listing.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        self.apply(action);
        self.render()
    }

    /// Loads the posts without rendering.
    pub async fn load(&mut self) -> LoadOutcome {
        self.controller.load(self.source.as_ref()).await
    }

    /// Applies a user action without rendering.
    pub fn apply(&mut self, action: Action) {
        self.controller.handle_action(action);
    }

    /// Renders the listing for the current state.
    pub fn render(&mut self) -> Result<()> {
        let listing =
            Listing::build(&self.controller, &self.posts_url).map_err(render::Error::from)?;
        debug!(
            page = listing.page,
            page_count = listing.page_count,
            cards = listing.cards.len(),
            "rendering listing"
        );
        self.renderer.render(&listing)?;
        Ok(())
    }

    pub fn controller(&self) -> &PostListController {
        &self.controller
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

/// Builds an [`HtmlRenderer`] writing to `out` with the configured template
/// files, or with [`render::DEFAULT_TEMPLATE`] when there are none.
pub fn html_renderer<W: Write>(config: &Config, out: W) -> render::Result<HtmlRenderer<W>> {
    match config.templates.is_empty() {
        true => HtmlRenderer::with_default_template(out),
        false => Ok(HtmlRenderer::new(load_template(config.templates.iter())?, out)),
    }
}

/// The result of a widget operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem setting up or rendering the widget. Load failures are
/// not errors; see [`LoadOutcome`].
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the configured manifest location can't be turned into a
    /// source.
    #[error(transparent)]
    Source(#[from] source::Error),

    /// Returned when rendering fails.
    #[error(transparent)]
    Render(#[from] render::Error),
}
