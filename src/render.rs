//! Defines the [`Renderer`] trait and [`HtmlRenderer`], which templates a
//! [`Listing`] into HTML. Templates use Go template syntax (via [`gtmpl`]); the
//! listing is available as the template's root value (see
//! `impl From<&Listing> for Value` in [`crate::view`] for its fields).

use crate::view::Listing;
use gtmpl::{Context, Template, Value};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Something that turns a [`Listing`] into visible output. Every call is a
/// complete rendering of the listing; nothing carries over from earlier calls.
pub trait Renderer {
    fn render(&mut self, listing: &Listing) -> Result<()>;
}

/// The template used when no template files are configured. It renders the
/// category buttons, the cards, and the pagination controls.
pub const DEFAULT_TEMPLATE: &str = r#"<div class="blogroll">
<nav class="categories">
{{- range .categories}}
  <button class="category{{if .active}} active{{end}}" id="category-{{.id}}" data-category="{{.name}}">{{.name}}</button>
{{- end}}
</nav>
{{- if .cards}}
<div class="cards">
{{- range .cards}}
  <article class="card{{if .featured}} featured{{end}}">
    <span class="category">{{.category}}</span>
    <h2><a href="{{.url}}">{{.title}}</a></h2>
    <div class="excerpt">{{.excerpt}}</div>
    <footer><span class="author">{{.author}}</span> <time datetime="{{.date}}">{{.display_date}}</time></footer>
    <ul class="tags">{{range .tags}}<li>{{.}}</li>{{end}}</ul>
  </article>
{{- end}}
</div>
{{- else}}
<p class="empty">No posts found.</p>
{{- end}}
{{- if .paginated}}
<nav class="pagination">
{{- if .prev}}
  <button class="prev" data-page="{{.prev}}">&laquo;</button>
{{- end}}
{{- range .pagination}}
{{- if .ellipsis}}
  <span class="ellipsis">&hellip;</span>
{{- else}}
  <button class="page{{if .active}} active{{end}}" data-page="{{.page}}">{{.page}}</button>
{{- end}}
{{- end}}
{{- if .next}}
  <button class="next" data-page="{{.next}}">&raquo;</button>
{{- end}}
</nav>
{{- end}}
</div>
"#;

/// Parses `text` as a listing template.
pub fn parse_template(text: &str) -> Result<Template> {
    let mut template = Template::default();
    template.parse(text).map_err(Error::ParseTemplate)?;
    Ok(template)
}

/// Loads the template files' contents, joins them, and parses the result into
/// a template. Later files can `define` blocks used by earlier ones.
pub fn load_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        let template_file = template_file.as_ref();
        File::open(template_file)
            .and_then(|mut f| f.read_to_string(&mut contents))
            .map_err(|err| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err,
            })?;
        contents.push(' ');
    }
    parse_template(&contents)
}

/// Renders a listing straight into a string with `template`.
pub fn render_to_string(template: &Template, listing: &Listing) -> Result<String> {
    let mut out: Vec<u8> = Vec::new();
    execute(template, listing, &mut out)?;
    String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
}

/// Renders listings to HTML with a template, writing each rendering to `W`
/// in turn. Replacing earlier output (e.g. truncating a file, or swapping a
/// page region) is up to whoever owns `W`.
pub struct HtmlRenderer<W> {
    template: Template,
    out: W,
}

impl<W: Write> HtmlRenderer<W> {
    pub fn new(template: Template, out: W) -> HtmlRenderer<W> {
        HtmlRenderer { template, out }
    }

    /// A renderer using [`DEFAULT_TEMPLATE`].
    pub fn with_default_template(out: W) -> Result<HtmlRenderer<W>> {
        Ok(HtmlRenderer::new(parse_template(DEFAULT_TEMPLATE)?, out))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for HtmlRenderer<W> {
    fn render(&mut self, listing: &Listing) -> Result<()> {
        execute(&self.template, listing, &mut self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

fn execute<W: Write>(template: &Template, listing: &Listing, out: &mut W) -> Result<()> {
    let context = Context::from(Value::from(listing)).map_err(Error::Template)?;
    template.execute(out, &context).map_err(Error::Template)?;
    Ok(())
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a rendering operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    #[error("opening template file `{}`: {err}", path.display())]
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for errors parsing templates.
    #[error("parsing template: {0}")]
    ParseTemplate(String),

    /// Returned for errors executing a template.
    #[error("executing template: {0}")]
    Template(String),

    /// Returned when a card's link can't be built from its slug.
    #[error("building post URL: {0}")]
    Url(#[from] url::ParseError),

    /// Returned for errors writing the output.
    #[error(transparent)]
    Io(#[from] io::Error),
}
