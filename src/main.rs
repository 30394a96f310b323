use anyhow::{anyhow, Context, Result};
use blogroll::config::{self, Config, Overrides};
use blogroll::controller::{Action, PostListController, DEFAULT_RECENT_COUNT};
use blogroll::feed::{write_feed, DEFAULT_FEED_LENGTH};
use blogroll::post::Post;
use blogroll::source;
use blogroll::widget::{html_renderer, Widget};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "blogroll")]
#[command(about = "Lists, filters and renders posts from a blog manifest", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory to start looking for `blogroll.yaml` in
    #[arg(long, global = true, default_value = ".")]
    config: PathBuf,

    /// Manifest URL or path, overriding the project file
    #[arg(long, global = true)]
    manifest: Option<String>,

    /// Base URL for post links, overriding the project file
    #[arg(long, global = true)]
    posts_url: Option<Url>,

    /// Posts per page, overriding the project file
    #[arg(long, global = true)]
    page_size: Option<NonZeroUsize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the listing as HTML
    Render {
        /// Category to filter by
        #[arg(short, long)]
        category: Option<String>,

        /// Page to show, starting at 1
        #[arg(short, long)]
        page: Option<usize>,

        /// File to write to instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the categories, starting with `all`
    Categories,

    /// Find posts whose title, excerpt or tags contain a term
    Search { query: String },

    /// List the featured posts
    Featured,

    /// List the newest posts
    Recent {
        #[arg(short = 'n', long, default_value_t = DEFAULT_RECENT_COUNT)]
        count: usize,
    },

    /// Write an Atom feed of the newest posts
    Feed {
        #[arg(short = 'n', long, default_value_t = DEFAULT_FEED_LENGTH)]
        count: usize,

        /// File to write to instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Render {
            category,
            page,
            output,
        } => {
            let out = output_writer(output.as_ref())?;
            let renderer = html_renderer(&config, out)?;
            let mut widget = Widget::from_config(&config, renderer)?;
            widget.load().await;
            if let Some(category) = category {
                widget.apply(Action::SelectCategory(category));
            }
            if let Some(page) = page {
                widget.apply(Action::SelectPage(page));
            }
            widget.render()?;
        }
        Commands::Categories => {
            let controller = load(&config).await?;
            let mut out = io::stdout().lock();
            for category in controller.list_categories() {
                writeln!(out, "{}", category)?;
            }
        }
        Commands::Search { query } => {
            let controller = load(&config).await?;
            print_posts(controller.search_posts(&query))?;
        }
        Commands::Featured => {
            let controller = load(&config).await?;
            print_posts(controller.featured_posts())?;
        }
        Commands::Recent { count } => {
            let controller = load(&config).await?;
            print_posts(controller.recent_posts(count))?;
        }
        Commands::Feed { count, output } => {
            let settings = config
                .feed
                .as_ref()
                .ok_or_else(|| anyhow!("no `feed` section in the project file"))?;
            let controller = load(&config).await?;
            write_feed(
                settings,
                controller.recent_posts(count),
                &config.posts_url,
                output_writer(output.as_ref())?,
            )?;
        }
    }

    Ok(())
}

/// Loads the project file with the flags applied on top, falling back to
/// flags alone when there is no project file.
fn load_config(cli: &Cli) -> Result<Config> {
    let overrides = Overrides {
        manifest: cli.manifest.clone(),
        posts_url: cli.posts_url.clone(),
        page_size: cli.page_size,
    };
    Config::discover(&cli.config, &overrides).map_err(|err| match err {
        config::Error::NotFound { .. } => anyhow!(
            "{}; pass --manifest and --posts-url or create one",
            err
        ),
        err => err.into(),
    })
}

async fn load(config: &Config) -> Result<PostListController> {
    let source = source::from_location(&config.manifest, &config.base_directory, config.timeout)
        .with_context(|| format!("opening manifest `{}`", config.manifest))?;
    let mut controller = PostListController::new(config.page_size);
    controller.load(source.as_ref()).await;
    Ok(controller)
}

fn output_writer(output: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating `{}`", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    })
}

fn print_posts<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Result<()> {
    let mut out = io::stdout().lock();
    for post in posts {
        writeln!(out, "{} {} {}", post.date, post.slug, post.title)?;
    }
    Ok(())
}
