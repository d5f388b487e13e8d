//! # blog-press CLI
//!
//! Renders one web article to a paginated text artifact and adds it to the
//! period's collection.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use blog_press::fetch::parse_source_url;
use blog_press::{
    CollectionUpdate, Fetched, HttpFetcher, Period, Press, PressOptions, PressOutcome,
    TextRenderer,
};
use chrono::{Local, NaiveDate};
use clap::Parser;

#[derive(Parser)]
#[command(name = "blog-press")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Article URL
    url: String,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read markup from a local file instead of fetching the URL
    #[arg(long)]
    markup: Option<PathBuf>,

    /// Directory for rendered articles
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Directory for collections (defaults to the output directory)
    #[arg(long)]
    collection_dir: Option<PathBuf>,

    /// Replace the URL-derived part of the artifact name
    #[arg(long)]
    name: Option<String>,

    /// Date used for naming, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Do not regenerate the table of contents
    #[arg(long)]
    no_toc: bool,

    /// Do not add a cover page
    #[arg(long)]
    no_cover: bool,

    /// Do not merge into the collection
    #[arg(long)]
    no_collection: bool,

    /// Name the artifact after date, author and title
    #[arg(long)]
    identity_naming: bool,

    /// Skip the merge when the collection already lists this artifact
    #[arg(long)]
    deduplicate: bool,

    /// Collection period: daily or monthly
    #[arg(long)]
    period: Option<Period>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Result<PressOptions> {
        let mut options = match &self.config {
            Some(path) => PressOptions::load(path)?,
            None => PressOptions::default(),
        };
        if self.no_toc {
            options.include_toc = false;
        }
        if self.no_cover {
            options.include_cover = false;
        }
        if self.no_collection {
            options.auto_add_to_collection = false;
        }
        if self.identity_naming {
            options.identity_naming = true;
        }
        if self.deduplicate {
            options.deduplicate = true;
        }
        if let Some(period) = self.period {
            options.period = period;
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = cli.options()?;
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let collection_dir = cli
        .collection_dir
        .clone()
        .unwrap_or_else(|| cli.output_dir.clone());

    let fetcher = HttpFetcher::new()?;
    let press = Press::new(fetcher, TextRenderer::new(), options)
        .with_output_dir(&cli.output_dir)
        .with_collection_dir(collection_dir);

    let outcome = match &cli.markup {
        Some(path) => {
            let url = parse_source_url(&cli.url)?;
            let bytes =
                fs::read(path).with_context(|| format!("reading markup {}", path.display()))?;
            let fetched = Fetched {
                bytes,
                content_type: None,
            };
            press.process_fetched(&url, &fetched, date, cli.name.as_deref())
        }
        None => press.process(&cli.url, date, cli.name.as_deref()),
    }
    .with_context(|| format!("processing {}", cli.url))?;

    report(&outcome);
    Ok(())
}

fn report(outcome: &PressOutcome) {
    match outcome {
        PressOutcome::Stored { path, bytes } => {
            println!("Stored {} ({} bytes)", path.display(), bytes);
        }
        PressOutcome::Rendered {
            path,
            title,
            author,
            page_count,
            collection,
            ..
        } => {
            println!("Rendered {} ({} pages)", path.display(), page_count);
            println!("  {} by {}", title, author);
            match collection {
                CollectionUpdate::Disabled => {}
                CollectionUpdate::Merged { path, entry } => println!(
                    "Added to {} (pages {}-{})",
                    path.display(),
                    entry.start_page,
                    entry.end_page
                ),
                CollectionUpdate::SkippedDuplicate { path } => {
                    println!("Already in {}, not added again", path.display())
                }
            }
        }
    }
}
