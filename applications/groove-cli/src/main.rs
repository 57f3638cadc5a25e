/// Groove CLI - browse a catalog and run simulated playback sessions
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use groove_cli::{load_catalog, run, CliError, GrooveConfig, PlayOptions};
use groove_core::{CatalogFilter, CatalogQuery, Page, SortOption};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "groove-cli")]
#[command(about = "Groove player headless client", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./groove.toml if present)
    #[arg(short, long, global = true, env = "GROOVE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of the catalog view
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Play the catalog view through a simulated element
    Play {
        #[command(flatten)]
        query: QueryArgs,

        /// Track id to start with (default: first in the view)
        #[arg(long)]
        start: Option<i64>,

        /// Loop the starting track (combine with --max-ticks)
        #[arg(long)]
        repeat_one: bool,

        /// Volume to apply before starting (0-100)
        #[arg(long)]
        volume: Option<f64>,

        /// Stop after this many clock ticks
        #[arg(long)]
        max_ticks: Option<u64>,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// JSON catalog file (overrides catalog.path from the configuration)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Search title and artist
    #[arg(short, long, default_value = "")]
    search: String,

    /// Only tracks by this artist
    #[arg(long, conflicts_with = "album")]
    artist: Option<String>,

    /// Only tracks on this album
    #[arg(long)]
    album: Option<String>,

    /// title-asc, title-desc, artist-asc or artist-desc
    #[arg(long, default_value_t = SortOption::TitleAsc)]
    sort: SortOption,
}

impl QueryArgs {
    fn query(&self) -> CatalogQuery {
        let filter = match (&self.artist, &self.album) {
            (Some(artist), _) => Some(CatalogFilter::Artist(artist.clone())),
            (None, Some(album)) => Some(CatalogFilter::Album(album.clone())),
            (None, None) => None,
        };
        CatalogQuery {
            search: self.search.clone(),
            filter,
            sort: self.sort,
        }
    }

    fn catalog_path<'a>(&'a self, config: &'a GrooveConfig) -> Result<&'a Path, CliError> {
        self.catalog
            .as_deref()
            .or(config.catalog.path.as_deref())
            .ok_or_else(|| {
                CliError::Config("no catalog given (use --catalog or set catalog.path)".to_string())
            })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groove_cli=info,groove_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = GrooveConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::List { query, page } => {
            let tracks = load_catalog(query.catalog_path(&config)?)?;
            let view = query.query().apply(&tracks);
            let page = Page::of(&view, page, config.player.page_size);

            for track in &page.items {
                println!(
                    "{:>6}  {:<32}  {:<24}  {}",
                    track.id,
                    track.title,
                    track.artist,
                    track.album.as_deref().unwrap_or("-")
                );
            }
            println!(
                "page {}/{} ({} tracks)",
                page.page,
                page.total_pages.max(1),
                page.total_items
            );
        }
        Commands::Play {
            query,
            start,
            repeat_one,
            volume,
            max_ticks,
        } => {
            let tracks = load_catalog(query.catalog_path(&config)?)?;
            let options = PlayOptions {
                query: query.query(),
                start,
                repeat_one,
                volume,
                max_ticks,
            };

            let report = run(&tracks, options, &config.player).await?;
            println!(
                "played {} track(s) in {} tick(s), stopped at {}/{}",
                report.played.len(),
                report.ticks,
                report.final_status.position_label,
                report.final_status.duration_label
            );
        }
    }

    Ok(())
}
