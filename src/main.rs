//! CLI entry point for cipherflow-blog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cipherflow_blog::commands::list::{ListFilter, ListKind};
use cipherflow_blog::commands::new::NewPostOptions;
use cipherflow_blog::config::BuildMode;
use cipherflow_blog::content::query::DEFAULT_RELATED_LIMIT;
use cipherflow_blog::content::{ArticleType, Difficulty};
use cipherflow_blog::Blog;

#[derive(Parser)]
#[command(name = "cipherflow-blog")]
#[command(version)]
#[command(about = "Validate, query and syndicate the CipherFlow blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Build mode (development shows drafts); overrides the config file
    #[arg(short, long, global = true)]
    mode: Option<BuildMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Summary used in listings and the feed
        #[arg(long)]
        description: Option<String>,

        /// Author (defaults to the site author)
        #[arg(short, long)]
        author: Option<String>,

        /// Tag, may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Category
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// beginner, intermediate or advanced
        #[arg(long, default_value_t = Difficulty::default())]
        difficulty: Difficulty,

        /// article, tutorial, guide, review or news
        #[arg(long = "type", default_value_t = ArticleType::default())]
        article_type: ArticleType,

        /// Mark the post as a draft
        #[arg(long)]
        draft: bool,

        /// Path for the new post, relative to the content directory
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Validate every post
    Check,

    /// List site information
    List {
        /// Type of content to list (posts, featured, tags, categories)
        #[arg(default_value = "posts")]
        r#type: ListKind,

        /// Only posts with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only posts in this category
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Only posts at this difficulty
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Page to show
        #[arg(short, long)]
        page: Option<usize>,
    },

    /// Show posts sharing tags with a post
    Related {
        /// Slug of the post
        slug: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = DEFAULT_RELATED_LIMIT)]
        limit: usize,
    },

    /// Generate the RSS feed
    Feed {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "cipherflow_blog=debug,info"
    } else {
        "cipherflow_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    let open_blog = || -> Result<Blog> {
        let blog = Blog::new(&base_dir)?;
        Ok(match cli.mode {
            Some(mode) => blog.with_mode(mode),
            None => blog,
        })
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            cipherflow_blog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            description,
            author,
            tags,
            category,
            difficulty,
            article_type,
            draft,
            path,
        } => {
            let blog = open_blog()?;
            tracing::info!("Creating new post with title: {}", title);
            let options = NewPostOptions {
                description,
                author,
                tags,
                category,
                difficulty,
                article_type,
                draft,
                path,
            };
            cipherflow_blog::commands::new::create_post(&blog, &title, &options)?;
        }

        Commands::Check => {
            let blog = open_blog()?;
            cipherflow_blog::commands::check::run(&blog)?;
        }

        Commands::List {
            r#type,
            tag,
            category,
            difficulty,
            page,
        } => {
            let blog = open_blog()?;
            let filter = ListFilter {
                tag,
                category,
                difficulty,
                page,
            };
            cipherflow_blog::commands::list::run(&blog, r#type, &filter)?;
        }

        Commands::Related { slug, limit } => {
            let blog = open_blog()?;
            cipherflow_blog::commands::list::related(&blog, &slug, limit)?;
        }

        Commands::Feed { watch } => {
            let blog = open_blog()?;
            tracing::info!("Generating feed...");

            match blog.generate_feed()? {
                Some(path) => println!("Wrote {}", path.display()),
                None => println!("Feed disabled in config"),
            }

            if watch {
                cipherflow_blog::commands::feed::watch(&blog).await?;
            }
        }

        Commands::Clean => {
            let blog = open_blog()?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("cipherflow-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
