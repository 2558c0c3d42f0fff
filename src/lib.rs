//! cipherflow-blog: content schema, post queries and RSS feed for the
//! CipherFlow educational blog
//!
//! Posts are markdown/MDX documents whose front-matter is validated against a
//! fixed schema. The validated collection can be filtered, sorted and
//! aggregated with the functions in [`content::query`], and published posts
//! are syndicated through an RSS feed.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;

use anyhow::Result;
use std::path::{Path, PathBuf};

use config::{BuildMode, SiteConfig};
use content::{ContentLoader, Post};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// A blog site on disk
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the post documents
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Whether drafts are filtered out
    pub mode: BuildMode,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog instance from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let mode = config.mode;

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            mode,
        }
    }

    /// Override the configured build mode
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Load and validate every post in the content directory
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts = ContentLoader::new(self)?.load_posts()?;
        Ok(posts)
    }

    /// Load posts and drop drafts according to the build mode
    pub fn published_posts(&self) -> Result<Vec<Post>> {
        let posts = self.load_posts()?;
        Ok(content::query::filter_published(&posts, self.mode)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Write the RSS feed
    pub fn generate_feed(&self) -> Result<Option<PathBuf>> {
        commands::feed::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
