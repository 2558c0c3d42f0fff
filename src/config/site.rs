//! Site configuration (_config.yml)

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Whether drafts are part of the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Local preview: drafts are visible
    Development,
    /// Published site: drafts are filtered out
    #[default]
    Production,
}

impl BuildMode {
    pub fn is_production(self) -> bool {
        matches!(self, BuildMode::Production)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Development => f.write_str("development"),
            BuildMode::Production => f.write_str("production"),
        }
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(BuildMode::Development),
            "production" | "prod" => Ok(BuildMode::Production),
            other => Err(format!(
                "unknown mode '{}', expected 'development' or 'production'",
                other
            )),
        }
    }
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    /// Author used when scaffolding new posts
    pub author: String,
    pub language: String,
    /// IANA timezone used when rendering feed dates
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    #[serde(default)]
    pub exclude: Vec<String>,

    // Build
    pub mode: BuildMode,

    // Blog
    pub posts_per_page: usize,
    pub default_read_time: u32,
    /// Moment.js-style format used when listing posts
    pub date_format: String,
    pub words_per_minute: usize,
    #[serde(default)]
    pub social_links: SocialLinks,

    // Feed
    #[serde(default)]
    pub feed: FeedConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Educational Blog".to_string(),
            description: "Learn, grow, and succeed with our educational content".to_string(),
            author: "Blog Team".to_string(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),

            url: "https://powergr.github.io".to_string(),
            root: "/cipherflow-visualizer/".to_string(),

            content_dir: "src/content/blog".to_string(),
            public_dir: "dist".to_string(),
            exclude: Vec::new(),

            mode: BuildMode::default(),

            posts_per_page: 10,
            default_read_time: 5,
            date_format: "YYYY-MM-DD".to_string(),
            words_per_minute: 200,
            social_links: SocialLinks::default(),

            feed: FeedConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Parse the configured timezone
    pub fn tz(&self) -> Result<chrono_tz::Tz> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(chrono_tz::UTC);
        }
        name.parse::<chrono_tz::Tz>()
            .map_err(|e| anyhow!("Invalid timezone '{}': {}", name, e))
    }
}

/// Links shown in the site footer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

impl Default for SocialLinks {
    fn default() -> Self {
        Self {
            twitter: Some("https://twitter.com/yourblog".to_string()),
            facebook: Some("https://facebook.com/yourblog".to_string()),
            linkedin: Some("https://linkedin.com/company/yourblog".to_string()),
            github: Some("https://github.com/yourblog".to_string()),
        }
    }
}

/// RSS feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    /// Output path relative to the public directory
    pub path: String,
    /// Channel title, falls back to the site title
    pub title: Option<String>,
    /// Channel description, falls back to the site description
    pub description: Option<String>,
    /// XSL stylesheet referenced from the feed
    pub stylesheet: Option<String>,
    /// Maximum number of items, unlimited when unset
    pub limit: Option<usize>,
    /// Prefix feed links and the stylesheet with `root`; links resolve
    /// against `url` alone otherwise
    pub root_links: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "rss.xml".to_string(),
            title: Some("CipherFlow Blog".to_string()),
            description: Some(
                "Learn how modern encryption works through clear, step-by-step visualizations."
                    .to_string(),
            ),
            stylesheet: Some("/rss/styles.xsl".to_string()),
            limit: None,
            root_links: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Educational Blog");
        assert_eq!(config.author, "Blog Team");
        assert_eq!(config.posts_per_page, 10);
        assert_eq!(config.default_read_time, 5);
        assert_eq!(config.mode, BuildMode::Production);
        assert!(config.feed.enable);
        assert!(!config.feed.root_links);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
mode: development
posts_per_page: 20
timezone: Europe/Athens
feed:
  path: feed.xml
  stylesheet: ~
  root_links: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.mode, BuildMode::Development);
        assert_eq!(config.posts_per_page, 20);
        assert_eq!(config.feed.path, "feed.xml");
        assert_eq!(config.feed.stylesheet, None);
        assert!(config.feed.root_links);
        assert!(config.feed.enable);
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::Athens);
    }

    #[test]
    fn test_invalid_timezone() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(config.tz().is_err());
    }

    #[test]
    fn test_build_mode_from_str() {
        assert_eq!("prod".parse::<BuildMode>(), Ok(BuildMode::Production));
        assert_eq!(
            "Development".parse::<BuildMode>(),
            Ok(BuildMode::Development)
        );
        assert!("staging".parse::<BuildMode>().is_err());
    }
}
