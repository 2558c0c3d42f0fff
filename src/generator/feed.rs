//! RSS feed generation
//!
//! Published posts, newest first, become the items of an RSS 2.0 channel.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rss::{validation::Validate, ChannelBuilder, GuidBuilder, ItemBuilder};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{BuildMode, SiteConfig};
use crate::content::query::{filter_published, sort_by_date};
use crate::content::Post;
use crate::helpers::{date_rfc2822, full_url_for, post_path, site_url_for, url_for};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// One entry of the feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub pub_date: DateTime<Utc>,
    pub description: String,
    pub link: String,
}

impl FeedItem {
    pub fn from_post(config: &SiteConfig, post: &Post) -> Self {
        Self {
            title: post.data.title.clone(),
            pub_date: post.data.pub_date,
            description: post.data.description.clone(),
            link: feed_url(config, &post_path(&post.slug)),
        }
    }
}

/// Feed items for `posts`: drafts dropped per `mode`, newest first, capped by `feed.limit`
pub fn feed_items<'a, I>(config: &SiteConfig, posts: I, mode: BuildMode) -> Vec<FeedItem>
where
    I: IntoIterator<Item = &'a Post>,
{
    let limit = config.feed.limit.unwrap_or(usize::MAX);
    sort_by_date(filter_published(posts, mode))
        .into_iter()
        .take(limit)
        .map(|post| FeedItem::from_post(config, post))
        .collect()
}

/// Write the feed if enabled in config, returning where it went
pub fn build_feed(
    config: &SiteConfig,
    posts: &[Post],
    mode: BuildMode,
    public_dir: &Path,
) -> Result<Option<PathBuf>> {
    if !config.feed.enable {
        tracing::debug!("Feed disabled, skipping");
        return Ok(None);
    }
    let path = RssFeed::build(config, posts, mode).write(public_dir)?;
    Ok(Some(path))
}

/// rss feed builder
pub struct RssFeed<'a> {
    config: &'a SiteConfig,
    items: Vec<FeedItem>,
}

impl<'a> RssFeed<'a> {
    pub fn build<'p, I>(config: &'a SiteConfig, posts: I, mode: BuildMode) -> Self
    where
        I: IntoIterator<Item = &'p Post>,
    {
        Self {
            config,
            items: feed_items(config, posts, mode),
        }
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Generate rss xml string
    pub fn into_xml(self) -> Result<String> {
        let tz = self.config.tz()?;
        let feed = &self.config.feed;

        let last_build_date = self
            .items
            .iter()
            .map(|item| item.pub_date)
            .max()
            .map(|date| date_rfc2822(&date, &tz));

        let items: Vec<rss::Item> = self
            .items
            .iter()
            .map(|item| {
                ItemBuilder::default()
                    .title(item.title.clone())
                    .link(item.link.clone())
                    .guid(
                        GuidBuilder::default()
                            .permalink(true)
                            .value(item.link.clone())
                            .build(),
                    )
                    .description(item.description.clone())
                    .pub_date(date_rfc2822(&item.pub_date, &tz))
                    .build()
            })
            .collect();

        let channel = ChannelBuilder::default()
            .title(feed.title.as_deref().unwrap_or(&self.config.title))
            .link(feed_url(self.config, "/"))
            .description(
                feed.description
                    .as_deref()
                    .unwrap_or(&self.config.description),
            )
            .language(self.config.language.clone())
            .generator("cipherflow-blog".to_string())
            .last_build_date(last_build_date)
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| anyhow!("rss validation failed: {e}"))?;

        let xml = format!("{}\n{}", XML_DECLARATION, channel.to_string());
        Ok(match &feed.stylesheet {
            Some(href) => with_stylesheet(&xml, &stylesheet_href(self.config, href)),
            None => xml,
        })
    }

    /// Write rss feed to file
    pub fn write(self, public_dir: &Path) -> Result<PathBuf> {
        let path = public_dir.join(&self.config.feed.path);
        let count = self.items.len();
        let xml = self.into_xml()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, xml)?;

        tracing::info!("Generated {:?} with {} items", path, count);
        Ok(path)
    }
}

/// Absolute URL for a root-relative path, honouring `feed.root_links`
fn feed_url(config: &SiteConfig, path: &str) -> String {
    if config.feed.root_links {
        full_url_for(config, path)
    } else {
        site_url_for(config, path)
    }
}

/// The stylesheet only gets the `root` prefix when `feed.root_links` is set
fn stylesheet_href(config: &SiteConfig, href: &str) -> String {
    let absolute = href.contains("://") || href.starts_with("//");
    if config.feed.root_links && !absolute {
        url_for(config, href)
    } else {
        href.to_string()
    }
}

/// Insert an `xml-stylesheet` instruction right after the XML declaration
fn with_stylesheet(xml: &str, href: &str) -> String {
    let instruction = format!(
        r#"<?xml-stylesheet href="{}" type="text/xsl"?>"#,
        escape_xml(href)
    );
    if xml.starts_with("<?xml") {
        if let Some(end) = xml.find("?>") {
            let (decl, rest) = xml.split_at(end + 2);
            return format!("{}\n{}{}", decl, instruction, rest);
        }
    }
    format!("{}\n{}", instruction, xml)
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
