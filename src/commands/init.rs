//! Initialize a new blog

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# CipherFlow Blog configuration

# Site
title: Educational Blog
description: Learn, grow, and succeed with our educational content
author: Blog Team
language: en
timezone: UTC

# URL
url: https://powergr.github.io
root: /cipherflow-visualizer/

# Directory
content_dir: src/content/blog
public_dir: dist
exclude: []

# Build mode: production hides drafts, development shows them
mode: production

# Blog
posts_per_page: 10
default_read_time: 5
date_format: YYYY-MM-DD
words_per_minute: 200
social_links:
  twitter: https://twitter.com/yourblog
  facebook: https://facebook.com/yourblog
  linkedin: https://linkedin.com/company/yourblog
  github: https://github.com/yourblog

# Feed
feed:
  enable: true
  path: rss.xml
  title: CipherFlow Blog
  description: Learn how modern encryption works through clear, step-by-step visualizations.
  stylesheet: /rss/styles.xsl
  # Links resolve against url; set true to prefix them with root
  root_links: false
"#;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("{:?} already exists, refusing to overwrite", config_path);
    }

    fs::create_dir_all(target_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let config = SiteConfig::default();
    let content_dir = target_dir.join(&config.content_dir);
    fs::create_dir_all(&content_dir)?;

    let today = chrono::Utc::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: Welcome to CipherFlow
description: What this blog covers and how to read the visualizations
pubDate: {}
author: {}
tags: [welcome]
category: General
featured: true
difficulty: beginner
articleType: guide
learningObjectives:
  - Find your way around the blog
---

Welcome! Every article walks through one cryptographic idea step by step,
with an interactive visualizer where it helps.

Create your next post with `cipherflow-blog new "My Post"`, check the content
with `cipherflow-blog check`, and write the feed with `cipherflow-blog feed`.
"#,
        today, config.author
    );

    fs::write(content_dir.join("welcome.md"), sample_post)?;
    tracing::debug!("Wrote sample post to {:?}", content_dir);

    Ok(())
}
