//! Create a new post

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::content::{parse_post, ArticleType, Difficulty};
use crate::Blog;

/// Front-matter choices for a new post
#[derive(Debug, Clone, Default)]
pub struct NewPostOptions {
    /// Defaults to the post title
    pub description: Option<String>,
    /// Defaults to the configured site author
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub difficulty: Difficulty,
    pub article_type: ArticleType,
    pub draft: bool,
    /// File name (without extension) relative to the content directory
    pub path: Option<String>,
}

/// Create a new post and return its path
pub fn create_post(blog: &Blog, title: &str, options: &NewPostOptions) -> Result<PathBuf> {
    let now = chrono::Utc::now();

    let name = match &options.path {
        Some(p) => p.trim_end_matches('/').to_string(),
        None => slug::slugify(title),
    };
    if name.is_empty() {
        bail!("Cannot derive a file name from title {:?}", title);
    }
    if !stays_inside(Path::new(&name)) {
        bail!("Post path {:?} must stay inside the content directory", name);
    }

    let file_path = blog.content_dir.join(format!("{}.md", name));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = blog.base_dir.join("scaffolds").join("post.md");
    let scaffold = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        DEFAULT_SCAFFOLD.to_string()
    };

    let author = options.author.as_deref().unwrap_or(&blog.config.author);
    let description = options.description.as_deref().unwrap_or(title);
    let category = options.category.as_deref().map(yaml_scalar);

    let content = scaffold
        .replace("{{ title }}", &yaml_scalar(title))
        .replace("{{ description }}", &yaml_scalar(description))
        .replace("{{ date }}", &now.format("%Y-%m-%d").to_string())
        .replace("{{ author }}", &yaml_scalar(author))
        .replace("{{ tags }}", &yaml_list(&options.tags))
        .replace("{{ category }}", category.as_deref().unwrap_or("~"))
        .replace("{{ difficulty }}", options.difficulty.as_str())
        .replace("{{ article_type }}", options.article_type.as_str())
        .replace("{{ draft }}", if options.draft { "true" } else { "false" });

    // Never write a post the loader would reject
    parse_post(&name, &content)
        .with_context(|| format!("Scaffold {:?} produced an invalid post", scaffold_path))?;

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}

const DEFAULT_SCAFFOLD: &str = r#"---
title: {{ title }}
description: {{ description }}
pubDate: {{ date }}
author: {{ author }}
tags: {{ tags }}
category: {{ category }}
difficulty: {{ difficulty }}
articleType: {{ article_type }}
draft: {{ draft }}
prerequisites: []
learningObjectives: []
---
"#;

/// Only plain names: no `..`, root or prefix components
fn stays_inside(relative: &Path) -> bool {
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

/// Render a string as a single-line YAML scalar, quoting when needed
fn yaml_scalar(s: &str) -> String {
    serde_yaml::to_string(s)
        .map(|y| y.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", s))
}

/// Render a flow-style YAML list
fn yaml_list(items: &[String]) -> String {
    let items: Vec<String> = items.iter().map(|s| yaml_scalar(s)).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::Post;
    use tempfile::TempDir;

    fn blog() -> (TempDir, Blog) {
        let dir = TempDir::new().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        (dir, blog)
    }

    fn read_post(path: &std::path::Path) -> Post {
        parse_post("x", &fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_create_post_defaults() {
        let (_dir, blog) = blog();
        let path = create_post(&blog, "AES: The Basics", &NewPostOptions::default()).unwrap();
        assert_eq!(path, blog.content_dir.join("aes-the-basics.md"));

        let post = read_post(&path);
        assert_eq!(post.data.title, "AES: The Basics");
        assert_eq!(post.data.description, "AES: The Basics");
        assert_eq!(post.data.author, "Blog Team");
        assert_eq!(post.data.category, None);
        assert!(post.data.tags.is_empty());
        assert!(!post.data.draft);
    }

    #[test]
    fn test_create_post_with_options() {
        let (_dir, blog) = blog();
        let options = NewPostOptions {
            description: Some("Keys and primes".to_string()),
            author: Some("Sam".to_string()),
            tags: vec!["rsa".to_string(), "public key".to_string()],
            category: Some("Asymmetric".to_string()),
            difficulty: Difficulty::Intermediate,
            article_type: ArticleType::Tutorial,
            draft: true,
            path: Some("guides/rsa".to_string()),
        };
        let path = create_post(&blog, "RSA", &options).unwrap();
        assert_eq!(path, blog.content_dir.join("guides/rsa.md"));

        let post = read_post(&path);
        assert_eq!(post.data.author, "Sam");
        assert_eq!(post.data.tags, vec!["rsa", "public key"]);
        assert_eq!(post.data.category.as_deref(), Some("Asymmetric"));
        assert_eq!(post.data.difficulty, Difficulty::Intermediate);
        assert_eq!(post.data.article_type, ArticleType::Tutorial);
        assert!(post.data.draft);
    }

    #[test]
    fn test_create_post_refuses_overwrite() {
        let (_dir, blog) = blog();
        create_post(&blog, "Hello", &NewPostOptions::default()).unwrap();
        assert!(create_post(&blog, "Hello", &NewPostOptions::default()).is_err());
    }

    #[test]
    fn test_create_post_rejects_invalid_scaffold() {
        let (_dir, blog) = blog();
        let scaffolds = blog.base_dir.join("scaffolds");
        fs::create_dir_all(&scaffolds).unwrap();
        fs::write(scaffolds.join("post.md"), "---\ntitle: {{ title }}\n---\n").unwrap();

        assert!(create_post(&blog, "Hello", &NewPostOptions::default()).is_err());
        assert!(!blog.content_dir.join("hello.md").exists());
    }

    #[test]
    fn test_create_post_rejects_path_outside_content_dir() {
        let (dir, blog) = blog();
        for path in ["../../escaped", "guides/../../escaped", "/tmp/escaped"] {
            let options = NewPostOptions {
                path: Some(path.to_string()),
                ..Default::default()
            };
            assert!(create_post(&blog, "Escaped", &options).is_err(), "{}", path);
        }
        assert!(!dir.path().join("escaped.md").exists());
        assert!(!blog.content_dir.join("guides").exists());
    }

    #[test]
    fn test_stays_inside() {
        assert!(stays_inside(Path::new("guides/rsa")));
        assert!(!stays_inside(Path::new("../rsa")));
        assert!(!stays_inside(Path::new("./rsa")));
        assert!(!stays_inside(Path::new("/rsa")));
    }

    #[test]
    fn test_yaml_scalar_quotes_when_needed() {
        assert_eq!(yaml_scalar("plain"), "plain");
        assert_ne!(yaml_scalar("a: b"), "a: b");
        assert_ne!(yaml_scalar("true"), "true");
    }
}
