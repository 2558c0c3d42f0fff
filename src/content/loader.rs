//! Content loader - loads and validates posts from the content directory

use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::frontmatter::{FrontMatter, FrontMatterError};
use super::post::Post;
use super::schema::{validate_post, ValidationErrors};
use crate::Blog;

/// Errors raised while materializing the collection
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("{path:?}: invalid front-matter: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: ValidationErrors,
    },

    #[error("invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{count} post(s) failed validation")]
    Invalid { count: usize },

    #[error("slug '{slug}' is shared by {paths:?}")]
    DuplicateSlug { slug: String, paths: Vec<PathBuf> },
}

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    exclude: Vec<Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Result<Self, LoadError> {
        let exclude = blog
            .config
            .exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| LoadError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { blog, exclude })
    }

    /// Load every post, sorted by slug.
    ///
    /// Each broken document is logged; if any failed the whole load fails.
    pub fn load_posts(&self) -> Result<Vec<Post>, LoadError> {
        let content_dir = &self.blog.content_dir;
        if !content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", content_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        let mut failed = 0;

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_content_file(path) {
                continue;
            }

            let relative = path.strip_prefix(content_dir).unwrap_or(path);
            if self.is_ignored(relative) {
                tracing::debug!("Skipping {:?}", relative);
                continue;
            }

            match self.load_post(path, relative) {
                Ok(post) => posts.push((post, relative.to_path_buf())),
                Err(e) => {
                    tracing::error!("{}", e);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(LoadError::Invalid { count: failed });
        }

        posts.sort_by(|(a, pa), (b, pb)| a.slug.cmp(&b.slug).then_with(|| pa.cmp(pb)));
        check_unique_slugs(&posts)?;
        tracing::debug!("Loaded {} posts from {:?}", posts.len(), content_dir);

        Ok(posts.into_iter().map(|(post, _)| post).collect())
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path, relative: &Path) -> Result<Post, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_post(&slug_for(relative), &content).map_err(|e| match e {
            ParseError::FrontMatter(source) => LoadError::FrontMatter {
                path: relative.to_path_buf(),
                source,
            },
            ParseError::Schema(source) => LoadError::Schema {
                path: relative.to_path_buf(),
                source,
            },
        })
    }

    /// `_`-prefixed files and directories are private, like drafts folders
    fn is_ignored(&self, relative: &Path) -> bool {
        let private = relative.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|s| s.starts_with('_'))
        });
        private || self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

/// The slug is a post's identity; two documents may not share one.
/// Expects `posts` sorted by slug.
fn check_unique_slugs(posts: &[(Post, PathBuf)]) -> Result<(), LoadError> {
    let mut start = 0;
    while start < posts.len() {
        let slug = &posts[start].0.slug;
        let end = posts[start..]
            .iter()
            .position(|(p, _)| &p.slug != slug)
            .map_or(posts.len(), |n| start + n);
        if end - start > 1 {
            return Err(LoadError::DuplicateSlug {
                slug: slug.clone(),
                paths: posts[start..end].iter().map(|(_, path)| path.clone()).collect(),
            });
        }
        start = end;
    }
    Ok(())
}

/// Why a document could not become a post
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),

    #[error(transparent)]
    Schema(#[from] ValidationErrors),
}

/// Split and validate one document
pub fn parse_post(slug: &str, content: &str) -> Result<Post, ParseError> {
    let (fm, body) = FrontMatter::parse(content)?;
    Ok(validate_post(slug, &fm.data, body)?)
}

/// Slug of a document: its relative path without extension, each segment slugified
pub fn slug_for(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    without_ext
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(slug::slugify)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if a file is a markdown or MDX document
fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "mdx" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    const VALID: &str =
        "---\ntitle: T\ndescription: D\npubDate: 2024-01-01\nauthor: A\n---\nBody text\n";

    fn blog_with(files: &[(&str, &str)], exclude: &[&str]) -> (TempDir, Blog) {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig {
            content_dir: "content".to_string(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let blog = Blog::with_config(dir.path(), config);
        for (name, content) in files {
            let path = blog.content_dir.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        (dir, blog)
    }

    #[test]
    fn test_slug_for() {
        assert_eq!(slug_for(Path::new("aes.md")), "aes");
        assert_eq!(slug_for(Path::new("guides/RSA Basics.mdx")), "guides/rsa-basics");
    }

    #[test]
    fn test_parse_post() {
        let post = parse_post("t", VALID).unwrap();
        assert_eq!(post.data.title, "T");
        assert_eq!(post.body, "Body text\n");

        let err = parse_post("t", "no front-matter here").unwrap_err();
        assert!(matches!(err, ParseError::Schema(ref e) if e.has("title")));
    }

    #[test]
    fn test_load_posts() {
        let (_dir, blog) = blog_with(
            &[
                ("zeta.md", VALID),
                ("guides/alpha.mdx", VALID),
                ("notes.txt", "ignored"),
                ("_drafts/wip.md", "not even front-matter"),
                ("skip/me.md", "broken"),
            ],
            &["skip/*"],
        );
        let posts = ContentLoader::new(&blog).unwrap().load_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["guides/alpha", "zeta"]);
    }

    #[test]
    fn test_load_posts_fails_on_invalid_document() {
        let (_dir, blog) = blog_with(
            &[
                ("good.md", VALID),
                ("bad.md", "---\ntitle: T\n---\n"),
                ("worse.md", "---\ntitle: [\n---\n"),
            ],
            &[],
        );
        let err = ContentLoader::new(&blog).unwrap().load_posts().unwrap_err();
        assert!(matches!(err, LoadError::Invalid { count: 2 }));
    }

    #[test]
    fn test_load_posts_rejects_shared_slugs() {
        let (_dir, blog) = blog_with(&[("aes.md", VALID), ("aes.mdx", VALID)], &[]);
        let err = ContentLoader::new(&blog).unwrap().load_posts().unwrap_err();
        match err {
            LoadError::DuplicateSlug { slug, paths } => {
                assert_eq!(slug, "aes");
                assert_eq!(paths, [PathBuf::from("aes.md"), PathBuf::from("aes.mdx")]);
            }
            other => panic!("unexpected error: {}", other),
        }

        let (_dir, blog) = blog_with(
            &[("RSA Basics.md", VALID), ("rsa-basics.md", VALID), ("zeta.md", VALID)],
            &[],
        );
        let err = ContentLoader::new(&blog).unwrap().load_posts().unwrap_err();
        assert!(matches!(
            err,
            LoadError::DuplicateSlug { ref slug, .. } if slug == "rsa-basics"
        ));
    }

    #[test]
    fn test_missing_content_dir() {
        let (_dir, blog) = blog_with(&[], &[]);
        let posts = ContentLoader::new(&blog).unwrap().load_posts().unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let (_dir, blog) = blog_with(&[], &["[unclosed"]);
        assert!(matches!(
            ContentLoader::new(&blog),
            Err(LoadError::Pattern { .. })
        ));
    }
}
