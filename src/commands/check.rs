//! Validate every post in the collection

use anyhow::Result;
use std::collections::HashSet;

use crate::content::query::{get_all_categories, get_all_tags, get_featured};
use crate::content::Post;
use crate::Blog;

/// What a successful check found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub posts: usize,
    pub drafts: usize,
    pub featured: usize,
    pub tags: usize,
    pub categories: usize,
    /// `(slug, missing related slug)` pairs
    pub dangling_related: Vec<(String, String)>,
}

/// Load and validate the collection, then print a summary
pub fn run(blog: &Blog) -> Result<CheckReport> {
    let posts = blog.load_posts()?;
    let report = summarize(&posts);

    for (slug, missing) in &report.dangling_related {
        tracing::warn!("{}: relatedPosts entry '{}' matches no post", slug, missing);
    }

    println!(
        "{} posts OK ({} drafts, {} featured), {} tags, {} categories",
        report.posts, report.drafts, report.featured, report.tags, report.categories
    );

    Ok(report)
}

/// Collect counts and cross-post problems
pub fn summarize(posts: &[Post]) -> CheckReport {
    let slugs: HashSet<&str> = posts.iter().map(|p| p.slug.as_str()).collect();

    let dangling_related = posts
        .iter()
        .flat_map(|post| {
            post.data
                .related_posts
                .iter()
                .filter(|related| !slugs.contains(related.trim_matches('/')))
                .map(|related| (post.slug.clone(), related.clone()))
        })
        .collect();

    CheckReport {
        posts: posts.len(),
        drafts: posts.iter().filter(|p| p.data.draft).count(),
        featured: get_featured(posts).len(),
        tags: get_all_tags(posts).len(),
        categories: get_all_categories(posts).len(),
        dangling_related,
    }
}
