//! Post query utilities
//!
//! Pure functions over an ordered collection of posts. They accept anything
//! that iterates `&Post` (a `&Vec<Post>`, or the `Vec<&Post>` returned by
//! another query) so calls can be chained without cloning posts.

use indexmap::IndexMap;
use std::collections::BTreeSet;

use super::post::{Difficulty, Post};
use crate::config::BuildMode;

/// Reading speed assumed when none is given
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// Number of related posts shown under an article
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Drop drafts in production; keep everything otherwise
pub fn filter_published<'a, I>(posts: I, mode: BuildMode) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts
        .into_iter()
        .filter(|p| !mode.is_production() || !p.data.draft)
        .collect()
}

/// Newest first; posts with the same date keep their relative order
pub fn sort_by_date<'a, I>(posts: I) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut sorted: Vec<&Post> = posts.into_iter().collect();
    sorted.sort_by(|a, b| b.data.pub_date.cmp(&a.data.pub_date));
    sorted
}

/// Posts whose category equals `category`, ignoring case
pub fn filter_by_category<'a, I>(posts: I, category: &str) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let category = category.to_lowercase();
    posts
        .into_iter()
        .filter(|p| {
            p.data
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == category)
        })
        .collect()
}

/// Posts carrying `tag`, ignoring case
pub fn filter_by_tag<'a, I>(posts: I, tag: &str) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let tag = tag.to_lowercase();
    posts
        .into_iter()
        .filter(|p| p.data.tags.iter().any(|t| t.to_lowercase() == tag))
        .collect()
}

pub fn filter_by_difficulty<'a, I>(posts: I, difficulty: Difficulty) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts
        .into_iter()
        .filter(|p| p.data.difficulty == difficulty)
        .collect()
}

pub fn get_featured<'a, I>(posts: I) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts.into_iter().filter(|p| p.data.featured).collect()
}

/// Posts sharing tags with `current`, most shared tags first, at most `limit`.
///
/// `current` itself is excluded by slug. Posts with the same number of shared
/// tags keep their order from `posts`.
pub fn get_related<'a, I>(posts: I, current: &Post, limit: usize) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let shared = |post: &Post| {
        post.data
            .tags
            .iter()
            .filter(|t| current.data.tags.contains(*t))
            .count()
    };

    let mut related: Vec<(usize, &Post)> = posts
        .into_iter()
        .filter(|p| p.slug != current.slug)
        .map(|p| (shared(p), p))
        .filter(|(count, _)| *count > 0)
        .collect();

    related.sort_by(|a, b| b.0.cmp(&a.0));
    related.into_iter().take(limit).map(|(_, p)| p).collect()
}

/// Every tag in use, deduplicated and sorted (case-sensitive)
pub fn get_all_tags<'a, I>(posts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Post>,
{
    let tags: BTreeSet<&str> = posts
        .into_iter()
        .flat_map(|p| p.data.tags.iter().map(String::as_str))
        .collect();
    tags.into_iter().map(str::to_string).collect()
}

/// Every non-empty category in use, deduplicated and sorted
pub fn get_all_categories<'a, I>(posts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Post>,
{
    let categories: BTreeSet<&str> = posts
        .into_iter()
        .filter_map(|p| p.data.category.as_deref())
        .filter(|c| !c.is_empty())
        .collect();
    categories.into_iter().map(str::to_string).collect()
}

/// Minutes needed to read `content`, rounded up; 0 for empty content
pub fn calculate_read_time(content: &str, words_per_minute: usize) -> usize {
    let words = content.split_whitespace().count();
    let wpm = if words_per_minute == 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };
    words.div_ceil(wpm)
}

/// Number of posts per tag, sorted by tag name
pub fn tag_counts<'a, I>(posts: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for post in posts {
        for tag in &post.data.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    sorted_counts(counts)
}

/// Number of posts per category, sorted by category name
pub fn category_counts<'a, I>(posts: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for post in posts {
        if let Some(category) = post.data.category.as_deref().filter(|c| !c.is_empty()) {
            *counts.entry(category).or_insert(0) += 1;
        }
    }
    sorted_counts(counts)
}

fn sorted_counts(mut counts: IndexMap<&str, usize>) -> Vec<(String, usize)> {
    counts.sort_keys();
    counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}

/// Split posts into pages of `per_page`; 0 puts everything on one page
pub fn paginate<'a, I>(posts: I, per_page: usize) -> Vec<Vec<&'a Post>>
where
    I: IntoIterator<Item = &'a Post>,
{
    let posts: Vec<&Post> = posts.into_iter().collect();
    if per_page == 0 || posts.is_empty() {
        return vec![posts];
    }
    posts.chunks(per_page).map(|chunk| chunk.to_vec()).collect()
}

pub fn find_by_slug<'a, I>(posts: I, slug: &str) -> Option<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let slug = slug.trim_matches('/');
    posts.into_iter().find(|p| p.slug == slug)
}
