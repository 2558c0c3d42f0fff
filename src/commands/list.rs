//! List site content

use anyhow::{anyhow, bail, Result};
use std::str::FromStr;

use crate::content::query::{
    category_counts, filter_by_category, filter_by_difficulty, filter_by_tag, filter_published,
    find_by_slug, get_featured, get_related, paginate, sort_by_date, tag_counts,
};
use crate::content::{Difficulty, Post};
use crate::helpers::format_date;
use crate::Blog;

/// What to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Posts,
    Featured,
    Tags,
    Categories,
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" | "posts" => Ok(ListKind::Posts),
            "featured" => Ok(ListKind::Featured),
            "tag" | "tags" => Ok(ListKind::Tags),
            "category" | "categories" => Ok(ListKind::Categories),
            other => Err(format!(
                "Unknown type: {}. Available: posts, featured, tags, categories",
                other
            )),
        }
    }
}

/// Narrowing applied to post listings
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub tag: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// 1-based page number
    pub page: Option<usize>,
}

/// Published, date-sorted posts matching `filter`
pub fn select<'a>(blog: &Blog, posts: &'a [Post], filter: &ListFilter) -> Vec<&'a Post> {
    let mut selected = sort_by_date(filter_published(posts, blog.mode));
    if let Some(tag) = &filter.tag {
        selected = filter_by_tag(selected, tag);
    }
    if let Some(category) = &filter.category {
        selected = filter_by_category(selected, category);
    }
    if let Some(difficulty) = filter.difficulty {
        selected = filter_by_difficulty(selected, difficulty);
    }
    selected
}

/// List site content by type
pub fn run(blog: &Blog, kind: ListKind, filter: &ListFilter) -> Result<()> {
    let posts = blog.load_posts()?;

    match kind {
        ListKind::Posts | ListKind::Featured => {
            let mut selected = select(blog, &posts, filter);
            if kind == ListKind::Featured {
                selected = get_featured(selected);
            }
            let total = selected.len();

            let pages = paginate(selected, blog.config.posts_per_page);
            let page = filter.page.unwrap_or(1);
            let shown = page
                .checked_sub(1)
                .and_then(|i| pages.get(i))
                .ok_or_else(|| anyhow!("Page {} out of range (1-{})", page, pages.len()))?;

            println!("Posts ({}), page {}/{}:", total, page, pages.len());
            for post in shown {
                println!("  {}", describe(blog, post));
            }
        }
        ListKind::Tags => {
            let tags = tag_counts(filter_published(&posts, blog.mode));
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        ListKind::Categories => {
            let categories = category_counts(filter_published(&posts, blog.mode));
            println!("Categories ({}):", categories.len());
            for (category, count) in categories {
                println!("  {} ({})", category, count);
            }
        }
    }

    Ok(())
}

/// Print posts related to `slug` by shared tags
pub fn related(blog: &Blog, slug: &str, limit: usize) -> Result<()> {
    let posts = blog.load_posts()?;
    let Some(current) = find_by_slug(&posts, slug) else {
        bail!("No post with slug '{}'", slug);
    };

    let visible = filter_published(&posts, blog.mode);
    let related = get_related(visible, current, limit);

    println!("Related to {} ({}):", current.slug, related.len());
    for post in related {
        println!("  {}", describe(blog, post));
    }

    Ok(())
}

/// One-line summary of a post
fn describe(blog: &Blog, post: &Post) -> String {
    let config = &blog.config;
    let minutes = post.read_time(config.default_read_time, config.words_per_minute);
    let mut line = format!(
        "{} - {} [{}] {} min, {}",
        format_date(&post.data.pub_date, &config.date_format),
        post.data.title,
        post.slug,
        minutes,
        post.data.difficulty
    );
    if post.data.draft {
        line.push_str(" (draft)");
    }
    if post.data.featured {
        line.push_str(" *");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildMode, SiteConfig};
    use crate::content::PostData;
    use chrono::{TimeZone, Utc};

    fn post(slug: &str, day: u32, tags: &[&str]) -> Post {
        let date = Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap();
        let mut data = PostData::new(slug, "d", date, "a");
        data.tags = tags.iter().map(|t| t.to_string()).collect();
        Post::new(slug, data, "some words here")
    }

    fn blog(mode: BuildMode) -> Blog {
        Blog::with_config("/tmp/unused", SiteConfig::default()).with_mode(mode)
    }

    #[test]
    fn test_list_kind_from_str() {
        assert_eq!("posts".parse::<ListKind>(), Ok(ListKind::Posts));
        assert_eq!("category".parse::<ListKind>(), Ok(ListKind::Categories));
        assert!("routes".parse::<ListKind>().is_err());
    }

    #[test]
    fn test_select_applies_filters() {
        let mut posts = vec![
            post("old", 1, &["AES"]),
            post("new", 5, &["aes", "rsa"]),
            post("draft", 9, &["aes"]),
            post("other", 3, &["hash"]),
        ];
        posts[2].data.draft = true;
        posts[1].data.difficulty = Difficulty::Advanced;

        let filter = ListFilter {
            tag: Some("aes".to_string()),
            ..Default::default()
        };
        let prod: Vec<_> = select(&blog(BuildMode::Production), &posts, &filter)
            .iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(prod, ["new", "old"]);

        let dev: Vec<_> = select(&blog(BuildMode::Development), &posts, &filter)
            .iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(dev, ["draft", "new", "old"]);

        let filter = ListFilter {
            difficulty: Some(Difficulty::Advanced),
            ..Default::default()
        };
        let advanced = select(&blog(BuildMode::Production), &posts, &filter);
        assert_eq!(advanced.len(), 1);
        assert_eq!(advanced[0].slug, "new");
    }

    #[test]
    fn test_describe() {
        let mut p = post("aes", 2, &[]);
        p.data.draft = true;
        assert_eq!(
            describe(&blog(BuildMode::Development), &p),
            "2024-03-02 - aes [aes] 1 min, beginner (draft)"
        );
    }
}
