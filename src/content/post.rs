//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::query::{calculate_read_time, DEFAULT_WORDS_PER_MINUTE};

/// Skill level a post is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Front-matter spelling of each variant, in `ALL` order
    pub const NAMES: [&'static str; 3] = {
        let mut names = [""; 3];
        let mut i = 0;
        while i < names.len() {
            names[i] = Self::ALL[i].as_str();
            i += 1;
        }
        names
    };

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown difficulty '{}'", s))
    }
}

/// Schema.org article kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleType {
    #[default]
    Article,
    Tutorial,
    Guide,
    Review,
    News,
}

impl ArticleType {
    pub const ALL: [ArticleType; 5] = [
        ArticleType::Article,
        ArticleType::Tutorial,
        ArticleType::Guide,
        ArticleType::Review,
        ArticleType::News,
    ];

    /// Front-matter spelling of each variant, in `ALL` order
    pub const NAMES: [&'static str; 5] = {
        let mut names = [""; 5];
        let mut i = 0;
        while i < names.len() {
            names[i] = Self::ALL[i].as_str();
            i += 1;
        }
        names
    };

    pub const fn as_str(self) -> &'static str {
        match self {
            ArticleType::Article => "article",
            ArticleType::Tutorial => "tutorial",
            ArticleType::Guide => "guide",
            ArticleType::Review => "review",
            ArticleType::News => "news",
        }
    }
}

impl fmt::Display for ArticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArticleType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown article type '{}'", s))
    }
}

/// Validated front-matter of a blog post, with every default applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub title: String,
    pub description: String,
    pub pub_date: DateTime<Utc>,
    pub author: String,

    /// Cover image
    pub image: Option<String>,
    pub image_alt: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    /// Read time in minutes, as written by the author
    pub read_time: Option<f64>,

    // SEO
    #[serde(rename = "canonicalURL")]
    pub canonical_url: Option<String>,
    pub social_image: Option<String>,

    pub draft: bool,
    pub featured: bool,

    pub difficulty: Difficulty,
    pub prerequisites: Vec<String>,
    pub learning_objectives: Vec<String>,

    pub updated_date: Option<DateTime<Utc>>,
    /// Slugs of hand-picked related posts
    pub related_posts: Vec<String>,

    pub article_type: ArticleType,
    /// Interactive visualizer embedded in the post
    pub visualizer: Option<String>,
}

impl PostData {
    /// Create post data with the required fields and every default
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        pub_date: DateTime<Utc>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            pub_date,
            author: author.into(),
            image: None,
            image_alt: None,
            thumbnail: None,
            tags: Vec::new(),
            category: None,
            read_time: None,
            canonical_url: None,
            social_image: None,
            draft: false,
            featured: false,
            difficulty: Difficulty::default(),
            prerequisites: Vec::new(),
            learning_objectives: Vec::new(),
            updated_date: None,
            related_posts: Vec::new(),
            article_type: ArticleType::default(),
            visualizer: None,
        }
    }
}

/// A blog post in the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Path relative to the content directory, without extension
    pub slug: String,

    /// Validated front-matter
    pub data: PostData,

    /// Raw document body after the front-matter
    pub body: String,
}

impl Post {
    pub fn new(slug: impl Into<String>, data: PostData, body: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            data,
            body: body.into(),
        }
    }

    /// Estimated minutes to read the post.
    ///
    /// The author's `readTime` wins; otherwise the body is measured, and an
    /// empty body falls back to `default_minutes`.
    pub fn read_time(&self, default_minutes: u32, words_per_minute: usize) -> u32 {
        if let Some(minutes) = self.data.read_time {
            return minutes.ceil() as u32;
        }
        let wpm = if words_per_minute == 0 {
            DEFAULT_WORDS_PER_MINUTE
        } else {
            words_per_minute
        };
        match calculate_read_time(&self.body, wpm) {
            0 => default_minutes,
            minutes => minutes as u32,
        }
    }

    /// Get the previous post in a list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next post in a list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}
