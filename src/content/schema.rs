//! Blog post schema
//!
//! Checks raw front-matter against the post field rules and produces a fully
//! defaulted [`PostData`]. Every violation in a document is reported, each one
//! naming the offending field and the rule it broke.

use lazy_static::lazy_static;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::post::{ArticleType, Difficulty, Post, PostData};
use crate::helpers::parse_date_string;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"(?i)^https?://[^\s/?#]+[^\s]*$").unwrap();
}

const DIFFICULTIES: &[&str] = &Difficulty::NAMES;
const ARTICLE_TYPES: &[&str] = &ArticleType::NAMES;

/// Keys the schema knows about; anything else is stripped
const KNOWN_KEYS: &[&str] = &[
    "title",
    "description",
    "pubDate",
    "author",
    "image",
    "imageAlt",
    "thumbnail",
    "tags",
    "category",
    "readTime",
    "canonicalURL",
    "socialImage",
    "draft",
    "featured",
    "difficulty",
    "prerequisites",
    "learningObjectives",
    "updatedDate",
    "relatedPosts",
    "articleType",
    "visualizer",
];

/// The rule a field broke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Required,
    Empty,
    InvalidType { expected: &'static str },
    InvalidDate,
    NotPositive,
    InvalidUrl,
    InvalidEnum { allowed: &'static [&'static str] },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => f.write_str("is required"),
            Constraint::Empty => f.write_str("must not be empty"),
            Constraint::InvalidType { expected } => write!(f, "expected {}", expected),
            Constraint::InvalidDate => f.write_str("is not a valid date"),
            Constraint::NotPositive => f.write_str("must be a positive number"),
            Constraint::InvalidUrl => f.write_str("must be an absolute http(s) URL"),
            Constraint::InvalidEnum { allowed } => {
                write!(f, "must be one of: {}", allowed.join(", "))
            }
        }
    }
}

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{field}` {constraint}")]
pub struct ValidationError {
    pub field: String,
    pub constraint: Constraint,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }
}

/// All schema violations found in one document (never empty)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `field` has a violation
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Validate raw front-matter and apply defaults
pub fn validate(raw: &Value) -> Result<PostData, ValidationErrors> {
    let Some(map) = raw.as_mapping() else {
        return Err(ValidationErrors(vec![ValidationError::new(
            "(root)",
            Constraint::InvalidType {
                expected: "a mapping of fields",
            },
        )]));
    };

    let mut fields = Fields::new(map);

    let title = fields.required_string("title");
    let description = fields.required_string("description");
    let pub_date = fields.required_date("pubDate");
    let author = fields.required_string("author");

    let image = fields.optional_string("image");
    let image_alt = fields.optional_string("imageAlt");
    let thumbnail = fields.optional_string("thumbnail");
    let tags = fields.string_list("tags");
    let category = fields.optional_string("category");
    let read_time = fields.positive_number("readTime");

    let canonical_url = fields.url("canonicalURL");
    let social_image = fields.optional_string("socialImage");

    let draft = fields.flag("draft");
    let featured = fields.flag("featured");

    let difficulty: Difficulty = fields.enumeration("difficulty", DIFFICULTIES);
    let prerequisites = fields.string_list("prerequisites");
    let learning_objectives = fields.string_list("learningObjectives");

    let updated_date = fields.optional_date("updatedDate");
    let related_posts = fields.string_list("relatedPosts");

    let article_type: ArticleType = fields.enumeration("articleType", ARTICLE_TYPES);
    let visualizer = fields.optional_string("visualizer");

    fields.log_unknown_keys();
    if !fields.errors.is_empty() {
        return Err(ValidationErrors(fields.errors));
    }

    // Required fields are all present once there are no errors
    match (title, description, pub_date, author) {
        (Some(title), Some(description), Some(pub_date), Some(author)) => Ok(PostData {
            title,
            description,
            pub_date,
            author,
            image,
            image_alt,
            thumbnail,
            tags,
            category,
            read_time,
            canonical_url,
            social_image,
            draft,
            featured,
            difficulty,
            prerequisites,
            learning_objectives,
            updated_date,
            related_posts,
            article_type,
            visualizer,
        }),
        _ => Err(ValidationErrors(vec![ValidationError::new(
            "(root)",
            Constraint::Required,
        )])),
    }
}

/// Validate a document's front-matter and build the post
pub fn validate_post(
    slug: impl Into<String>,
    raw: &Value,
    body: impl Into<String>,
) -> Result<Post, ValidationErrors> {
    let data = validate(raw)?;
    Ok(Post::new(slug, data, body))
}

/// Field reader that records violations instead of stopping at the first one
struct Fields<'a> {
    map: &'a Mapping,
    errors: Vec<ValidationError>,
}

impl<'a> Fields<'a> {
    fn new(map: &'a Mapping) -> Self {
        Self {
            map,
            errors: Vec::new(),
        }
    }

    /// `null` counts as absent
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn fail(&mut self, field: impl Into<String>, constraint: Constraint) {
        self.errors.push(ValidationError::new(field, constraint));
    }

    fn required_string(&mut self, key: &str) -> Option<String> {
        match self.get(key) {
            None => {
                self.fail(key, Constraint::Required);
                None
            }
            Some(_) => {
                let value = self.optional_string(key)?;
                if value.is_empty() {
                    self.fail(key, Constraint::Empty);
                    None
                } else {
                    Some(value)
                }
            }
        }
    }

    fn optional_string(&mut self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.fail(key, Constraint::InvalidType { expected: "string" });
                None
            }
        }
    }

    fn string_list(&mut self, key: &str) -> Vec<String> {
        let Some(value) = self.get(key) else {
            return Vec::new();
        };
        let Some(items) = value.as_sequence() else {
            self.fail(
                key,
                Constraint::InvalidType {
                    expected: "list of strings",
                },
            );
            return Vec::new();
        };

        let mut list = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => list.push(s.to_string()),
                None => self.fail(
                    format!("{}[{}]", key, i),
                    Constraint::InvalidType { expected: "string" },
                ),
            }
        }
        list
    }

    fn flag(&mut self, key: &str) -> bool {
        match self.get(key) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.fail(key, Constraint::InvalidType { expected: "boolean" });
                false
            }
        }
    }

    fn required_date(&mut self, key: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        if self.get(key).is_none() {
            self.fail(key, Constraint::Required);
            return None;
        }
        self.optional_date(key)
    }

    fn optional_date(&mut self, key: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        match self.get(key)? {
            Value::String(s) => {
                let date = parse_date_string(s);
                if date.is_none() {
                    self.fail(key, Constraint::InvalidDate);
                }
                date
            }
            _ => {
                self.fail(key, Constraint::InvalidType { expected: "date" });
                None
            }
        }
    }

    fn positive_number(&mut self, key: &str) -> Option<f64> {
        let value = self.get(key)?;
        let Some(n) = value.as_f64() else {
            self.fail(key, Constraint::InvalidType { expected: "number" });
            return None;
        };
        if n > 0.0 && n.is_finite() {
            Some(n)
        } else {
            self.fail(key, Constraint::NotPositive);
            None
        }
    }

    fn url(&mut self, key: &str) -> Option<String> {
        let value = self.optional_string(key)?;
        if URL_RE.is_match(&value) {
            Some(value)
        } else {
            self.fail(key, Constraint::InvalidUrl);
            None
        }
    }

    fn enumeration<T>(&mut self, key: &str, allowed: &'static [&'static str]) -> T
    where
        T: FromStr + Default,
    {
        let Some(value) = self.get(key) else {
            return T::default();
        };
        match value.as_str().map(str::parse::<T>) {
            Some(Ok(v)) => v,
            _ => {
                self.fail(key, Constraint::InvalidEnum { allowed });
                T::default()
            }
        }
    }

    fn log_unknown_keys(&self) {
        for key in self.map.keys() {
            let name = key.as_str().unwrap_or("<non-string key>");
            if !KNOWN_KEYS.contains(&name) {
                tracing::debug!("Ignoring unknown front-matter field `{}`", name);
            }
        }
    }
}
