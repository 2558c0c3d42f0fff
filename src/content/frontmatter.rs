//! Front-matter splitting

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors raised while separating front-matter from the body
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front-matter opened with '{0}' is never closed")]
    Unclosed(&'static str),

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw front-matter of a document, before schema validation
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub data: Value,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            data: Value::Mapping(Mapping::new()),
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let rest = &content[3..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        // The closing fence may directly follow the opening one
        let (yaml_content, remaining) = if let Some(after) = rest.strip_prefix("---") {
            ("", after)
        } else {
            let end_pos = rest
                .find("\n---")
                .ok_or(FrontMatterError::Unclosed("---"))?;
            (&rest[..end_pos], &rest[end_pos + 4..])
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let data: Value = serde_yaml::from_str(yaml_content)?;
        Ok((Self::normalize(data), remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FrontMatterError> {
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest.find(";;;").ok_or(FrontMatterError::Unclosed(";;;"))?;
            let json_content = &rest[..end_pos];
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
            return Ok((Self::from_json(json_content)?, remaining));
        }

        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut end_pos = None;
        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end_pos = Some(i + 1);
                        break;
                    }
                }
                _ => {}
            }
        }

        let end_pos = end_pos.ok_or(FrontMatterError::Unclosed("{"))?;
        let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);
        Ok((Self::from_json(&content[..end_pos])?, remaining))
    }

    fn from_json(json: &str) -> Result<Self, FrontMatterError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let data = serde_yaml::to_value(value)?;
        Ok(Self::normalize(data))
    }

    /// An empty document (`null`) counts as an empty mapping
    fn normalize(data: Value) -> Self {
        match data {
            Value::Null => FrontMatter::default(),
            data => Self { data },
        }
    }
}
