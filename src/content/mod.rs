//! Content module - the post schema, the collection loader and post queries

mod frontmatter;
pub mod loader;
mod post;
pub mod query;
pub mod schema;

pub use frontmatter::{FrontMatter, FrontMatterError};
pub use loader::{parse_post, ContentLoader, LoadError};
pub use post::{ArticleType, Difficulty, Post, PostData};
pub use schema::{validate, validate_post, Constraint, ValidationError, ValidationErrors};
