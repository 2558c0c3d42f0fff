//! Generator module - writes syndication output for the blog

pub mod feed;
