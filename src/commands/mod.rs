//! Command implementations behind the CLI

pub mod check;
pub mod clean;
pub mod feed;
pub mod init;
pub mod list;
pub mod new;
