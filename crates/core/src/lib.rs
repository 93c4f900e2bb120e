//! Domain logic for the maison content graph.
//!
//! This crate is database-free: locale handling, slug normalization,
//! rich-text parsing, the homepage module registry, and the error
//! taxonomy. The `db` and `engine` crates build on it.

pub mod error;
pub mod forms;
pub mod locale;
pub mod modules;
pub mod publishing;
pub mod richtext;
pub mod slug;
pub mod types;
