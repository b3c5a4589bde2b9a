#![doc = include_str!("../README.md")]

mod error;
pub mod indices;
pub mod kdtree;
mod r#type;

pub use error::KdIndexError;
pub use r#type::IndexableNum;
