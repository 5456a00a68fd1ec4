//! On-disk storage for uploaded documents

pub mod local;

pub use local::{sanitize_file_name, LocalDocumentStore};
