//! chardex - Static character catalog resolver
//!
//! Reads one JSON file per character from a data directory and projects
//! each into the shapes a reference site needs: a lightweight preview for
//! the listing page and a render-ready detail view for the character page.
//!
//! # Modules
//!
//! - `library`: Catalog over the data directory (ids, previews, records, details)
//! - `config`: Path and extension resolution (env, config file, defaults)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List all characters
//! chardex list
//!
//! # Show one character
//! chardex show kaedehara_kazuha
//!
//! # Print every detail route for pre-rendering
//! chardex ids --routes
//! ```

pub mod cli;
pub mod config;
pub mod library;

// Re-export main types at crate root for convenience
pub use library::{
    display_name, Catalog, CatalogError, CharacterDetail, ContentId, ContentPreview,
    ContentRecord, RecordLoadError,
};
