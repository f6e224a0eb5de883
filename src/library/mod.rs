//! Character library backed by static JSON files.
//!
//! # Storage Layout
//!
//! ```text
//! app/static/characterData/
//! ├── ganyu.json                # One record per character
//! ├── kaedehara_kazuha.json
//! └── ...
//!
//! /media/images/characters/
//! └── <id>.png                  # Portraits, addressed by convention only
//! ```

pub mod catalog;
pub mod content;
pub mod detail;

pub use catalog::{Catalog, CatalogError, ContentPreview, RecordLoadError, RouteParam};
pub use content::{display_name, Constellation, ContentId, ContentRecord};
pub use detail::{CharacterDetail, ConstellationLine, StatLine};
