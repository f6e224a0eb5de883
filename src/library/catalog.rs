//! Catalog over the character data directory.
//!
//! Nothing is cached: every call goes back to disk, so the catalog always
//! reflects the directory as it is now. Listing failures are fatal;
//! single-record failures are isolated to that record.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use super::content::{ContentId, ContentRecord};
use super::detail::CharacterDetail;
use crate::config::ResolvedConfig;

/// The data directory could not be listed
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read character directory {}: {source}", .path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single record could not be loaded
#[derive(Debug, Error)]
pub enum RecordLoadError {
    #[error("Invalid character id: {0:?}")]
    InvalidId(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Listing projection of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPreview {
    pub id: ContentId,
    pub name: String,
    pub image: String,
}

/// Route parameter for one pre-rendered detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParam {
    pub id: ContentId,
}

impl RouteParam {
    pub fn path(&self) -> String {
        format!("/characters/{}", self.id)
    }
}

/// Read-only view of the character data directory
#[derive(Debug, Clone)]
pub struct Catalog {
    data_dir: PathBuf,
    media_root: String,
    record_extension: String,
    image_extension: String,
}

impl Catalog {
    /// Catalog with the default media root and extensions
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            media_root: crate::config::DEFAULT_MEDIA_ROOT.to_string(),
            record_extension: crate::config::DEFAULT_RECORD_EXTENSION.to_string(),
            image_extension: crate::config::DEFAULT_IMAGE_EXTENSION.to_string(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            media_root: config.media_root.clone(),
            record_extension: config.record_extension.clone(),
            image_extension: config.image_extension.clone(),
        }
    }

    pub fn with_media_root(mut self, media_root: impl Into<String>) -> Self {
        self.media_root = media_root.into();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn media_root(&self) -> &str {
        &self.media_root
    }

    /// Where the record for `id` is expected on disk
    pub fn record_path(&self, id: &ContentId) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", id.as_str(), self.record_extension))
    }

    /// Public portrait path for `id`; never checked for existence
    pub fn image_path(&self, id: &ContentId) -> String {
        format!("{}/{}.{}", self.media_root, id.as_str(), self.image_extension)
    }

    /// All identifiers in the data directory, sorted ascending.
    ///
    /// Only regular files ending in the record extension count; the
    /// extension is stripped to form the identifier.
    pub async fn list_ids(&self) -> Result<Vec<ContentId>, CatalogError> {
        let enumeration = |source| CatalogError::Enumeration {
            path: self.data_dir.clone(),
            source,
        };

        let suffix = format!(".{}", self.record_extension);
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.data_dir).await.map_err(enumeration)?;

        while let Some(entry) = entries.next_entry().await.map_err(enumeration)? {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::debug!("Skipping non UTF-8 entry: {}", entry.path().display());
                continue;
            };
            let Some(stem) = name.strip_suffix(&suffix) else {
                continue;
            };
            if stem.is_empty() {
                continue;
            }

            // Follows symlinks so linked records are still listed
            match fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_file() => ids.push(ContentId::new(stem)),
                Ok(_) => tracing::debug!("Skipping non-file entry: {}", name),
                Err(e) => tracing::debug!("Skipping unreadable entry {}: {}", name, e),
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Previews for every record, in identifier order
    pub async fn list_previews(&self) -> Result<Vec<ContentPreview>, CatalogError> {
        let ids = self.list_ids().await?;

        Ok(ids
            .into_iter()
            .map(|id| ContentPreview {
                name: id.display_name(),
                image: self.image_path(&id),
                id,
            })
            .collect())
    }

    /// One route per record, for pre-rendering every detail page
    pub async fn static_routes(&self) -> Result<Vec<RouteParam>, CatalogError> {
        let ids = self.list_ids().await?;
        Ok(ids.into_iter().map(|id| RouteParam { id }).collect())
    }

    /// Read and parse a single record, reporting why it failed
    pub async fn read_record(&self, id: &ContentId) -> Result<ContentRecord, RecordLoadError> {
        if !id.is_safe_file_stem() {
            return Err(RecordLoadError::InvalidId(id.as_str().to_string()));
        }

        let path = self.record_path(id);
        let body = fs::read_to_string(&path)
            .await
            .map_err(|source| RecordLoadError::Read {
                path: path.clone(),
                source,
            })?;

        ContentRecord::from_json(&body).map_err(|source| RecordLoadError::Parse { path, source })
    }

    /// Load a single record; any failure yields `None` and is logged
    pub async fn load_record(&self, id: &ContentId) -> Option<ContentRecord> {
        match self.read_record(id).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Error loading character {}: {}", id, e);
                None
            }
        }
    }

    /// Detail view for `id`, or `None` when the record cannot be loaded
    pub async fn detail(&self, id: &ContentId) -> Option<CharacterDetail> {
        let record = self.load_record(id).await?;
        Some(CharacterDetail::build(id, &record, &self.image_path(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_image_paths() {
        let catalog = Catalog::new("/data/characters");
        let id = ContentId::from("ganyu");

        assert_eq!(
            catalog.record_path(&id),
            PathBuf::from("/data/characters/ganyu.json")
        );
        assert_eq!(catalog.image_path(&id), "/media/images/characters/ganyu.png");

        let catalog = catalog.with_media_root("/cdn/portraits");
        assert_eq!(catalog.image_path(&id), "/cdn/portraits/ganyu.png");
    }

    #[test]
    fn test_from_config_uses_configured_extensions() {
        let config = ResolvedConfig {
            data_dir: PathBuf::from("/d"),
            media_root: "/m".to_string(),
            record_extension: "data".to_string(),
            image_extension: "webp".to_string(),
            config_file: None,
        };
        let catalog = Catalog::from_config(&config);
        let id = ContentId::from("xiao");

        assert_eq!(catalog.record_path(&id), PathBuf::from("/d/xiao.data"));
        assert_eq!(catalog.image_path(&id), "/m/xiao.webp");
    }

    #[test]
    fn test_route_param_path() {
        let route = RouteParam {
            id: ContentId::from("hu_tao"),
        };
        assert_eq!(route.path(), "/characters/hu_tao");
    }

    #[tokio::test]
    async fn test_invalid_id_is_rejected_before_io() {
        let catalog = Catalog::new("/nonexistent");
        let err = catalog
            .read_record(&ContentId::from("../secrets"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordLoadError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_missing_directory_is_enumeration_error() {
        let catalog = Catalog::new("/definitely/not/a/real/dir");
        let err = catalog.list_ids().await.unwrap_err();
        let CatalogError::Enumeration { path, .. } = err;
        assert_eq!(path, PathBuf::from("/definitely/not/a/real/dir"));
    }
}
