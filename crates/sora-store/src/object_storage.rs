//! Object storage for uploaded study files
//!
//! Objects live at `{study_id}/{category}/{timestamp_ms}_{file_name}` inside
//! one bucket. Public URLs end with `/{bucket}/{path}`, which is how a URL is
//! mapped back to its object on deletion.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::StorageError;

pub const DEFAULT_BUCKET: &str = "sora-file";

/// Extensions accepted for operating-area files
pub const GEO_EXTENSIONS: [&str; 4] = ["kml", "kmz", "geojson", "json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    /// Operating area (KML, KMZ, GeoJSON)
    Geo,
    /// Drone technical documentation
    Technical,
    /// Flight trajectory files
    Trajectory,
    /// Output of the external ground-risk simulation tool
    Drosera,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Geo => "geo",
            FileCategory::Technical => "technical",
            FileCategory::Trajectory => "trajectory",
            FileCategory::Drosera => "drosera",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file to store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// What gets written into the study document for an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    pub url: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
}

pub trait ObjectStorage: Send + Sync {
    /// Store a file under the study and category; never overwrites
    fn upload(&self, study_id: &str, category: FileCategory, file: FileUpload) -> Result<FileMetadata, StorageError>;

    fn public_url(&self, path: &str) -> String;

    /// Object path a public URL of this storage points to
    fn path_of(&self, url: &str) -> Result<String, StorageError>;

    /// Delete the object a public URL points to
    fn delete(&self, url: &str) -> Result<(), StorageError>;

    /// Delete every object under a study, returning how many were removed
    fn delete_study_files(&self, study_id: &str) -> Result<usize, StorageError>;
}

pub fn object_path(study_id: &str, category: FileCategory, timestamp_ms: i64, file_name: &str) -> String {
    format!("{}/{}/{}_{}", study_id, category, timestamp_ms, file_name)
}

/// Object path from a public URL: everything after `/{bucket}/`
pub fn path_from_url(url: &str, bucket: &str) -> Result<String, StorageError> {
    let marker = format!("/{}/", bucket);
    match url.split_once(&marker) {
        Some((_, path)) if !path.is_empty() => Ok(path.to_string()),
        _ => Err(StorageError::InvalidUrl(url.to_string())),
    }
}

pub fn is_valid_geo_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_ascii_lowercase();
            GEO_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}

fn check_file_name(name: &str) -> Result<(), StorageError> {
    if name.trim().is_empty() || name.contains('/') || name.contains('\\') {
        return Err(StorageError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

/// Bucket kept in memory, with public URLs shaped like a hosted storage service
pub struct InMemoryObjectStorage {
    base_url: String,
    bucket: String,
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl InMemoryObjectStorage {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.read().map(|o| o.contains_key(path)).unwrap_or(false)
    }

    /// Stored bytes and content type of an object
    pub fn read(&self, path: &str) -> Result<(Vec<u8>, String), StorageError> {
        let objects = self.objects.read().map_err(|_| StorageError::poisoned())?;
        objects
            .get(path)
            .map(|o| (o.bytes.clone(), o.content_type.clone()))
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new("http://localhost:54321", DEFAULT_BUCKET)
    }
}

impl ObjectStorage for InMemoryObjectStorage {
    fn upload(&self, study_id: &str, category: FileCategory, file: FileUpload) -> Result<FileMetadata, StorageError> {
        check_file_name(&file.name)?;
        if category == FileCategory::Geo && !is_valid_geo_file(&file.name) {
            warn!(file = %file.name, "unsupported geo file rejected");
            return Err(StorageError::UnsupportedGeoFile(file.name));
        }

        let path = object_path(study_id, category, Utc::now().timestamp_millis(), &file.name);
        let mut objects = self.objects.write().map_err(|_| StorageError::poisoned())?;
        if objects.contains_key(&path) {
            return Err(StorageError::AlreadyExists(path));
        }

        let metadata = FileMetadata {
            name: file.name,
            url: self.public_url(&path),
            size: file.bytes.len() as u64,
            content_type: file.content_type.clone(),
        };
        objects.insert(
            path.clone(),
            StoredObject {
                content_type: file.content_type,
                bytes: file.bytes,
            },
        );
        debug!(path = %path, size = metadata.size, "object uploaded");
        Ok(metadata)
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, self.bucket, path)
    }

    fn path_of(&self, url: &str) -> Result<String, StorageError> {
        path_from_url(url, &self.bucket)
    }

    fn delete(&self, url: &str) -> Result<(), StorageError> {
        let path = self.path_of(url)?;
        let mut objects = self.objects.write().map_err(|_| StorageError::poisoned())?;
        match objects.remove(&path) {
            Some(_) => {
                debug!(path = %path, "object deleted");
                Ok(())
            }
            None => Err(StorageError::NotFound(path)),
        }
    }

    fn delete_study_files(&self, study_id: &str) -> Result<usize, StorageError> {
        let prefix = format!("{}/", study_id);
        let mut objects = self.objects.write().map_err(|_| StorageError::poisoned())?;
        let before = objects.len();
        objects.retain(|path, _| !path.starts_with(&prefix));
        let removed = before - objects.len();
        debug!(study_id, removed, "study files deleted");
        Ok(removed)
    }
}
