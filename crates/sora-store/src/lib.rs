//! SORA Store: study persistence and file storage
//!
//! Collaborators of the engine. Their failures are reported through
//! `StoreError` / `StorageError` and never reach an assessment.

pub mod object_storage;
pub mod record;
pub mod study_store;

pub use object_storage::{
    is_valid_geo_file, object_path, path_from_url, FileCategory, FileMetadata, FileUpload,
    InMemoryObjectStorage, ObjectStorage, DEFAULT_BUCKET,
};
pub use record::{StudyRecord, StudySummary};
pub use study_store::{InMemoryStudyStore, Principal, Role, StudyStore};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("STORE/not_found: {0}")]
    NotFound(String),

    #[error("STORE/forbidden: {0}")]
    Forbidden(String),

    #[error("STORE/invalid_name: study name must not be blank")]
    InvalidName,

    #[error("STORE/serialize: {0}")]
    Serialize(String),

    #[error("STORE/unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn poisoned() -> Self {
        StoreError::Unavailable("record lock poisoned".to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("STORAGE/unsupported_geo_file: {0} (supported: KML, KMZ, GeoJSON)")]
    UnsupportedGeoFile(String),

    #[error("STORAGE/invalid_file_name: {0}")]
    InvalidFileName(String),

    #[error("STORAGE/already_exists: {0}")]
    AlreadyExists(String),

    #[error("STORAGE/invalid_url: {0}")]
    InvalidUrl(String),

    #[error("STORAGE/not_found: {0}")]
    NotFound(String),

    #[error("STORAGE/unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn poisoned() -> Self {
        StorageError::Unavailable("object lock poisoned".to_string())
    }
}
