//! Shared service state
use std::sync::Arc;

use sora_engine::EngineConfig;
use sora_export::DossierExporter;
use sora_store::{InMemoryObjectStorage, InMemoryStudyStore, ObjectStorage, StudyStore};

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub studies: Arc<dyn StudyStore>,
    pub files: Arc<dyn ObjectStorage>,
    pub config: Arc<EngineConfig>,
    pub exporter: Arc<DossierExporter<'static>>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        studies: Arc<dyn StudyStore>,
        files: Arc<dyn ObjectStorage>,
        config: EngineConfig,
        exporter: DossierExporter<'static>,
    ) -> Result<Self, prometheus::Error> {
        Ok(Self {
            studies,
            files,
            config: Arc::new(config),
            exporter: Arc::new(exporter),
            metrics: Metrics::new()?,
        })
    }

    /// In-memory collaborators, for local runs and tests
    pub fn in_memory(config: EngineConfig) -> anyhow::Result<Self> {
        let exporter = DossierExporter::new()?;
        Ok(Self::new(
            Arc::new(InMemoryStudyStore::new()),
            Arc::new(InMemoryObjectStorage::default()),
            config,
            exporter,
        )?)
    }
}
