//! Persisted study record
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sora_core::Assessment;
use uuid::Uuid;

use crate::StoreError;

/// One saved study: inputs and derived results as a single JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub id: String,
    pub name: String,
    pub data: Value,
    /// Owning user id
    pub owner: String,
    pub updated_at: DateTime<Utc>,
}

impl StudyRecord {
    pub fn new(name: impl Into<String>, data: Value, owner: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            data,
            owner: owner.into(),
            updated_at: Utc::now(),
        }
    }

    pub fn from_assessment(
        name: impl Into<String>,
        assessment: &Assessment,
        owner: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let data = serde_json::to_value(assessment).map_err(|e| StoreError::Serialize(e.to_string()))?;
        Ok(Self::new(name, data, owner))
    }

    /// Decode the stored document as a resolved assessment
    pub fn assessment(&self) -> Result<Assessment, StoreError> {
        serde_json::from_value(self.data.clone()).map_err(|e| StoreError::Serialize(e.to_string()))
    }

    pub fn summary(&self) -> StudySummary {
        StudySummary {
            id: self.id.clone(),
            name: self.name.clone(),
            owner: self.owner.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Listing row without the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySummary {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_record_has_id_and_owner() {
        let record = StudyRecord::new("Survey north field", json!({"step": 2}), "user-1");
        assert!(Uuid::parse_str(&record.id).is_ok());
        assert_eq!(record.owner, "user-1");
        assert_eq!(record.summary().name, "Survey north field");
    }

    #[test]
    fn test_non_assessment_data_fails_to_decode() {
        let record = StudyRecord::new("draft", json!({"operation": {}}), "user-1");
        assert!(matches!(record.assessment(), Err(StoreError::Serialize(_))));
    }
}
