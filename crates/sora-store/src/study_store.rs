//! Owner-scoped study store
//!
//! Every call is made on behalf of a `Principal`. Regular users only see
//! their own records; an admin bypasses the ownership scope.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::record::{StudyRecord, StudySummary};
use crate::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    #[serde(alias = "super_agent")]
    Admin,
}

/// Caller identity, supplied by the host after authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    #[serde(default)]
    pub role: Role,
}

impl Principal {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::User,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn can_access(&self, record: &StudyRecord) -> bool {
        self.is_admin() || record.owner == self.user_id
    }
}

pub trait StudyStore: Send + Sync {
    fn create(&self, principal: &Principal, name: &str, data: Value) -> Result<StudyRecord, StoreError>;

    fn get(&self, principal: &Principal, id: &str) -> Result<StudyRecord, StoreError>;

    /// Records visible to the principal, most recently updated first
    fn list(&self, principal: &Principal) -> Result<Vec<StudySummary>, StoreError>;

    /// Replace the document (and the name when given). Last write wins.
    fn update(
        &self,
        principal: &Principal,
        id: &str,
        name: Option<&str>,
        data: Value,
    ) -> Result<StudyRecord, StoreError>;

    fn delete(&self, principal: &Principal, id: &str) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct InMemoryStudyStore {
    records: RwLock<HashMap<String, StudyRecord>>,
}

impl InMemoryStudyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidName);
    }
    Ok(())
}

fn check_access(principal: &Principal, record: &StudyRecord) -> Result<(), StoreError> {
    if principal.can_access(record) {
        Ok(())
    } else {
        Err(StoreError::Forbidden(record.id.clone()))
    }
}

impl StudyStore for InMemoryStudyStore {
    fn create(&self, principal: &Principal, name: &str, data: Value) -> Result<StudyRecord, StoreError> {
        validate_name(name)?;
        let record = StudyRecord::new(name.trim(), data, principal.user_id.clone());

        let mut records = self.records.write().map_err(|_| StoreError::poisoned())?;
        records.insert(record.id.clone(), record.clone());
        debug!(study_id = %record.id, owner = %record.owner, "study created");
        Ok(record)
    }

    fn get(&self, principal: &Principal, id: &str) -> Result<StudyRecord, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::poisoned())?;
        let record = records.get(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        check_access(principal, record)?;
        Ok(record.clone())
    }

    fn list(&self, principal: &Principal) -> Result<Vec<StudySummary>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::poisoned())?;
        let mut visible: Vec<StudySummary> = records
            .values()
            .filter(|r| principal.can_access(r))
            .map(StudyRecord::summary)
            .collect();
        visible.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(visible)
    }

    fn update(
        &self,
        principal: &Principal,
        id: &str,
        name: Option<&str>,
        data: Value,
    ) -> Result<StudyRecord, StoreError> {
        if let Some(name) = name {
            validate_name(name)?;
        }

        let mut records = self.records.write().map_err(|_| StoreError::poisoned())?;
        let record = records.get_mut(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        check_access(principal, record)?;

        if let Some(name) = name {
            record.name = name.trim().to_string();
        }
        record.data = data;
        record.updated_at = Utc::now();
        debug!(study_id = %id, by = %principal.user_id, "study updated");
        Ok(record.clone())
    }

    fn delete(&self, principal: &Principal, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::poisoned())?;
        let record = records.get(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        check_access(principal, record)?;
        records.remove(id);
        debug!(study_id = %id, by = %principal.user_id, "study deleted");
        Ok(())
    }
}
