//! Evaluation Context: identity and table edition of one evaluation
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EvaluationContext {
    pub trace_id: Uuid,
    /// Edition of the lookup tables the evaluation runs against
    pub tables_edition: String,
    /// Study the snapshot belongs to, when the host knows it
    pub study_id: Option<String>,
}

impl EvaluationContext {
    pub fn new(tables_edition: impl Into<String>) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            tables_edition: tables_edition.into(),
            study_id: None,
        }
    }

    pub fn for_study(mut self, study_id: impl Into<String>) -> Self {
        self.study_id = Some(study_id.into());
        self
    }
}
