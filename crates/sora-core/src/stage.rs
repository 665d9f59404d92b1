//! Stage Trait: one step of the assessment pipeline
use crate::context::EvaluationContext;
use crate::error::SoraError;
use crate::results::AssessmentState;

/// Contract shared by every pipeline stage
pub trait Stage: Send + Sync {
    /// Unique stage id (ex: "ground.grc.v1")
    fn id(&self) -> &'static str;

    /// Whether the stage output is a pure function of its input (default: true)
    fn deterministic(&self) -> bool {
        true
    }

    /// Reads what earlier stages produced and writes this stage's output into `state`
    fn run(&self, state: &mut AssessmentState, ctx: &EvaluationContext) -> Result<(), SoraError>;
}
