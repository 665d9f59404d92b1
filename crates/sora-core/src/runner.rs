//! Pipeline Runner: chains stages over a private copy of the state
use crate::context::EvaluationContext;
use crate::error::SoraError;
use crate::results::{AssessmentState, StageProof};
use crate::stage::Stage;
use std::time::Instant;

pub struct PipelineRunner {
    stages: Vec<Box<dyn Stage>>,
    pipeline_id: String,
}

impl PipelineRunner {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        let pipeline_id = stages
            .iter()
            .map(|s| s.id().split('.').next().unwrap_or("?"))
            .collect::<Vec<_>>()
            .join("→");

        Self { stages, pipeline_id }
    }

    /// Run every stage in order.
    ///
    /// The caller's state is never touched: stages work on a clone that is
    /// returned only when all of them succeed.
    pub fn run(
        &self,
        state: &AssessmentState,
        ctx: &EvaluationContext,
    ) -> Result<(AssessmentState, Vec<StageProof>), SoraError> {
        let mut current = state.clone();
        let mut proofs = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let start = Instant::now();
            let in_hash = hash_state(&current)?;

            stage.run(&mut current, ctx).map_err(|e| {
                tracing::debug!(trace_id = %ctx.trace_id, stage = stage.id(), error = %e, "stage failed");
                e
            })?;

            let out_hash = hash_state(&current)?;
            proofs.push(StageProof {
                id: stage.id().to_string(),
                in_hash,
                out_hash,
                deterministic: stage.deterministic(),
                latency_us: start.elapsed().as_micros() as u64,
            });
        }

        Ok((current, proofs))
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn stage_ids(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.id()).collect()
    }
}

/// blake3 over the canonical JSON encoding of the state
pub fn hash_state(state: &AssessmentState) -> Result<String, SoraError> {
    let bytes = serde_json::to_vec(state)?;
    Ok(format!("blake3:{}", blake3::hash(&bytes)))
}
