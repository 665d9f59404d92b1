//! Assessment pipeline: ground → air → sail → oso
//!
//! Each evaluator is wrapped in a `Stage` so the runner can hash the state
//! around it. The result is all-or-nothing: the caller gets a fully resolved
//! `Assessment` or an error, never a partial one.

use sora_core::{
    Assessment, AssessmentState, EvaluationContext, OperationSnapshot, OsoEntry, PipelineRunner,
    SoraError, Stage,
};
use sora_tables::TABLES_EDITION;
use tracing::{debug, error};
use uuid::Uuid;

use crate::air::evaluate_air_risk;
use crate::config::EngineConfig;
use crate::ground::evaluate_ground_risk;
use crate::oso::{merge_user_evidence, resolve_oso_requirements};
use crate::sail::resolve_sail;
use crate::validation::validate_snapshot;

pub struct GroundStage {
    config: EngineConfig,
}

impl GroundStage {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl Stage for GroundStage {
    fn id(&self) -> &'static str {
        "ground.grc.v1"
    }

    fn run(&self, state: &mut AssessmentState, _ctx: &EvaluationContext) -> Result<(), SoraError> {
        let snapshot = &state.snapshot;
        let result = evaluate_ground_risk(
            &snapshot.drone,
            &snapshot.operation,
            &snapshot.ground_mitigations,
            &self.config,
        )?;
        state.ground = Some(result);
        Ok(())
    }
}

#[derive(Default)]
pub struct AirStage;

impl Stage for AirStage {
    fn id(&self) -> &'static str {
        "air.arc.v1"
    }

    fn run(&self, state: &mut AssessmentState, _ctx: &EvaluationContext) -> Result<(), SoraError> {
        let snapshot = &state.snapshot;
        let result = evaluate_air_risk(
            &snapshot.operation,
            &snapshot.airspace,
            &snapshot.strategic_mitigations,
            &snapshot.tactical_mitigations,
        )?;
        state.air = Some(result);
        Ok(())
    }
}

#[derive(Default)]
pub struct SailStage;

impl Stage for SailStage {
    fn id(&self) -> &'static str {
        "sail.matrix.v1"
    }

    fn run(&self, state: &mut AssessmentState, _ctx: &EvaluationContext) -> Result<(), SoraError> {
        let (Some(ground), Some(air)) = (&state.ground, &state.air) else {
            error!("SAIL stage reached without ground and air results");
            return Err(SoraError::Configuration("SAIL stage needs ground and air results".into()));
        };
        state.sail = Some(resolve_sail(ground.final_grc, air.final_arc)?);
        Ok(())
    }
}

#[derive(Default)]
pub struct OsoStage;

impl Stage for OsoStage {
    fn id(&self) -> &'static str {
        "oso.catalogue.v1"
    }

    fn run(&self, state: &mut AssessmentState, _ctx: &EvaluationContext) -> Result<(), SoraError> {
        let Some(sail) = state.sail else {
            error!("OSO stage reached without a SAIL");
            return Err(SoraError::Configuration("OSO stage needs a SAIL".into()));
        };
        state.osos = merge_user_evidence(resolve_oso_requirements(sail), &state.prior_evidence);
        Ok(())
    }
}

/// The four stages in evaluation order
pub fn pipeline(config: &EngineConfig) -> PipelineRunner {
    PipelineRunner::new(vec![
        Box::new(GroundStage::new(config.clone())),
        Box::new(AirStage),
        Box::new(SailStage),
        Box::new(OsoStage),
    ])
}

/// Evaluate a snapshot end to end
pub fn assess(
    snapshot: &OperationSnapshot,
    prior_evidence: &[OsoEntry],
    config: &EngineConfig,
) -> Result<Assessment, SoraError> {
    assess_with_context(snapshot, prior_evidence, config, &EvaluationContext::new(TABLES_EDITION))
}

pub fn assess_with_context(
    snapshot: &OperationSnapshot,
    prior_evidence: &[OsoEntry],
    config: &EngineConfig,
    ctx: &EvaluationContext,
) -> Result<Assessment, SoraError> {
    if config.conops_completeness {
        if let Err(errors) = validate_snapshot(snapshot) {
            debug!(
                trace_id = %ctx.trace_id,
                study_id = ctx.study_id.as_deref().unwrap_or("-"),
                count = errors.len(),
                "incomplete CONOPS rejected"
            );
            let mut first = errors[0].clone();
            if errors.len() > 1 {
                first.message = format!("{} (and {} more)", first.message, errors.len() - 1);
            }
            return Err(first.into());
        }
    }

    let state = AssessmentState::new(snapshot.clone()).with_prior_evidence(prior_evidence.to_vec());
    let runner = pipeline(config);
    let (state, proofs) = runner.run(&state, ctx).map_err(|e| {
        if matches!(e, SoraError::Configuration(_)) {
            error!(trace_id = %ctx.trace_id, error = %e, "assessment failed on engine configuration");
        }
        e
    })?;

    let assessment = Assessment::from_state(state, Uuid::new_v4(), ctx.tables_edition.clone(), proofs)?;
    debug!(
        trace_id = %ctx.trace_id,
        study_id = ctx.study_id.as_deref().unwrap_or("-"),
        pipeline = runner.pipeline_id(),
        config = %config.name,
        summary = %assessment.summary(),
        "assessment complete"
    );
    Ok(assessment)
}
