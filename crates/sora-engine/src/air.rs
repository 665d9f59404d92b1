//! Air Risk Evaluator
//!
//! Initial ARC from the airspace context and altitude band, then strategic
//! mitigation by category, then tactical mitigation against the TMPR of the
//! residual class. Every step can only lower the class.

use sora_core::{
    require, require_non_negative, AirRiskClass, AirRiskResult, AirspaceEnvironment,
    AppliedMitigation, OperationParameters, OperationType, RationaleTrace, Robustness,
    SoraError, StrategicCategory, StrategicMitigation, TacticalCapability,
    TacticalMitigationClaim,
};
use sora_tables::arc::{self, AirspaceContext};
use tracing::{debug, error, warn};

/// Strategic categories in application order. Common structures and rules
/// stop at ARC-b, so they go first.
const STRATEGIC_ORDER: [StrategicCategory; 2] = [
    StrategicCategory::CommonStructuresAndRules,
    StrategicCategory::OperationalRestrictions,
];

pub fn evaluate_air_risk(
    operation: &OperationParameters,
    environment: &AirspaceEnvironment,
    strategic: &[StrategicMitigation],
    tactical: &[TacticalMitigationClaim],
) -> Result<AirRiskResult, SoraError> {
    let operation_type = require(operation.operation_type, "operation.operation_type")?;
    let height = require_non_negative(operation.max_height_m, "operation.max_height_m")?;
    let class = require(environment.airspace_class, "airspace.airspace_class")?;

    let mut trace = RationaleTrace::new();

    let context = AirspaceContext::classify(environment, class);
    let bands = arc::candidate_bands(height);
    let (band, initial_arc) = bands
        .iter()
        .map(|b| (*b, arc::initial_arc(context, *b)))
        .max_by_key(|(_, arc)| *arc)
        .ok_or_else(|| {
            error!(height, "no altitude band for height");
            SoraError::Configuration(format!("no altitude band covers {} m", height))
        })?;

    if bands.len() > 1 {
        trace.note(
            "band",
            format!("{} m is on a band boundary, higher ARC of {} bands kept", height, bands.len()),
        );
    }
    trace.lookup("initial ARC", format!("{}, {} -> {}", context, band, initial_arc));

    let (residual_arc, strategic_mitigations) = apply_strategic(initial_arc, strategic, &mut trace);

    let tmpr = arc::tmpr(residual_arc);
    match tmpr {
        Some(level) => trace.lookup("TMPR", format!("{} -> {}", residual_arc, level)),
        None => trace.lookup("TMPR", format!("{} -> no requirement", residual_arc)),
    }

    let (final_arc, tactical_mitigations) =
        apply_tactical(residual_arc, tmpr, operation_type, tactical, &mut trace);

    debug!(%initial_arc, %residual_arc, %final_arc, "air risk evaluated");

    Ok(AirRiskResult {
        initial_arc,
        strategic_mitigations,
        residual_arc,
        tmpr,
        tactical_mitigations,
        final_arc,
        trace,
    })
}

fn apply_strategic(
    initial: AirRiskClass,
    claims: &[StrategicMitigation],
    trace: &mut RationaleTrace,
) -> (AirRiskClass, Vec<AppliedMitigation>) {
    let mut current = initial;
    let mut applied = Vec::new();

    for category in STRATEGIC_ORDER {
        let mut in_category = claims.iter().filter(|m| m.category() == category);
        let Some(first) = in_category.next() else {
            continue;
        };
        for repeated in in_category {
            trace.note(repeated.id(), format!("{:?} already claimed, counted once", category));
        }

        let floor = arc::strategic_floor(category);
        let lowered = current.lowered(arc::STRATEGIC_CREDIT_PER_CATEGORY);
        if lowered < floor {
            warn!(mitigation = first.id(), %current, "strategic mitigation excluded");
            trace.excluded(first.id(), format!("cannot lower {} below {}", current, floor));
            continue;
        }
        if lowered == current {
            trace.note(first.id(), format!("already at {}", current));
            continue;
        }

        trace.credit(first.id(), format!("{} -> {}", current, lowered));
        applied.push(AppliedMitigation::new(first.id(), arc::STRATEGIC_CREDIT_PER_CATEGORY as i8));
        current = lowered;
    }

    (current, applied)
}

fn apply_tactical(
    residual: AirRiskClass,
    tmpr: Option<Robustness>,
    operation_type: OperationType,
    claims: &[TacticalMitigationClaim],
    trace: &mut RationaleTrace,
) -> (AirRiskClass, Vec<AppliedMitigation>) {
    if claims.is_empty() {
        return (residual, Vec::new());
    }
    let Some(required) = tmpr else {
        for claim in claims {
            trace.note(claim.capability.id(), format!("{} needs no tactical mitigation", residual));
        }
        return (residual, Vec::new());
    };

    let mut qualifying: Vec<&TacticalMitigationClaim> = Vec::new();
    for claim in claims {
        let id = claim.capability.id();
        if !arc::is_detect_and_avoid(claim.capability) {
            continue;
        }
        if claim.capability == TacticalCapability::VisualSeeAndAvoid && !operation_type.has_visual_contact() {
            warn!(mitigation = id, "see-and-avoid claimed for a BVLOS operation");
            trace.excluded(id, format!("visual see-and-avoid is not available for {}", operation_type));
            continue;
        }
        if claim.robustness < required {
            warn!(mitigation = id, robustness = %claim.robustness, tmpr = %required, "tactical mitigation below TMPR");
            trace.excluded(id, format!("{} robustness is below the TMPR {}", claim.robustness, required));
            continue;
        }
        qualifying.push(claim);
    }

    let conspicuity = claims.iter().find(|c| {
        c.capability == TacticalCapability::ElectronicConspicuity
            && c.robustness >= arc::COMBINATION_CONSPICUITY_LEVEL
    });
    let combination_daa = qualifying.iter().find(|c| {
        c.capability == TacticalCapability::DetectAndAvoid && c.robustness >= arc::COMBINATION_DAA_LEVEL
    });

    let mut applied = Vec::new();
    match (combination_daa, conspicuity, qualifying.first()) {
        (Some(daa), Some(ec), _) => {
            applied.push(AppliedMitigation::new(daa.capability.id(), 1).with_robustness(daa.robustness));
            applied.push(AppliedMitigation::new(ec.capability.id(), 1).with_robustness(ec.robustness));
            trace.credit(
                daa.capability.id(),
                format!("combined with {}: {} classes", ec.capability.id(), arc::TACTICAL_COMBINATION_CREDIT),
            );
        }
        (_, _, Some(best)) => {
            applied.push(
                AppliedMitigation::new(best.capability.id(), arc::TACTICAL_SINGLE_CREDIT as i8)
                    .with_robustness(best.robustness),
            );
            trace.credit(best.capability.id(), format!("meets TMPR {}: 1 class", required));
            for other in qualifying.iter().skip(1) {
                trace.note(other.capability.id(), "tactical credit capped at one class without the combination");
            }
        }
        (_, _, None) => {}
    }

    if applied.is_empty() {
        for claim in claims {
            if claim.capability == TacticalCapability::ElectronicConspicuity {
                trace.excluded(claim.capability.id(), "electronic conspicuity alone does not qualify");
            }
        }
        return (residual, applied);
    }

    let credit: u8 = applied.iter().map(|m| m.credit_steps.max(0) as u8).sum();
    let final_arc = residual.lowered(credit);
    if final_arc.index() + (credit as usize) > residual.index() {
        trace.clamp("ARC", format!("{} - {} clamped to {}", residual, credit, final_arc));
    }
    (final_arc, applied)
}
