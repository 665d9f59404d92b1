//! Ground Risk Evaluator
//!
//! Intrinsic GRC from the UA column and the overflown population, then
//! ground mitigation credits down to the column floor.

use std::collections::HashSet;

use sora_core::{
    require, require_non_negative, require_positive, AppliedMitigation, DroneParameters,
    GroundMitigation, GroundMitigationClaim, GroundRiskResult, OperationParameters,
    OperationType, PopulationDensity, RationaleTrace, SoraError,
};
use sora_tables::{grc, mitigation};
use tracing::{debug, error, warn};

use crate::config::{EngineConfig, SpeedBasis};

pub fn evaluate_ground_risk(
    drone: &DroneParameters,
    operation: &OperationParameters,
    mitigations: &[GroundMitigationClaim],
    config: &EngineConfig,
) -> Result<GroundRiskResult, SoraError> {
    let dimension = require_positive(drone.max_characteristic_dimension_m, "drone.max_characteristic_dimension_m")?;
    let operation_type = require(operation.operation_type, "operation.operation_type")?;
    let density = require(
        operation.population_density(),
        "operation.operating_area.population_density",
    )?;
    let kinetic_energy = typical_kinetic_energy(drone, config)?;

    let mut trace = RationaleTrace::new();

    let column = grc::effective_column(dimension, kinetic_energy);
    trace.lookup(
        "column",
        format!("dimension {} m, kinetic energy {:.0} J -> {}", dimension, kinetic_energy, column),
    );

    let vlos_rows = match operation_type {
        OperationType::Vlos => true,
        OperationType::Evlos => !config.evlos_on_bvlos_rows,
        OperationType::Bvlos => false,
    };
    if operation_type == OperationType::Evlos {
        trace.note(
            "scenario",
            format!("EVLOS evaluated on {} rows", if vlos_rows { "VLOS" } else { "BVLOS" }),
        );
    }

    let scenario = grc::scenario_for(density, vlos_rows);
    let intrinsic_grc = grc::intrinsic_grc(scenario, column).ok_or_else(|| {
        SoraError::OutOfScope(format!(
            "{} with a UA in column {} is outside the specific category",
            scenario, column
        ))
    })?;
    trace.lookup("iGRC", format!("{} x {} -> {}", scenario, column, intrinsic_grc));

    let applied = apply_mitigations(mitigations, density, &mut trace)?;
    let credit: i32 = applied.iter().map(|m| m.credit_steps as i32).sum();

    let floor = grc::column_floor(column);
    let final_grc = reduce_to_floor(intrinsic_grc, floor, &applied, &mut trace);

    debug!(intrinsic_grc, credit, final_grc, %column, %scenario, "ground risk evaluated");

    Ok(GroundRiskResult {
        intrinsic_grc,
        column,
        scenario,
        floor,
        applied_mitigations: applied,
        final_grc,
        trace,
    })
}

/// Kinetic energy in joules used for the column lookup
pub fn typical_kinetic_energy(drone: &DroneParameters, config: &EngineConfig) -> Result<f64, SoraError> {
    let mtow = require_positive(drone.mtow_kg, "drone.mtow_kg")?;
    let max_speed = require_positive(drone.max_speed_ms, "drone.max_speed_ms")?;
    let cruise_speed = require_positive(drone.cruise_speed_ms, "drone.cruise_speed_ms")?;

    let speed = match config.kinetic_energy_speed {
        SpeedBasis::MaxSpeed => max_speed,
        SpeedBasis::CruiseSpeed => cruise_speed,
    };
    let computed = 0.5 * mtow * speed * speed;

    match drone.kinetic_energy_j {
        None => Ok(computed),
        Some(_) => {
            let declared = require_non_negative(drone.kinetic_energy_j, "drone.kinetic_energy_j")?;
            if config.trust_declared_kinetic_energy {
                Ok(declared)
            } else {
                Ok(declared.max(computed))
            }
        }
    }
}

/// Credits per claim, in application order (M1, M2, M3)
fn apply_mitigations(
    claims: &[GroundMitigationClaim],
    density: PopulationDensity,
    trace: &mut RationaleTrace,
) -> Result<Vec<AppliedMitigation>, SoraError> {
    let mut seen = HashSet::new();
    for claim in claims {
        if !seen.insert(claim.mitigation) {
            let id = claim.mitigation.id();
            let message = format!("{} claimed more than once", id);
            error!(mitigation = id, "{}", message);
            return Err(SoraError::Configuration(message));
        }
    }

    let mut ordered: Vec<&GroundMitigationClaim> = claims.iter().collect();
    ordered.sort_by_key(|c| c.mitigation);

    let mut applied = Vec::new();
    for claim in ordered {
        let id = claim.mitigation.id();

        let credit = mitigation::ground_credit(claim.mitigation, claim.robustness).ok_or_else(|| {
            let message = format!("no credit published for {} at {} robustness", id, claim.robustness);
            error!(mitigation = id, robustness = %claim.robustness, "{}", message);
            SoraError::Configuration(message)
        })?;

        if let Some(reason) = unmet_precondition(claim.mitigation, density) {
            warn!(mitigation = id, reason, "ground mitigation excluded");
            trace.excluded(id, reason);
            continue;
        }

        let counted = AppliedMitigation::new(id, credit).with_robustness(claim.robustness);
        trace.credit(id, format!("{} ({} robustness)", counted.delta(), claim.robustness));
        applied.push(counted);
    }

    Ok(applied)
}

/// Apply each credit in turn; no step goes below the column floor
fn reduce_to_floor(intrinsic_grc: u8, floor: u8, applied: &[AppliedMitigation], trace: &mut RationaleTrace) -> u8 {
    let mut grc = intrinsic_grc as i32;
    for m in applied {
        let next = grc - m.credit_steps as i32;
        if next < floor as i32 {
            trace.clamp(
                "floor",
                format!("{} {} {} clamped to column floor {}", grc, m.delta(), m.mitigation_id, floor),
            );
            grc = floor as i32;
        } else {
            grc = next;
        }
    }
    grc as u8
}

fn unmet_precondition(mitigation: GroundMitigation, density: PopulationDensity) -> Option<&'static str> {
    match mitigation {
        GroundMitigation::StrategicReduction if density == PopulationDensity::ControlledGroundArea => {
            Some("a controlled ground area has no uninvolved people left to shelter or keep away")
        }
        _ => None,
    }
}
