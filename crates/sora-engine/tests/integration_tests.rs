//! Integration tests for sora-engine over whole snapshots.
//!
//! These tests run the full pipeline and check the properties every
//! assessment must hold, independent of a particular table cell.

use sora_core::{
    AirRiskClass, AirspaceClass, AirspaceEnvironment, DroneParameters, GroundMitigation,
    OperationParameters, OperationSnapshot, OperationType, PopulationDensity, Robustness, Sail,
    StrategicMitigation, TacticalCapability,
};
use sora_engine::{
    assess, evaluate_air_risk, evaluate_ground_risk, merge_user_evidence, resolve_oso_requirements,
    resolve_sail, EngineConfig,
};

/// Path of a file relative to the workspace root
fn workspace_file(relative: &str) -> String {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    workspace_root.join(relative).to_string_lossy().to_string()
}

fn small_multirotor_vlos() -> OperationSnapshot {
    OperationSnapshot::new(
        DroneParameters::new(0.35, 15.0, 0.9),
        OperationParameters::new(OperationType::Vlos, PopulationDensity::SparselyPopulated).with_height(100.0),
        AirspaceEnvironment::new(AirspaceClass::G),
    )
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn test_small_multirotor_reference_scenario() {
    let snapshot = small_multirotor_vlos()
        .with_ground_mitigation(GroundMitigation::StrategicReduction, Robustness::Low)
        .with_strategic_mitigation(StrategicMitigation::RestrictedBoundary);

    let assessment = assess(&snapshot, &[], &EngineConfig::standard()).unwrap();

    assert_eq!(assessment.ground.intrinsic_grc, 2);
    assert_eq!(assessment.ground.final_grc, 1);
    assert_eq!(assessment.air.initial_arc, AirRiskClass::B);
    assert_eq!(assessment.air.final_arc, AirRiskClass::A);
    assert_eq!(assessment.sail, Sail::I);
    assert_eq!(assessment.osos.len(), 24);
    assert!(assessment.osos.iter().all(|o| o.required_robustness == Robustness::Low));
    assert_eq!(assessment.summary(), "iGRC 2 -> GRC 1, ARC-b -> ARC-a, SAIL I");
}

#[test]
fn test_populated_bvlos_with_high_strategic_reduction() {
    let snapshot = OperationSnapshot::new(
        DroneParameters::new(2.0, 20.0, 5.0),
        OperationParameters::new(OperationType::Bvlos, PopulationDensity::Populated).with_height(100.0),
        AirspaceEnvironment::new(AirspaceClass::G),
    )
    .with_ground_mitigation(GroundMitigation::StrategicReduction, Robustness::High);

    let assessment = assess(&snapshot, &[], &EngineConfig::standard()).unwrap();

    assert_eq!(assessment.ground.intrinsic_grc, 6);
    assert_eq!(assessment.ground.final_grc, 2);
    assert_eq!(assessment.ground.applied_mitigations[0].mitigation_id, "M1");
    assert_eq!(assessment.ground.applied_mitigations[0].delta(), "-4");
}

#[test]
fn test_weak_emergency_plan_raises_sail() {
    let base = small_multirotor_vlos().with_strategic_mitigation(StrategicMitigation::RestrictedBoundary);
    let with_plan = base
        .clone()
        .with_ground_mitigation(GroundMitigation::EmergencyResponsePlan, Robustness::Low);
    let config = EngineConfig::standard();

    let without = assess(&base, &[], &config).unwrap();
    let with = assess(&with_plan, &[], &config).unwrap();

    assert_eq!(without.ground.final_grc, 2);
    assert_eq!(without.sail, Sail::I);
    assert_eq!(with.ground.final_grc, 3);
    assert_eq!(with.sail, Sail::II);
}

#[test]
fn test_dimension_on_boundary_uses_higher_column() {
    let config = EngineConfig::standard();
    let operation = OperationParameters::new(OperationType::Vlos, PopulationDensity::SparselyPopulated);

    // Low energy so only the dimension decides the column
    let below = DroneParameters::new(0.99, 5.0, 1.0);
    let on_edge = DroneParameters::new(1.0, 5.0, 1.0);

    let below = evaluate_ground_risk(&below, &operation, &[], &config).unwrap();
    let on_edge = evaluate_ground_risk(&on_edge, &operation, &[], &config).unwrap();
    assert_eq!(below.intrinsic_grc, 2);
    assert_eq!(on_edge.intrinsic_grc, 3);
}

#[test]
fn test_height_on_boundary_uses_higher_arc() {
    let environment = AirspaceEnvironment::new(AirspaceClass::G);
    let below = OperationParameters::new(OperationType::Vlos, PopulationDensity::SparselyPopulated).with_height(152.0);
    let on_edge = OperationParameters::new(OperationType::Vlos, PopulationDensity::SparselyPopulated).with_height(152.4);

    assert_eq!(evaluate_air_risk(&below, &environment, &[], &[]).unwrap().initial_arc, AirRiskClass::B);
    assert_eq!(evaluate_air_risk(&on_edge, &environment, &[], &[]).unwrap().initial_arc, AirRiskClass::C);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_determinism() {
    let snapshot = small_multirotor_vlos()
        .with_ground_mitigation(GroundMitigation::ImpactReduction, Robustness::Medium)
        .with_tactical_mitigation(TacticalCapability::VisualSeeAndAvoid, Robustness::Low);
    let config = EngineConfig::standard();

    let first = assess(&snapshot, &[], &config).unwrap();
    let second = assess(&snapshot, &[], &config).unwrap();

    assert_eq!(first.ground, second.ground);
    assert_eq!(first.air, second.air);
    assert_eq!(first.sail, second.sail);
    assert_eq!(first.osos, second.osos);
    let hashes = |a: &sora_core::Assessment| {
        a.proofs.iter().map(|p| (p.in_hash.clone(), p.out_hash.clone())).collect::<Vec<_>>()
    };
    assert_eq!(hashes(&first), hashes(&second));
}

#[test]
fn test_ground_monotonic_in_density_and_size() {
    let config = EngineConfig::standard();
    let densities = [
        PopulationDensity::ControlledGroundArea,
        PopulationDensity::SparselyPopulated,
        PopulationDensity::Populated,
    ];
    let dimensions = [0.5, 2.0, 5.0, 10.0];

    for op_type in [OperationType::Vlos, OperationType::Bvlos] {
        let mut previous_row: Option<Vec<u8>> = None;
        for density in densities {
            let operation = OperationParameters::new(op_type, density);
            let row: Vec<u8> = dimensions
                .iter()
                .map(|d| {
                    evaluate_ground_risk(&DroneParameters::new(*d, 1.0, 0.5), &operation, &[], &config)
                        .unwrap()
                        .intrinsic_grc
                })
                .collect();
            assert!(row.windows(2).all(|w| w[0] <= w[1]), "{:?}", row);
            if let Some(prev) = &previous_row {
                assert!(prev.iter().zip(&row).all(|(a, b)| a <= b));
            }
            previous_row = Some(row);
        }
    }
}

#[test]
fn test_crediting_mitigation_never_raises_grc() {
    let config = EngineConfig::standard();
    let drone = DroneParameters::new(2.5, 25.0, 12.0);
    let operation = OperationParameters::new(OperationType::Bvlos, PopulationDensity::Populated);

    // Every cell here carries a non-negative credit
    let all = [
        (GroundMitigation::StrategicReduction, Robustness::Medium),
        (GroundMitigation::ImpactReduction, Robustness::Medium),
        (GroundMitigation::EmergencyResponsePlan, Robustness::High),
    ];

    let mut claims = Vec::new();
    let mut previous = evaluate_ground_risk(&drone, &operation, &claims, &config).unwrap().final_grc;
    for (mitigation, robustness) in all {
        claims.push(sora_core::GroundMitigationClaim { mitigation, robustness });
        let result = evaluate_ground_risk(&drone, &operation, &claims, &config).unwrap();
        assert!(result.final_grc <= previous);
        assert!(result.final_grc >= result.floor);
        previous = result.final_grc;
    }
    assert_eq!(previous, 2);
}

#[test]
fn test_air_mitigations_never_raise_arc() {
    let environment = AirspaceEnvironment::new(AirspaceClass::D);
    let operation = OperationParameters::new(OperationType::Vlos, PopulationDensity::Populated).with_height(200.0);

    let strategic_sets: Vec<Vec<StrategicMitigation>> = vec![
        vec![],
        vec![StrategicMitigation::CommonRules],
        vec![StrategicMitigation::CommonRules, StrategicMitigation::RestrictedTime],
    ];
    let tactical = [sora_core::TacticalMitigationClaim {
        capability: TacticalCapability::DetectAndAvoid,
        robustness: Robustness::High,
    }];

    let none: &[sora_core::TacticalMitigationClaim] = &[];

    let mut previous = AirRiskClass::D;
    for strategic in &strategic_sets {
        for tactical in [none, &tactical[..]] {
            let result = evaluate_air_risk(&operation, &environment, strategic, tactical).unwrap();
            assert!(result.final_arc <= result.residual_arc);
            assert!(result.residual_arc <= result.initial_arc);
        }
        let result = evaluate_air_risk(&operation, &environment, strategic, &[]).unwrap();
        assert!(result.final_arc <= previous);
        previous = result.final_arc;
    }
    assert_eq!(previous, AirRiskClass::B);
}

#[test]
fn test_sail_monotonic() {
    for grc in 1..=7u8 {
        for arc in AirRiskClass::ALL {
            let here = resolve_sail(grc, arc).unwrap();
            for grc2 in grc..=7 {
                for arc2 in AirRiskClass::ALL.iter().filter(|a| **a >= arc) {
                    assert!(resolve_sail(grc2, *arc2).unwrap() >= here);
                }
            }
        }
    }
}

#[test]
fn test_evidence_survives_sail_change() {
    let snapshot = small_multirotor_vlos();
    let first = assess(&snapshot, &[], &EngineConfig::standard()).unwrap();

    let mut prior = first.osos.clone();
    for entry in prior.iter_mut() {
        entry.user_evidence = format!("evidence for {}", entry.label());
        entry.attachments = vec![format!("study-1/technical/1700000000000_oso{}.pdf", entry.oso_id)];
    }

    let riskier = OperationSnapshot {
        operation: snapshot.operation.clone().with_height(300.0),
        ..snapshot
    };
    let second = assess(&riskier, &prior, &EngineConfig::standard()).unwrap();

    assert!(second.sail > first.sail);
    for entry in &second.osos {
        assert_eq!(entry.user_evidence, format!("evidence for {}", entry.label()));
        assert_eq!(entry.attachments.len(), 1);
    }
    assert_eq!(merge_user_evidence(resolve_oso_requirements(second.sail), &prior), second.osos);
}

// =============================================================================
// Errors and configuration
// =============================================================================

#[test]
fn test_failed_assessment_is_all_or_nothing() {
    let mut snapshot = small_multirotor_vlos();
    snapshot.airspace.airspace_class = None;
    let err = assess(&snapshot, &[], &EngineConfig::standard()).unwrap_err();
    assert_eq!(err.field(), Some("airspace.airspace_class"));
}

#[test]
fn test_out_of_scope_grc() {
    // Large fast aircraft BVLOS over a populated area with no mitigation: iGRC 10
    let snapshot = OperationSnapshot::new(
        DroneParameters::new(12.0, 60.0, 900.0),
        OperationParameters::new(OperationType::Bvlos, PopulationDensity::Populated).with_height(100.0),
        AirspaceEnvironment::new(AirspaceClass::G),
    );
    let err = assess(&snapshot, &[], &EngineConfig::standard()).unwrap_err();
    assert_eq!(err.code(), "SCOPE");
}

#[test]
fn test_conservative_profile_file() {
    let config = EngineConfig::load(workspace_file("config/conservative.yaml")).unwrap();
    assert_eq!(config, EngineConfig::conservative());
}
