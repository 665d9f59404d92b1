//! Integration tests for sora-export: assess a snapshot, render the dossier.

use sora_core::{
    AirspaceClass, AirspaceEnvironment, Assessment, DroneParameters, GroundMitigation, OperationParameters,
    OperationSnapshot, OperationType, PopulationDensity, Robustness, StrategicMitigation,
};
use sora_engine::{assess, EngineConfig};
use sora_export::templates::TemplatesFile;
use sora_export::{dossier_view, DossierExporter, ExportError, StudyMeta};

fn workspace_file(relative: &str) -> String {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    workspace_root.join(relative).to_string_lossy().to_string()
}

fn reference_assessment() -> Assessment {
    let snapshot = OperationSnapshot::new(
        DroneParameters::new(0.35, 15.0, 0.9),
        OperationParameters::new(OperationType::Vlos, PopulationDensity::SparselyPopulated)
            .with_height(100.0)
            .with_geo_file("https://files.example/sora-file/s1/geo/area.kml"),
        AirspaceEnvironment::new(AirspaceClass::G),
    )
    .with_ground_mitigation(GroundMitigation::StrategicReduction, Robustness::Low)
    .with_strategic_mitigation(StrategicMitigation::RestrictedBoundary);

    let mut assessment = assess(&snapshot, &[], &EngineConfig::standard()).unwrap();
    assessment.osos[0].user_evidence = "Operator manual v3, chapter 2".to_string();
    assessment.osos[0].user_declared_robustness = Some(Robustness::Medium);
    assessment
}

// =============================================================================
// Dossier content
// =============================================================================

#[test]
fn test_dossier_contains_every_section() {
    let exporter = DossierExporter::new().unwrap();
    let meta = StudyMeta::new("North field survey").with_operator("Aerial Works");
    let markdown = exporter.render(&reference_assessment(), &meta).unwrap();

    assert!(markdown.starts_with("# SORA dossier: North field survey"));
    assert!(markdown.contains("| Operator | Aerial Works |"));
    assert!(markdown.contains("| Prepared by | - |"));
    assert!(markdown.contains("**SAIL I**: iGRC 2 -> GRC 1, ARC-b -> ARC-a, SAIL I"));
    assert!(markdown.contains("## Ground risk"));
    assert!(markdown.contains("| M1 | Low | -1 |"));
    assert!(markdown.contains("## Air risk"));
    assert!(markdown.contains("Strategic SM-boundary: -1"));
    assert!(markdown.contains("## Operational safety objectives (SAIL I)"));
    assert!(markdown.contains("area.kml"));
}

#[test]
fn test_dossier_shows_penalty_as_positive_delta() {
    let snapshot = OperationSnapshot::new(
        DroneParameters::new(0.35, 15.0, 0.9),
        OperationParameters::new(OperationType::Vlos, PopulationDensity::SparselyPopulated).with_height(100.0),
        AirspaceEnvironment::new(AirspaceClass::G),
    )
    .with_ground_mitigation(GroundMitigation::ImpactReduction, Robustness::Low)
    .with_ground_mitigation(GroundMitigation::EmergencyResponsePlan, Robustness::Low);
    let assessment = assess(&snapshot, &[], &EngineConfig::standard()).unwrap();

    let markdown = DossierExporter::new()
        .unwrap()
        .render(&assessment, &StudyMeta::new("Penalty"))
        .unwrap();

    assert!(markdown.contains("| M2 | Low | 0 |"));
    assert!(markdown.contains("| M3 | Low | +1 |"));
}

#[test]
fn test_dossier_lists_oso_evidence() {
    let exporter = DossierExporter::new().unwrap();
    let markdown = exporter
        .render(&reference_assessment(), &StudyMeta::new("Evidence"))
        .unwrap();

    assert!(markdown.contains("| OSO#01 |"));
    assert!(markdown.contains("| OSO#24 |"));
    assert!(markdown.contains("Operator manual v3, chapter 2"));
    assert!(markdown.contains("| Compliant |"));
    assert!(markdown.contains("1 compliant,"));
    assert!(markdown.contains("out of 24."));
}

#[test]
fn test_dossier_includes_rationale_trace() {
    let exporter = DossierExporter::new().unwrap();
    let markdown = exporter.render(&reference_assessment(), &StudyMeta::new("Trace")).unwrap();

    assert!(markdown.contains("<details><summary>Rationale</summary>"));
    assert!(markdown.contains("CREDIT [M1]"));
}

#[test]
fn test_view_exposes_resolved_values() {
    let view = dossier_view(&reference_assessment(), &StudyMeta::new("View")).unwrap();

    assert_eq!(view["sail"], "SAIL I");
    assert_eq!(view["ground"]["intrinsic_grc"], 2);
    assert_eq!(view["ground"]["final_grc"], 1);
    assert_eq!(view["air"]["final_arc"], "ARC-a");
    assert_eq!(view["osos"].as_array().unwrap().len(), 24);
    assert_eq!(view["oso_summary"]["total"], 24);
    assert_eq!(view["operation"]["dangerous_goods"], false);
}

#[test]
fn test_rendering_is_stable_for_same_inputs() {
    let exporter = DossierExporter::new().unwrap();
    let assessment = reference_assessment();
    let meta = StudyMeta::new("Stable");

    assert_eq!(
        exporter.render(&assessment, &meta).unwrap(),
        exporter.render(&assessment, &meta).unwrap()
    );
}

// =============================================================================
// Template overrides
// =============================================================================

#[test]
fn test_shipped_templates_file_loads() {
    let exporter = DossierExporter::load(&workspace_file("crates/sora-export/templates/dossier.yaml")).unwrap();
    let markdown = exporter.render(&reference_assessment(), &StudyMeta::new("From disk")).unwrap();
    assert!(markdown.contains("SAIL I"));
}

#[test]
fn test_custom_entry_template() {
    let templates = TemplatesFile::from_yaml(
        r#"
version: "1.0"
templates:
  dossier:
    description: one line
    template: "{{study.name}}: {{sail}} (GRC {{ground.final_grc}}, {{air.final_arc}})"
"#,
    )
    .unwrap();
    let exporter = DossierExporter::from_templates(templates).unwrap();
    let out = exporter.render(&reference_assessment(), &StudyMeta::new("Short")).unwrap();
    assert_eq!(out, "Short: SAIL I (GRC 1, ARC-a)");
}

#[test]
fn test_missing_templates_file_is_an_error() {
    let err = DossierExporter::load("/nonexistent/dossier.yaml").err().unwrap();
    assert!(matches!(err, ExportError::Template(_)));
}
