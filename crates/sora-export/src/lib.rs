//! SORA Export: resolved assessment to Markdown dossier
//!
//! Builds a flat view of an `Assessment` and renders it through the
//! templates in `templates/dossier.yaml`.
//!
//! # Example
//!
//! ```ignore
//! use sora_export::{DossierExporter, StudyMeta};
//!
//! let exporter = DossierExporter::new()?;
//! let markdown = exporter.render(&assessment, &StudyMeta::new("North field survey"))?;
//! ```

pub mod renderer;
pub mod templates;

use chrono::{DateTime, Utc};
use renderer::TemplateRenderer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sora_core::{AppliedMitigation, Assessment, Compliance, OsoEntry, ENGINE_VERSION};
use sora_engine::OsoSummary;
use templates::{TemplatesFile, ENTRY_TEMPLATE};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("EXPORT/template: {0}")]
    Template(String),
    #[error("EXPORT/render: {0}")]
    Render(String),
    #[error("EXPORT/serialize: {0}")]
    Serialize(String),
}

/// Study details that are not part of the assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMeta {
    pub name: String,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl StudyMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: None,
            author: None,
            generated_at: Utc::now(),
        }
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

pub struct DossierExporter<'a> {
    renderer: TemplateRenderer<'a>,
}

impl<'a> DossierExporter<'a> {
    /// Exporter using the templates shipped with the crate
    pub fn new() -> Result<Self, ExportError> {
        Self::from_templates(TemplatesFile::embedded()?)
    }

    pub fn from_templates(templates: TemplatesFile) -> Result<Self, ExportError> {
        Ok(Self {
            renderer: TemplateRenderer::new(templates)?,
        })
    }

    pub fn load(path: &str) -> Result<Self, ExportError> {
        Self::from_templates(TemplatesFile::load(path)?)
    }

    pub fn render(&self, assessment: &Assessment, meta: &StudyMeta) -> Result<String, ExportError> {
        let view = dossier_view(assessment, meta)?;
        self.renderer.render(ENTRY_TEMPLATE, &view)
    }
}

/// Flat JSON view the templates read
pub fn dossier_view(assessment: &Assessment, meta: &StudyMeta) -> Result<Value, ExportError> {
    let snapshot = &assessment.snapshot;
    let drone = &snapshot.drone;
    let operation = &snapshot.operation;

    let ground = &assessment.ground;
    let air = &assessment.air;

    Ok(json!({
        "study": {
            "name": meta.name,
            "operator": meta.operator,
            "author": meta.author,
        },
        "generated_at": meta.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        "evaluated_at": assessment.evaluated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        "assessment_id": assessment.id.to_string(),
        "tables_edition": assessment.tables_edition,
        "engine_version": ENGINE_VERSION,
        "summary": assessment.summary(),
        "sail": assessment.sail.to_string(),
        "drone": {
            "dimension_m": drone.max_characteristic_dimension_m,
            "mtow_kg": drone.mtow_kg,
            "max_speed_ms": drone.max_speed_ms,
            "cruise_speed_ms": drone.cruise_speed_ms,
            "kinetic_energy_j": drone.kinetic_energy_j.map(|j| format!("{:.0} J", j)),
            "class": enum_label(&drone.class_identification)?,
            "uas_type": enum_label(&drone.uas_type)?,
        },
        "operation": {
            "type": operation.operation_type.map(|t| t.to_string()),
            "density": operation.population_density().map(|d| d.to_string()),
            "max_height_m": operation.max_height_m,
            "visual_observers": operation.visual_observers,
            "dangerous_goods": operation.dangerous_goods.unwrap_or(false),
            "dropping_materials": operation.dropping_materials.unwrap_or(false),
            "geo_files": operation.operating_area.geo_file_refs,
        },
        "airspace": {
            "class": enum_label(&snapshot.airspace.airspace_class)?,
        },
        "ground": {
            "scenario": ground.scenario.to_string(),
            "column": ground.column.to_string(),
            "intrinsic_grc": ground.intrinsic_grc,
            "floor": ground.floor,
            "final_grc": ground.final_grc,
            "mitigations": mitigation_rows(&ground.applied_mitigations),
            "trace": ground.trace.steps.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        },
        "air": {
            "initial_arc": air.initial_arc.to_string(),
            "residual_arc": air.residual_arc.to_string(),
            "final_arc": air.final_arc.to_string(),
            "tmpr": air.tmpr.map(|r| r.to_string()),
            "strategic": mitigation_rows(&air.strategic_mitigations),
            "tactical": mitigation_rows(&air.tactical_mitigations),
            "trace": air.trace.steps.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        },
        "osos": assessment.osos.iter().map(oso_row).collect::<Vec<_>>(),
        "oso_summary": OsoSummary::from_entries(&assessment.osos),
    }))
}

fn mitigation_rows(applied: &[AppliedMitigation]) -> Vec<Value> {
    applied
        .iter()
        .map(|m| {
            json!({
                "id": m.mitigation_id,
                "robustness": m.robustness.map(|r| r.to_string()),
                "credit": m.credit_steps,
                "delta": m.delta(),
            })
        })
        .collect()
}

fn oso_row(entry: &OsoEntry) -> Value {
    let compliance = match entry.compliance() {
        Compliance::Optional => "Optional",
        Compliance::Pending => "Pending",
        Compliance::Compliant => "Compliant",
        Compliance::Insufficient => "Insufficient",
    };
    json!({
        "id": entry.oso_id,
        "title": entry.title,
        "category": entry.category.to_string(),
        "required": entry.required_robustness.to_string(),
        "optional": entry.optional,
        "declared": entry.user_declared_robustness.map(|r| r.to_string()),
        "compliance": compliance,
        "evidence": entry.user_evidence.trim(),
        "attachments": entry.attachments,
        "definition_changed": entry.definition_changed,
    })
}

/// Serialized name of an optional enum (`Some(C2)` -> `"c2"`)
fn enum_label<T: Serialize>(value: &Option<T>) -> Result<Value, ExportError> {
    serde_json::to_value(value).map_err(|e| ExportError::Serialize(e.to_string()))
}
