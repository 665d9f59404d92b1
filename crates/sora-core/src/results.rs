//! Evaluation results: ground, air, SAIL, OSO and the resolved assessment
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::data_model::{AirRiskClass, OperationSnapshot, Robustness, Sail};
use crate::error::SoraError;
use crate::trace::RationaleTrace;

// ============================================================================
// Table keys
// ============================================================================

/// Column of the intrinsic GRC table: UA size and typical kinetic energy class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacteristicColumn {
    /// Up to 1 m, up to 700 J
    UpTo1m,
    /// Up to 3 m, up to 34 kJ
    UpTo3m,
    /// Up to 8 m, up to 1084 kJ
    UpTo8m,
    /// Above 8 m or above 1084 kJ
    Above8m,
}

impl CharacteristicColumn {
    pub const ALL: [CharacteristicColumn; 4] = [
        CharacteristicColumn::UpTo1m,
        CharacteristicColumn::UpTo3m,
        CharacteristicColumn::UpTo8m,
        CharacteristicColumn::Above8m,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx.min(Self::ALL.len() - 1)]
    }
}

impl fmt::Display for CharacteristicColumn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CharacteristicColumn::UpTo1m => write!(f, "1 m / 700 J"),
            CharacteristicColumn::UpTo3m => write!(f, "3 m / 34 kJ"),
            CharacteristicColumn::UpTo8m => write!(f, "8 m / 1084 kJ"),
            CharacteristicColumn::Above8m => write!(f, ">8 m / >1084 kJ"),
        }
    }
}

/// Row of the intrinsic GRC table: operational scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundScenario {
    ControlledGroundArea,
    VlosSparselyPopulated,
    BvlosSparselyPopulated,
    VlosPopulated,
    BvlosPopulated,
    VlosGathering,
    BvlosGathering,
}

impl GroundScenario {
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for GroundScenario {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            GroundScenario::ControlledGroundArea => "VLOS/BVLOS over controlled ground area",
            GroundScenario::VlosSparselyPopulated => "VLOS in sparsely populated environment",
            GroundScenario::BvlosSparselyPopulated => "BVLOS in sparsely populated environment",
            GroundScenario::VlosPopulated => "VLOS in populated environment",
            GroundScenario::BvlosPopulated => "BVLOS in populated environment",
            GroundScenario::VlosGathering => "VLOS over gathering of people",
            GroundScenario::BvlosGathering => "BVLOS over gathering of people",
        };
        write!(f, "{}", label)
    }
}

// ============================================================================
// Ground / air results
// ============================================================================

/// A mitigation that was counted, with the credit it earned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMitigation {
    pub mitigation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robustness: Option<Robustness>,
    /// Classes removed; negative for a published penalty (M3 at Low)
    pub credit_steps: i8,
}

impl AppliedMitigation {
    pub fn new(mitigation_id: impl Into<String>, credit_steps: i8) -> Self {
        Self {
            mitigation_id: mitigation_id.into(),
            robustness: None,
            credit_steps,
        }
    }

    pub fn with_robustness(mut self, robustness: Robustness) -> Self {
        self.robustness = Some(robustness);
        self
    }

    /// Effect on the risk class as written in the tables: `-2`, `+1` or `0`
    pub fn delta(&self) -> String {
        match self.credit_steps {
            0 => "0".to_string(),
            c if c > 0 => format!("-{}", c),
            c => format!("+{}", -(c as i16)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundRiskResult {
    pub intrinsic_grc: u8,
    pub column: CharacteristicColumn,
    pub scenario: GroundScenario,
    /// Lowest GRC reachable in the applicable column
    pub floor: u8,
    pub applied_mitigations: Vec<AppliedMitigation>,
    pub final_grc: u8,
    pub trace: RationaleTrace,
}

impl GroundRiskResult {
    /// Net credit of the counted mitigations, penalties included
    pub fn total_credit(&self) -> i32 {
        self.applied_mitigations.iter().map(|m| m.credit_steps as i32).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirRiskResult {
    pub initial_arc: AirRiskClass,
    pub strategic_mitigations: Vec<AppliedMitigation>,
    /// ARC after strategic mitigation, before tactical mitigation
    pub residual_arc: AirRiskClass,
    /// Tactical mitigation performance requirement for the residual ARC
    pub tmpr: Option<Robustness>,
    pub tactical_mitigations: Vec<AppliedMitigation>,
    pub final_arc: AirRiskClass,
    pub trace: RationaleTrace,
}

// ============================================================================
// OSO
// ============================================================================

/// Threat family an operational safety objective addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsoCategory {
    TechnicalIssue,
    ExternalSystemsDeterioration,
    HumanError,
    AdverseOperatingConditions,
}

impl fmt::Display for OsoCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OsoCategory::TechnicalIssue => write!(f, "Technical issue with the UAS"),
            OsoCategory::ExternalSystemsDeterioration => write!(f, "Deterioration of external systems"),
            OsoCategory::HumanError => write!(f, "Human error"),
            OsoCategory::AdverseOperatingConditions => write!(f, "Adverse operating conditions"),
        }
    }
}

/// One operational safety objective with its requirement and the user's evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsoEntry {
    pub oso_id: u8,
    pub title: String,
    pub category: OsoCategory,
    /// Derived from SAIL; never edited by the user
    pub required_robustness: Robustness,
    /// Published as optional at this SAIL (recorded at Low)
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub user_evidence: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub user_declared_robustness: Option<Robustness>,
    /// Catalogue wording changed since the evidence was written
    #[serde(default)]
    pub definition_changed: bool,
}

impl OsoEntry {
    /// Display label, e.g. `OSO#07`
    pub fn label(&self) -> String {
        format!("OSO#{:02}", self.oso_id)
    }

    pub fn has_evidence(&self) -> bool {
        !self.user_evidence.trim().is_empty()
            || !self.attachments.is_empty()
            || self.user_declared_robustness.is_some()
    }

    pub fn compliance(&self) -> Compliance {
        match self.user_declared_robustness {
            None if self.optional => Compliance::Optional,
            None => Compliance::Pending,
            Some(declared) if declared >= self.required_robustness => Compliance::Compliant,
            Some(_) => Compliance::Insufficient,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compliance {
    /// Nothing declared for an optional objective
    Optional,
    /// Nothing declared yet
    Pending,
    Compliant,
    /// Declared robustness is below the requirement
    Insufficient,
}

// ============================================================================
// Pipeline state and resolved assessment
// ============================================================================

/// Proof that a stage ran, with hashes of its input and output state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProof {
    pub id: String,
    pub in_hash: String,
    pub out_hash: String,
    pub deterministic: bool,
    pub latency_us: u64,
}

/// Working state passed between pipeline stages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentState {
    pub snapshot: OperationSnapshot,
    /// OSO entries from a previous evaluation whose evidence must survive
    #[serde(default)]
    pub prior_evidence: Vec<OsoEntry>,
    pub ground: Option<GroundRiskResult>,
    pub air: Option<AirRiskResult>,
    pub sail: Option<Sail>,
    #[serde(default)]
    pub osos: Vec<OsoEntry>,
}

impl AssessmentState {
    pub fn new(snapshot: OperationSnapshot) -> Self {
        Self {
            snapshot,
            ..Default::default()
        }
    }

    pub fn with_prior_evidence(mut self, prior: Vec<OsoEntry>) -> Self {
        self.prior_evidence = prior;
        self
    }
}

/// Fully resolved snapshot: inputs plus every derived result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub tables_edition: String,
    pub evaluated_at: DateTime<Utc>,
    pub snapshot: OperationSnapshot,
    pub ground: GroundRiskResult,
    pub air: AirRiskResult,
    pub sail: Sail,
    pub osos: Vec<OsoEntry>,
    #[serde(default)]
    pub proofs: Vec<StageProof>,
}

impl Assessment {
    /// Build from a completed pipeline state; every stage must have produced its output
    pub fn from_state(
        state: AssessmentState,
        id: Uuid,
        tables_edition: impl Into<String>,
        proofs: Vec<StageProof>,
    ) -> Result<Self, SoraError> {
        let ground = state
            .ground
            .ok_or_else(|| SoraError::Configuration("pipeline finished without a ground risk result".into()))?;
        let air = state
            .air
            .ok_or_else(|| SoraError::Configuration("pipeline finished without an air risk result".into()))?;
        let sail = state
            .sail
            .ok_or_else(|| SoraError::Configuration("pipeline finished without a SAIL".into()))?;

        Ok(Self {
            id,
            tables_edition: tables_edition.into(),
            evaluated_at: Utc::now(),
            snapshot: state.snapshot,
            ground,
            air,
            sail,
            osos: state.osos,
            proofs,
        })
    }

    /// One-line summary for logs and listings
    pub fn summary(&self) -> String {
        format!(
            "iGRC {} -> GRC {}, {} -> {}, {}",
            self.ground.intrinsic_grc,
            self.ground.final_grc,
            self.air.initial_arc,
            self.air.final_arc,
            self.sail
        )
    }
}
