//! SORA Core: data model, error model and staged pipeline runner
//!
//! Shared vocabulary of the assessment engine: the operation snapshot the
//! evaluators read, the results they produce, and the pipeline that chains
//! them with a hash proof per stage.

pub mod context;
pub mod data_model;
pub mod error;
pub mod results;
pub mod runner;
pub mod stage;
pub mod trace;

pub use context::EvaluationContext;
pub use data_model::{
    AirRiskClass, AirspaceClass, AirspaceEnvironment, DayNight, DroneClass, DroneParameters,
    EnvironmentalLimitations, GroundMitigation, GroundMitigationClaim, OperatingArea,
    OperationParameters, OperationSnapshot, OperationType, PopulationDensity, Robustness, Sail,
    StrategicCategory, StrategicMitigation, TacticalCapability, TacticalMitigationClaim, UasType,
};
pub use error::{require, require_non_negative, require_positive, SoraError};
pub use results::{
    AppliedMitigation, AirRiskResult, Assessment, AssessmentState, CharacteristicColumn,
    Compliance, GroundRiskResult, GroundScenario, OsoCategory, OsoEntry, StageProof,
};
pub use runner::PipelineRunner;
pub use stage::Stage;
pub use trace::{RationaleTrace, TraceKind, TraceStep};

/// Engine version recorded in exported dossiers
pub const ENGINE_VERSION: &str = "1.0.0";
