//! SORA Engine: ground risk, air risk, SAIL and OSO evaluation
//!
//! Pure functions over an `OperationSnapshot` and the tables in
//! `sora-tables`. No I/O beyond loading configuration.
//!
//! ```ignore
//! let assessment = sora_engine::assess(&snapshot, &[], &EngineConfig::standard())?;
//! println!("{}", assessment.summary());
//! ```

pub mod air;
pub mod assessment;
pub mod config;
pub mod ground;
pub mod oso;
pub mod sail;
pub mod validation;

pub use air::evaluate_air_risk;
pub use assessment::{assess, assess_with_context, pipeline};
pub use config::{ConfigError, EngineConfig, SpeedBasis};
pub use ground::{evaluate_ground_risk, typical_kinetic_energy};
pub use oso::{merge_user_evidence, resolve_oso_requirements, OsoSummary};
pub use sail::resolve_sail;
pub use validation::{validate_snapshot, FieldError};
pub use sora_tables::TABLES_EDITION;
