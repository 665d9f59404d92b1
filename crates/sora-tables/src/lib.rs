//! SORA lookup tables
//!
//! Published SORA 2.0 tables as static data keyed by the core enums.
//! Evaluation logic lives in `sora-engine`; nothing here branches on user input
//! beyond a table lookup.

pub mod arc;
pub mod grc;
pub mod mitigation;
pub mod oso;
pub mod sail;

pub use arc::{AirspaceContext, AltitudeBand};
pub use oso::{OsoDefinition, OsoLevel, OSO_CATALOGUE};

/// Identifies the table set recorded in every assessment
pub const TABLES_EDITION: &str = "JARUS SORA 2.0";
