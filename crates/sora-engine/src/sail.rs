//! SAIL Resolver

use sora_core::{AirRiskClass, Sail, SoraError};
use sora_tables::sail::{sail_for, MAX_SPECIFIC_GRC};
use tracing::error;

pub fn resolve_sail(final_grc: u8, final_arc: AirRiskClass) -> Result<Sail, SoraError> {
    if final_grc > MAX_SPECIFIC_GRC {
        return Err(SoraError::OutOfScope(format!(
            "final GRC {} is above {}: certified category",
            final_grc, MAX_SPECIFIC_GRC
        )));
    }

    sail_for(final_grc, final_arc).ok_or_else(|| {
        error!(final_grc, %final_arc, "SAIL matrix has no cell");
        SoraError::Configuration(format!("no SAIL for GRC {} and {}", final_grc, final_arc))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(resolve_sail(1, AirRiskClass::A).unwrap(), Sail::I);
        assert_eq!(resolve_sail(5, AirRiskClass::C).unwrap(), Sail::IV);
        assert_eq!(resolve_sail(7, AirRiskClass::A).unwrap(), Sail::VI);
    }

    #[test]
    fn test_zero_is_configuration_error() {
        assert_eq!(resolve_sail(0, AirRiskClass::B).unwrap_err().code(), "CONFIG");
    }

    #[test]
    fn test_above_seven_is_out_of_scope() {
        assert_eq!(resolve_sail(8, AirRiskClass::A).unwrap_err().code(), "SCOPE");
    }
}
