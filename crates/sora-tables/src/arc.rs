//! Air risk tables: altitude bands, initial ARC, strategic and tactical rules

use serde::Serialize;
use sora_core::{
    AirRiskClass, AirspaceClass, AirspaceEnvironment, Robustness, StrategicCategory,
    TacticalCapability,
};
use std::fmt;

/// 500 ft AGL
pub const VLL_CEILING_M: f64 = 152.4;

/// Flight level 600
pub const FL600_M: f64 = 18_288.0;

/// Altitude band used as a column of the initial ARC table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AltitudeBand {
    /// Below 500 ft AGL
    VeryLowLevel,
    /// Above 500 ft AGL, below FL600
    Intermediate,
    AboveFl600,
}

impl AltitudeBand {
    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for AltitudeBand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AltitudeBand::VeryLowLevel => write!(f, "below 500 ft AGL"),
            AltitudeBand::Intermediate => write!(f, "above 500 ft AGL, below FL600"),
            AltitudeBand::AboveFl600 => write!(f, "above FL600"),
        }
    }
}

/// Bands a height belongs to. A height exactly on a boundary belongs to both.
pub fn candidate_bands(height_m: f64) -> Vec<AltitudeBand> {
    let mut bands = Vec::with_capacity(2);
    if height_m <= VLL_CEILING_M {
        bands.push(AltitudeBand::VeryLowLevel);
    }
    if (VLL_CEILING_M..=FL600_M).contains(&height_m) {
        bands.push(AltitudeBand::Intermediate);
    }
    if height_m >= FL600_M {
        bands.push(AltitudeBand::AboveFl600);
    }
    bands
}

/// Row of the initial ARC table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AirspaceContext {
    AtypicalOrSegregated,
    /// Airport or heliport environment in class A to D
    AirportControlled,
    /// Airport or heliport environment in class E to G
    AirportUncontrolled,
    ModeSVeilOrTmz,
    Controlled,
    UncontrolledUrban,
    UncontrolledRural,
}

impl AirspaceContext {
    /// Classify an environment, most restrictive condition first
    pub fn classify(env: &AirspaceEnvironment, class: AirspaceClass) -> Self {
        if env.atypical_or_segregated {
            AirspaceContext::AtypicalOrSegregated
        } else if env.airport_environment {
            // Class E counts with F and G around aerodromes
            match class {
                AirspaceClass::A | AirspaceClass::B | AirspaceClass::C | AirspaceClass::D => {
                    AirspaceContext::AirportControlled
                }
                _ => AirspaceContext::AirportUncontrolled,
            }
        } else if env.mode_s_veil_or_tmz {
            AirspaceContext::ModeSVeilOrTmz
        } else if class.is_controlled() {
            AirspaceContext::Controlled
        } else if env.urban {
            AirspaceContext::UncontrolledUrban
        } else {
            AirspaceContext::UncontrolledRural
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for AirspaceContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            AirspaceContext::AtypicalOrSegregated => "atypical or segregated airspace",
            AirspaceContext::AirportControlled => "airport environment, class A-D",
            AirspaceContext::AirportUncontrolled => "airport environment, class E-G",
            AirspaceContext::ModeSVeilOrTmz => "Mode-S veil or TMZ",
            AirspaceContext::Controlled => "controlled airspace",
            AirspaceContext::UncontrolledUrban => "uncontrolled airspace over urban area",
            AirspaceContext::UncontrolledRural => "uncontrolled airspace over rural area",
        };
        write!(f, "{}", label)
    }
}

use AirRiskClass::{A, B, C, D};

const INITIAL_ARC: [[AirRiskClass; 3]; 7] = [
    // VLL  Interm. >FL600
    [A, A, A], // atypical / segregated
    [D, D, B], // airport, A-D
    [C, C, B], // airport, E-G
    [C, D, B], // Mode-S veil / TMZ
    [C, D, B], // controlled
    [C, C, B], // uncontrolled, urban
    [B, C, B], // uncontrolled, rural
];

pub fn initial_arc(context: AirspaceContext, band: AltitudeBand) -> AirRiskClass {
    INITIAL_ARC[context.index()][band.index()]
}

/// Classes one strategic category removes
pub const STRATEGIC_CREDIT_PER_CATEGORY: u8 = 1;

/// Lowest class a strategic category may reach
pub fn strategic_floor(category: StrategicCategory) -> AirRiskClass {
    match category {
        StrategicCategory::OperationalRestrictions => AirRiskClass::A,
        StrategicCategory::CommonStructuresAndRules => AirRiskClass::B,
    }
}

/// Tactical mitigation performance requirement for a residual ARC
pub fn tmpr(residual: AirRiskClass) -> Option<Robustness> {
    match residual {
        AirRiskClass::D => Some(Robustness::High),
        AirRiskClass::C => Some(Robustness::Medium),
        AirRiskClass::B => Some(Robustness::Low),
        AirRiskClass::A => None,
    }
}

/// Whether a capability can carry a tactical credit on its own
pub fn is_detect_and_avoid(capability: TacticalCapability) -> bool {
    !matches!(capability, TacticalCapability::ElectronicConspicuity)
}

pub const TACTICAL_SINGLE_CREDIT: u8 = 1;
pub const TACTICAL_COMBINATION_CREDIT: u8 = 2;

/// Detect-and-avoid system level required for the combination credit
pub const COMBINATION_DAA_LEVEL: Robustness = Robustness::High;

/// Minimum electronic conspicuity level for the combination credit
pub const COMBINATION_CONSPICUITY_LEVEL: Robustness = Robustness::Medium;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_heights_have_two_bands() {
        assert_eq!(candidate_bands(120.0), vec![AltitudeBand::VeryLowLevel]);
        assert_eq!(
            candidate_bands(VLL_CEILING_M),
            vec![AltitudeBand::VeryLowLevel, AltitudeBand::Intermediate]
        );
        assert_eq!(candidate_bands(300.0), vec![AltitudeBand::Intermediate]);
        assert_eq!(
            candidate_bands(FL600_M),
            vec![AltitudeBand::Intermediate, AltitudeBand::AboveFl600]
        );
    }

    #[test]
    fn test_classify_precedence() {
        let env = AirspaceEnvironment::new(AirspaceClass::C).airport().atypical();
        assert_eq!(AirspaceContext::classify(&env, AirspaceClass::C), AirspaceContext::AtypicalOrSegregated);

        let env = AirspaceEnvironment::new(AirspaceClass::E).airport();
        assert_eq!(AirspaceContext::classify(&env, AirspaceClass::E), AirspaceContext::AirportUncontrolled);

        let env = AirspaceEnvironment::new(AirspaceClass::G).urban();
        assert_eq!(AirspaceContext::classify(&env, AirspaceClass::G), AirspaceContext::UncontrolledUrban);
    }

    #[test]
    fn test_initial_arc_cells() {
        assert_eq!(initial_arc(AirspaceContext::UncontrolledRural, AltitudeBand::VeryLowLevel), AirRiskClass::B);
        assert_eq!(initial_arc(AirspaceContext::Controlled, AltitudeBand::Intermediate), AirRiskClass::D);
        assert_eq!(initial_arc(AirspaceContext::AirportUncontrolled, AltitudeBand::VeryLowLevel), AirRiskClass::C);
        assert_eq!(initial_arc(AirspaceContext::UncontrolledUrban, AltitudeBand::AboveFl600), AirRiskClass::B);
    }

    #[test]
    fn test_tmpr() {
        assert_eq!(tmpr(AirRiskClass::D), Some(Robustness::High));
        assert_eq!(tmpr(AirRiskClass::A), None);
        assert!(!is_detect_and_avoid(TacticalCapability::ElectronicConspicuity));
    }
}
