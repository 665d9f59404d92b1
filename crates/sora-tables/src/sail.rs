//! SAIL matrix: final GRC x final ARC

use sora_core::{AirRiskClass, Sail};

/// Highest final GRC the specific category covers
pub const MAX_SPECIFIC_GRC: u8 = 7;

use Sail::{I, II, III, IV, V, VI};

const SAIL_MATRIX: [[Sail; 4]; 7] = [
    //  a    b    c   d
    [I, II, IV, VI],    // GRC 1
    [I, II, IV, VI],    // GRC 2
    [II, II, IV, VI],   // GRC 3
    [III, III, IV, VI], // GRC 4
    [IV, IV, IV, VI],   // GRC 5
    [V, V, V, VI],      // GRC 6
    [VI, VI, VI, VI],   // GRC 7
];

/// SAIL cell, `None` outside GRC 1..=7
pub fn sail_for(final_grc: u8, arc: AirRiskClass) -> Option<Sail> {
    if !(1..=MAX_SPECIFIC_GRC).contains(&final_grc) {
        return None;
    }
    Some(SAIL_MATRIX[(final_grc - 1) as usize][arc.index()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells() {
        assert_eq!(sail_for(1, AirRiskClass::A), Some(Sail::I));
        assert_eq!(sail_for(3, AirRiskClass::B), Some(Sail::II));
        assert_eq!(sail_for(4, AirRiskClass::C), Some(Sail::IV));
        assert_eq!(sail_for(6, AirRiskClass::A), Some(Sail::V));
        assert_eq!(sail_for(2, AirRiskClass::D), Some(Sail::VI));
    }

    #[test]
    fn test_out_of_matrix() {
        assert_eq!(sail_for(0, AirRiskClass::A), None);
        assert_eq!(sail_for(8, AirRiskClass::A), None);
    }

    #[test]
    fn test_monotone_in_both_axes() {
        for grc in 1..=MAX_SPECIFIC_GRC {
            for arc in AirRiskClass::ALL {
                let here = sail_for(grc, arc).unwrap();
                if grc < MAX_SPECIFIC_GRC {
                    assert!(sail_for(grc + 1, arc).unwrap() >= here);
                }
                if arc != AirRiskClass::D {
                    assert!(sail_for(grc, AirRiskClass::ALL[arc.index() + 1]).unwrap() >= here);
                }
            }
        }
    }
}
