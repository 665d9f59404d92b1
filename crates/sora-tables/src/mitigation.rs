//! Ground mitigation credit table
//!
//! Correction to the intrinsic GRC per mitigation and robustness level.
//! Positive credits lower the GRC; M3 at Low is a published penalty (+1).

use sora_core::{GroundMitigation, Robustness};
use serde::Serialize;

/// One published credit cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroundCredit {
    pub mitigation: GroundMitigation,
    pub robustness: Robustness,
    /// GRC classes removed, negative when the cell adds risk
    pub credit: i8,
}

const fn cell(mitigation: GroundMitigation, robustness: Robustness, credit: i8) -> GroundCredit {
    GroundCredit { mitigation, robustness, credit }
}

pub const GROUND_CREDITS: [GroundCredit; 9] = [
    cell(GroundMitigation::StrategicReduction, Robustness::Low, 1),
    cell(GroundMitigation::StrategicReduction, Robustness::Medium, 2),
    cell(GroundMitigation::StrategicReduction, Robustness::High, 4),
    cell(GroundMitigation::ImpactReduction, Robustness::Low, 0),
    cell(GroundMitigation::ImpactReduction, Robustness::Medium, 1),
    cell(GroundMitigation::ImpactReduction, Robustness::High, 2),
    cell(GroundMitigation::EmergencyResponsePlan, Robustness::Low, -1),
    cell(GroundMitigation::EmergencyResponsePlan, Robustness::Medium, 0),
    cell(GroundMitigation::EmergencyResponsePlan, Robustness::High, 1),
];

/// Credit for a claim, `None` when the tables do not cover the combination
pub fn ground_credit(mitigation: GroundMitigation, robustness: Robustness) -> Option<i8> {
    GROUND_CREDITS
        .iter()
        .find(|c| c.mitigation == mitigation && c.robustness == robustness)
        .map(|c| c.credit)
}

/// Robustness levels the tables publish for a mitigation
pub fn covered_levels(mitigation: GroundMitigation) -> Vec<Robustness> {
    GROUND_CREDITS
        .iter()
        .filter(|c| c.mitigation == mitigation)
        .map(|c| c.robustness)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_credits() {
        assert_eq!(ground_credit(GroundMitigation::StrategicReduction, Robustness::Low), Some(1));
        assert_eq!(ground_credit(GroundMitigation::StrategicReduction, Robustness::Medium), Some(2));
        assert_eq!(ground_credit(GroundMitigation::StrategicReduction, Robustness::High), Some(4));
        assert_eq!(ground_credit(GroundMitigation::ImpactReduction, Robustness::Low), Some(0));
        assert_eq!(ground_credit(GroundMitigation::ImpactReduction, Robustness::High), Some(2));
    }

    #[test]
    fn test_emergency_plan_at_low_is_a_penalty() {
        assert_eq!(ground_credit(GroundMitigation::EmergencyResponsePlan, Robustness::Low), Some(-1));
        assert_eq!(ground_credit(GroundMitigation::EmergencyResponsePlan, Robustness::Medium), Some(0));
        assert_eq!(ground_credit(GroundMitigation::EmergencyResponsePlan, Robustness::High), Some(1));
    }

    #[test]
    fn test_every_level_is_published() {
        for m in GroundMitigation::ALL {
            assert_eq!(
                covered_levels(m),
                vec![Robustness::Low, Robustness::Medium, Robustness::High]
            );
        }
    }

    #[test]
    fn test_credit_grows_with_robustness() {
        for m in GroundMitigation::ALL {
            let credits: Vec<i8> = covered_levels(m)
                .into_iter()
                .filter_map(|r| ground_credit(m, r))
                .collect();
            assert!(credits.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
