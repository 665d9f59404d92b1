//! Operational Safety Objectives catalogue
//!
//! 24 objectives, each with the published robustness for SAIL I..VI.
//! An optional cell is recorded at Low with the `optional` flag set.

use serde::Serialize;
use sora_core::{OsoCategory, Robustness, Sail};

/// Published level in one SAIL column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsoLevel {
    Optional,
    Low,
    Medium,
    High,
}

impl OsoLevel {
    /// Robustness to record and whether the objective is optional
    pub fn resolve(self) -> (Robustness, bool) {
        match self {
            OsoLevel::Optional => (Robustness::Low, true),
            OsoLevel::Low => (Robustness::Low, false),
            OsoLevel::Medium => (Robustness::Medium, false),
            OsoLevel::High => (Robustness::High, false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OsoDefinition {
    pub id: u8,
    pub title: &'static str,
    pub category: OsoCategory,
    pub levels: [OsoLevel; 6],
}

impl OsoDefinition {
    pub fn level_at(&self, sail: Sail) -> OsoLevel {
        self.levels[sail.index()]
    }
}

use OsoCategory::{
    AdverseOperatingConditions as Adverse, ExternalSystemsDeterioration as External,
    HumanError as Human, TechnicalIssue as Technical,
};
use OsoLevel::{High as H, Low as L, Medium as M, Optional as O};

const fn oso(id: u8, title: &'static str, category: OsoCategory, levels: [OsoLevel; 6]) -> OsoDefinition {
    OsoDefinition { id, title, category, levels }
}

pub const OSO_CATALOGUE: [OsoDefinition; 24] = [
    oso(1, "Ensure the operator is competent and/or proven", Technical, [O, L, M, H, H, H]),
    oso(2, "UAS manufactured by competent and/or proven entity", Technical, [O, O, L, M, H, H]),
    oso(3, "UAS maintained by competent and/or proven entity", Technical, [L, L, M, M, H, H]),
    oso(4, "UAS developed to authority recognized design standards", Technical, [O, O, O, L, M, H]),
    oso(5, "UAS is designed considering system safety and reliability", Technical, [O, O, L, M, H, H]),
    oso(6, "C3 link performance is appropriate for the operation", Technical, [O, L, L, M, H, H]),
    oso(7, "Inspection of the UAS (product inspection) to ensure consistency with the ConOps", Technical, [L, L, M, M, H, H]),
    oso(8, "Operational procedures are defined, validated and adhered to (technical issue)", Technical, [L, M, H, H, H, H]),
    oso(9, "Remote crew trained and current and able to control the abnormal situation (technical issue)", Technical, [L, L, M, M, H, H]),
    oso(10, "Safe recovery from technical issue", Technical, [L, L, M, M, H, H]),
    oso(11, "Procedures are in-place to handle the deterioration of external systems supporting UAS operation", External, [L, M, H, H, H, H]),
    oso(12, "The UAS is designed to manage the deterioration of external systems supporting UAS operation", External, [L, L, M, M, H, H]),
    oso(13, "External services supporting UAS operations are adequate to the operation", External, [L, L, M, H, H, H]),
    oso(14, "Operational procedures are defined, validated and adhered to (human error)", Human, [L, M, H, H, H, H]),
    oso(15, "Remote crew trained and current and able to control the abnormal situation (human error)", Human, [L, L, M, M, H, H]),
    oso(16, "Multi crew coordination", Human, [L, L, M, M, H, H]),
    oso(17, "Remote crew is fit to operate", Human, [L, L, M, M, H, H]),
    oso(18, "Automatic protection of the flight envelope from human errors", Human, [O, O, L, M, H, H]),
    oso(19, "Safe recovery from human error", Human, [O, O, L, M, M, H]),
    oso(20, "A human factors evaluation has been performed and the HMI found appropriate for the mission", Human, [O, L, L, M, M, H]),
    oso(21, "Operational procedures are defined, validated and adhered to (adverse operating conditions)", Adverse, [L, M, H, H, H, H]),
    oso(22, "The remote crew is trained to identify critical environmental conditions and to avoid them", Adverse, [L, L, M, M, M, H]),
    oso(23, "Environmental conditions for safe operations defined, measurable and adhered to", Adverse, [L, L, M, M, H, H]),
    oso(24, "UAS designed and qualified for adverse environmental conditions", Adverse, [O, O, M, H, H, H]),
];

pub fn find(id: u8) -> Option<&'static OsoDefinition> {
    OSO_CATALOGUE.iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_ids_are_contiguous() {
        for (i, def) in OSO_CATALOGUE.iter().enumerate() {
            assert_eq!(def.id as usize, i + 1);
        }
    }

    #[test]
    fn test_levels_never_decrease_with_sail() {
        for def in OSO_CATALOGUE.iter() {
            let resolved: Vec<Robustness> = def.levels.iter().map(|l| l.resolve().0).collect();
            assert!(resolved.windows(2).all(|w| w[0] <= w[1]), "OSO#{:02}", def.id);
        }
    }

    #[test]
    fn test_sail_one_is_all_low() {
        for def in OSO_CATALOGUE.iter() {
            assert_eq!(def.level_at(Sail::I).resolve().0, Robustness::Low);
        }
    }

    #[test]
    fn test_lookup_and_optional() {
        let oso4 = find(4).unwrap();
        assert_eq!(oso4.level_at(Sail::III), OsoLevel::Optional);
        assert_eq!(oso4.level_at(Sail::III).resolve(), (Robustness::Low, true));
        assert_eq!(find(24).unwrap().category, OsoCategory::AdverseOperatingConditions);
        assert!(find(25).is_none());
    }
}
