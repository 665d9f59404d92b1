//! OSO Requirement Resolver
//!
//! Requirements are rebuilt from the catalogue on every SAIL change and the
//! user's evidence is merged back by objective id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sora_core::{Compliance, OsoEntry, Sail};
use sora_tables::OSO_CATALOGUE;
use tracing::warn;

/// One entry per catalogue objective, required robustness set for `sail`
pub fn resolve_oso_requirements(sail: Sail) -> Vec<OsoEntry> {
    OSO_CATALOGUE
        .iter()
        .map(|def| {
            let (required_robustness, optional) = def.level_at(sail).resolve();
            OsoEntry {
                oso_id: def.id,
                title: def.title.to_string(),
                category: def.category,
                required_robustness,
                optional,
                user_evidence: String::new(),
                attachments: Vec::new(),
                user_declared_robustness: None,
                definition_changed: false,
            }
        })
        .collect()
}

/// Reattach evidence from `prior` to freshly resolved `entries`.
///
/// Requirements always come from `entries`. Prior entries for objectives no
/// longer in the catalogue are dropped with a warning. When `prior` repeats an
/// objective the later entry wins and the earlier one is logged.
pub fn merge_user_evidence(entries: Vec<OsoEntry>, prior: &[OsoEntry]) -> Vec<OsoEntry> {
    let mut by_id: HashMap<u8, &OsoEntry> = HashMap::with_capacity(prior.len());
    for p in prior {
        if let Some(replaced) = by_id.insert(p.oso_id, p) {
            warn!(
                oso_id = p.oso_id,
                dropped_had_evidence = replaced.has_evidence(),
                "objective repeated in prior evidence, keeping the later entry"
            );
        }
    }

    let merged: Vec<OsoEntry> = entries
        .into_iter()
        .map(|mut entry| {
            if let Some(previous) = by_id.remove(&entry.oso_id) {
                entry.user_evidence = previous.user_evidence.clone();
                entry.attachments = previous.attachments.clone();
                entry.user_declared_robustness = previous.user_declared_robustness;
                entry.definition_changed = previous.title != entry.title;
            }
            entry
        })
        .collect();

    for orphan in by_id.values() {
        warn!(
            oso_id = orphan.oso_id,
            had_evidence = orphan.has_evidence(),
            "objective no longer in the catalogue, prior entry dropped"
        );
    }

    merged
}

/// Compliance counts for display and export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsoSummary {
    pub total: usize,
    pub optional: usize,
    pub pending: usize,
    pub compliant: usize,
    pub insufficient: usize,
    pub definitions_changed: usize,
}

impl OsoSummary {
    pub fn from_entries(entries: &[OsoEntry]) -> Self {
        let mut summary = Self {
            total: entries.len(),
            ..Default::default()
        };
        for entry in entries {
            match entry.compliance() {
                Compliance::Optional => summary.optional += 1,
                Compliance::Pending => summary.pending += 1,
                Compliance::Compliant => summary.compliant += 1,
                Compliance::Insufficient => summary.insufficient += 1,
            }
            if entry.definition_changed {
                summary.definitions_changed += 1;
            }
        }
        summary
    }

    /// Every mandatory objective declared at or above its requirement
    pub fn is_complete(&self) -> bool {
        self.pending == 0 && self.insufficient == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sora_core::Robustness;

    #[test]
    fn test_resolution_is_complete() {
        for sail in Sail::ALL {
            let entries = resolve_oso_requirements(sail);
            assert_eq!(entries.len(), 24);
        }
    }

    #[test]
    fn test_sail_six_is_all_high() {
        let entries = resolve_oso_requirements(Sail::VI);
        assert!(entries.iter().all(|e| e.required_robustness == Robustness::High && !e.optional));
    }

    #[test]
    fn test_merge_keeps_evidence_and_recomputes_requirement() {
        let mut prior = resolve_oso_requirements(Sail::I);
        prior[2].user_evidence = "Maintenance manual rev. 4".to_string();
        prior[2].user_declared_robustness = Some(Robustness::Low);

        let merged = merge_user_evidence(resolve_oso_requirements(Sail::IV), &prior);
        let oso3 = &merged[2];
        assert_eq!(oso3.oso_id, 3);
        assert_eq!(oso3.user_evidence, "Maintenance manual rev. 4");
        assert_eq!(oso3.required_robustness, Robustness::Medium);
        assert_eq!(oso3.compliance(), Compliance::Insufficient);
        assert!(!oso3.definition_changed);
    }

    #[test]
    fn test_repeated_prior_objective_keeps_later_entry() {
        let mut prior = resolve_oso_requirements(Sail::II);
        prior[0].user_evidence = "Draft manual".to_string();
        let mut repeat = prior[0].clone();
        repeat.user_evidence = "Operations manual v2".to_string();
        repeat.user_declared_robustness = Some(Robustness::Medium);
        prior.push(repeat);

        let merged = merge_user_evidence(resolve_oso_requirements(Sail::II), &prior);
        assert_eq!(merged.len(), 24);
        assert_eq!(merged.iter().filter(|e| e.oso_id == 1).count(), 1);
        assert_eq!(merged[0].user_evidence, "Operations manual v2");
        assert_eq!(merged[0].user_declared_robustness, Some(Robustness::Medium));
    }

    #[test]
    fn test_changed_title_is_flagged() {
        let mut prior = resolve_oso_requirements(Sail::II);
        prior[0].title = "Operator competent".to_string();
        prior[0].user_evidence = "Operations manual".to_string();

        let merged = merge_user_evidence(resolve_oso_requirements(Sail::II), &prior);
        assert!(merged[0].definition_changed);
        assert_eq!(merged[0].user_evidence, "Operations manual");
    }

    #[test]
    fn test_unknown_prior_ids_are_dropped() {
        let mut prior = resolve_oso_requirements(Sail::I);
        prior[0].oso_id = 99;
        let merged = merge_user_evidence(resolve_oso_requirements(Sail::I), &prior);
        assert_eq!(merged.len(), 24);
        assert!(merged.iter().all(|e| e.oso_id != 99));
    }

    #[test]
    fn test_summary_counts() {
        let mut entries = resolve_oso_requirements(Sail::I);
        entries[0].user_declared_robustness = Some(Robustness::Low);
        let summary = OsoSummary::from_entries(&entries);
        assert_eq!(summary.total, 24);
        assert_eq!(summary.compliant, 1);
        // OSO 2, 4, 5, 6, 18, 19, 20, 24 are optional at SAIL I
        assert_eq!(summary.optional, 8);
        assert_eq!(summary.pending, 15);
        assert!(!summary.is_complete());
    }
}
