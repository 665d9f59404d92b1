//! Prometheus counters for the service, exposed on `/metrics`.
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    assessments: IntCounterVec,
    studies: IntCounterVec,
    dossiers: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let assessments = IntCounterVec::new(
            Opts::new("sora_assessments_total", "Assessments by outcome"),
            &["outcome"],
        )?;
        let studies = IntCounterVec::new(
            Opts::new("sora_study_operations_total", "Study store operations"),
            &["operation", "outcome"],
        )?;
        let dossiers = IntCounterVec::new(
            Opts::new("sora_dossiers_total", "Dossier exports by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(assessments.clone()))?;
        registry.register(Box::new(studies.clone()))?;
        registry.register(Box::new(dossiers.clone()))?;

        Ok(Self {
            registry,
            assessments,
            studies,
            dossiers,
        })
    }

    /// `outcome` is "ok" or an error code such as "VALIDATION"
    pub fn record_assessment(&self, outcome: &str) {
        self.assessments.with_label_values(&[outcome]).inc();
    }

    pub fn record_study(&self, operation: &str, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        self.studies.with_label_values(&[operation, outcome]).inc();
    }

    pub fn record_dossier(&self, ok: bool) {
        self.dossiers.with_label_values(&[if ok { "ok" } else { "error" }]).inc();
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

pub fn encode(registry: &Registry) -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_encoded() {
        let metrics = Metrics::new().unwrap();
        metrics.record_assessment("ok");
        metrics.record_assessment("SCOPE");
        metrics.record_study("create", true);

        let text = encode(metrics.registry()).unwrap();
        assert!(text.contains("sora_assessments_total{outcome=\"ok\"} 1"));
        assert!(text.contains("sora_assessments_total{outcome=\"SCOPE\"} 1"));
        assert!(text.contains("sora_study_operations_total{operation=\"create\",outcome=\"ok\"} 1"));
    }
}
