//! Treatment-advice collaborator interface.
//!
//! The prose treatment plan comes from a hosted text-generation service.
//! This module owns only the contract: the structured request built from the
//! pipeline's output fields, the trait the collaborator implements, and the
//! canned fallback text used when the collaborator is unreachable.  The
//! response bodies are opaque strings, passed through verbatim.

use crate::catalog::DiseaseStatus;
use crate::growth::GrowthStage;
use crate::severity::Severity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("advice backend unavailable: {0}")]
    Unavailable(String),
}

/// Everything the advice collaborator needs about one diagnosis.
#[derive(Debug, Clone)]
pub struct AdviceRequest {
    pub crop: String,
    pub disease: String,
    pub status: DiseaseStatus,
    pub severity: Severity,
    pub confidence: f32,
    pub growth_stage: GrowthStage,
}

/// External text-generation collaborator.
///
/// Both methods may block on network latency; callers should wrap them in
/// whatever timeout policy they need.  The pipeline never retries: a failure
/// here means fallback text, not a failed diagnosis.
pub trait TreatmentAdvisor {
    fn treatment_plan(&self, req: &AdviceRequest) -> Result<String, AdviceError>;
    fn quick_summary(&self, req: &AdviceRequest) -> Result<String, AdviceError>;
}

/// Build the structured prompt sent for a full treatment plan.
pub fn treatment_prompt(req: &AdviceRequest) -> String {
    match req.status {
        DiseaseStatus::Healthy => format!(
            "You are an experienced agricultural expert. A farmer's {} plant is \
             HEALTHY with {}% confidence. Growth stage: {}. Provide a short \
             structured maintenance plan: current status, three maintenance \
             tips, three prevention tips, and a monitoring schedule. Keep it \
             simple and encouraging. Max 200 words.",
            req.crop,
            (req.confidence * 100.0) as u32,
            req.growth_stage.stage,
        ),
        DiseaseStatus::Diseased => format!(
            "You are an expert agricultural advisor. Provide a complete \
             treatment plan for a farmer.\n\
             Crop: {}\n\
             Disease: {}\n\
             Severity: {:?}\n\
             Affected Area: {}%\n\
             Confidence: {}%\n\
             Growth Stage: {}\n\
             Cover: diagnosis in simple terms, urgency level, chemical \
             treatment with product and dosage, an organic alternative, a \
             day-by-day action plan, prevention tips, and when to apply. \
             Be specific with product names and quantities. Max 350 words.",
            req.crop,
            req.disease,
            req.severity.level,
            req.severity.percentage,
            (req.confidence * 100.0) as u32,
            req.growth_stage.stage,
        ),
    }
}

/// Build the one-sentence summary prompt.
pub fn summary_prompt(req: &AdviceRequest) -> String {
    match req.status {
        DiseaseStatus::Healthy => format!(
            "In ONE sentence, congratulate a farmer whose {} is healthy. Be warm.",
            req.crop
        ),
        DiseaseStatus::Diseased => format!(
            "In ONE urgent sentence, alert a farmer about {} on {} ({:?} severity). \
             Be actionable.",
            req.disease, req.crop, req.severity.level
        ),
    }
}

/// Canned plan used when the collaborator fails.  Advice-generation failure
/// must never block delivery of the quantitative diagnosis.
pub fn fallback_plan(req: &AdviceRequest) -> String {
    match req.status {
        DiseaseStatus::Healthy => {
            "Your crop is healthy! Continue good care practices and monitor weekly.".to_string()
        }
        DiseaseStatus::Diseased => format!(
            "{} detected. Please consult a local agricultural expert for a treatment plan.",
            req.disease
        ),
    }
}

/// Canned one-liner used when the collaborator fails.
pub fn fallback_summary(req: &AdviceRequest) -> String {
    match req.status {
        DiseaseStatus::Healthy => format!("Your {} is healthy!", req.crop),
        DiseaseStatus::Diseased => format!("{} detected - action needed", req.disease),
    }
}

/// Advisor that always answers with the canned text.  Useful offline and as
/// the safety net the pipeline falls back to.
#[derive(Debug, Default, Clone)]
pub struct CannedAdvisor;

impl TreatmentAdvisor for CannedAdvisor {
    fn treatment_plan(&self, req: &AdviceRequest) -> Result<String, AdviceError> {
        Ok(fallback_plan(req))
    }

    fn quick_summary(&self, req: &AdviceRequest) -> Result<String, AdviceError> {
        Ok(fallback_summary(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::SeverityLevel;

    fn diseased_req() -> AdviceRequest {
        AdviceRequest {
            crop: "Tomato".into(),
            disease: "Early Blight".into(),
            status: DiseaseStatus::Diseased,
            severity: Severity {
                level: SeverityLevel::Moderate,
                score: 2,
                percentage: 23.5,
            },
            confidence: 0.87,
            growth_stage: crate::growth::estimate(0.3),
        }
    }

    #[test]
    fn diseased_prompt_carries_all_fields() {
        let p = treatment_prompt(&diseased_req());
        for needle in ["Tomato", "Early Blight", "Moderate", "23.5%", "87%", "Vegetative"] {
            assert!(p.contains(needle), "missing {needle} in prompt");
        }
    }

    #[test]
    fn healthy_prompt_is_a_maintenance_plan() {
        let mut req = diseased_req();
        req.status = DiseaseStatus::Healthy;
        let p = treatment_prompt(&req);
        assert!(p.contains("HEALTHY"));
        assert!(p.contains("maintenance"));
    }

    #[test]
    fn fallbacks_are_keyed_by_status() {
        let req = diseased_req();
        assert!(fallback_plan(&req).contains("Early Blight"));
        assert!(fallback_summary(&req).contains("action needed"));

        let mut healthy = req.clone();
        healthy.status = DiseaseStatus::Healthy;
        assert!(fallback_plan(&healthy).contains("healthy"));
        assert!(fallback_summary(&healthy).contains("Tomato"));
    }

    #[test]
    fn canned_advisor_never_fails() {
        let req = diseased_req();
        assert!(CannedAdvisor.treatment_plan(&req).is_ok());
        assert!(CannedAdvisor.quick_summary(&req).is_ok());
    }
}
