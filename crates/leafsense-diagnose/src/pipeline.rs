//! Pipeline orchestration: one leaf photo in, one structured diagnosis out.
//!
//! [`Diagnoser`] sequences normalize → infer → decode → suppress → catalog
//! lookup → severity → growth stage → advice.  Every collaborator is an
//! injected dependency; there is no process-global state, so independent
//! requests can run concurrently on separate `Diagnoser` instances.  Each
//! stage gets exactly one attempt: the first failure short-circuits with a
//! tagged error, except advice generation, which falls back to canned text.

use crate::advice::{self, AdviceRequest, TreatmentAdvisor};
use crate::catalog::{self, DiseaseStatus};
use crate::growth::{self, GrowthStage};
use crate::severity::{self, Severity};
use image::RgbImage;
use leafsense_detect::{decode, nms, DetectError, Detector};
use leafsense_preprocess::{Letterbox, PreprocessError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagnoseError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error("suppression removed every candidate detection")]
    NoValidDetection,
    #[error("model produced class id {0} outside the disease catalog")]
    UnknownClass(usize),
}

/// Pipeline thresholds.  Defaults mirror what the model shipped with.
#[derive(Debug, Clone, Copy)]
pub struct DiagnoseConfig {
    pub input_size: u32,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
}

impl Default for DiagnoseConfig {
    fn default() -> Self {
        Self {
            input_size: leafsense_preprocess::DEFAULT_INPUT_SIZE,
            confidence_threshold: leafsense_detect::DEFAULT_CONF_THRESHOLD,
            iou_threshold: leafsense_detect::DEFAULT_IOU_THRESHOLD,
        }
    }
}

/// Final per-image diagnosis.  Built once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub crop_type: String,
    pub disease_name: String,
    pub disease_status: DiseaseStatus,
    pub confidence: f32,
    pub bbox: [f32; 4],
    pub severity: Severity,
    pub growth_stage: GrowthStage,
    pub quick_summary: String,
    pub treatment_plan: String,
}

/// The orchestrator.  Owns its detector and advisor for the lifetime of the
/// process; construct once at startup, drop at shutdown.
pub struct Diagnoser<D, A> {
    detector: D,
    advisor: A,
    letterbox: Letterbox,
    config: DiagnoseConfig,
}

impl<D: Detector, A: TreatmentAdvisor> Diagnoser<D, A> {
    pub fn new(detector: D, advisor: A) -> Self {
        Self::with_config(detector, advisor, DiagnoseConfig::default())
    }

    pub fn with_config(detector: D, advisor: A, config: DiagnoseConfig) -> Self {
        let letterbox = Letterbox::new(config.input_size, leafsense_preprocess::DEFAULT_FILL);
        Self {
            detector,
            advisor,
            letterbox,
            config,
        }
    }

    /// Run the full pipeline on one image.
    pub fn diagnose(&mut self, img: &RgbImage) -> Result<Diagnosis, DiagnoseError> {
        let (w, h) = img.dimensions();

        let (tensor, _meta) = self.letterbox.run(img)?;
        let preds = self.detector.infer(&tensor)?;
        let candidates = decode(
            preds.view(),
            w,
            h,
            self.config.input_size,
            self.config.confidence_threshold,
        )?;

        let kept = nms(&candidates, self.config.iou_threshold);
        let best = kept
            .into_iter()
            .next()
            .ok_or(DiagnoseError::NoValidDetection)?;

        let info = catalog::lookup(best.class_id).ok_or_else(|| {
            // a class outside the catalog means model and catalog disagree;
            // that is a deployment problem, not a bad photo
            log::error!(
                "class id {} not in catalog (model/catalog mismatch?)",
                best.class_id
            );
            DiagnoseError::UnknownClass(best.class_id)
        })?;
        log::debug!(
            "best candidate: {} (score {:.3})",
            catalog::class_name(best.class_id).unwrap_or("?"),
            best.score
        );

        let bbox = best.bbox;
        let area_ratio = ((bbox[2] - bbox[0]) * (bbox[3] - bbox[1])) / (w as f32 * h as f32);

        let severity = severity::estimate(img, bbox, info.status);
        let growth_stage = growth::estimate(area_ratio);
        let confidence = (best.score * 1000.0).round() / 1000.0;

        let req = AdviceRequest {
            crop: info.crop.to_string(),
            disease: info.disease.to_string(),
            status: info.status,
            severity,
            confidence,
            growth_stage,
        };
        let treatment_plan = self.advisor.treatment_plan(&req).unwrap_or_else(|e| {
            log::warn!("treatment plan generation failed, using fallback: {e}");
            advice::fallback_plan(&req)
        });
        let quick_summary = self.advisor.quick_summary(&req).unwrap_or_else(|e| {
            log::warn!("quick summary generation failed, using fallback: {e}");
            advice::fallback_summary(&req)
        });

        Ok(Diagnosis {
            crop_type: info.crop.to_string(),
            disease_name: info.disease.to_string(),
            disease_status: info.status,
            confidence,
            bbox,
            severity,
            growth_stage,
            quick_summary,
            treatment_plan,
        })
    }
}
