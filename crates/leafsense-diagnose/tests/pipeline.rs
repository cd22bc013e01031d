//! End-to-end pipeline scenarios with a synthetic in-memory detector.

use image::{Rgb, RgbImage};
use leafsense_detect::{DetectError, Detector};
use leafsense_diagnose::advice::{AdviceError, AdviceRequest, TreatmentAdvisor};
use leafsense_diagnose::{CannedAdvisor, DiagnoseError, Diagnoser, DiseaseStatus, SeverityLevel};
use ndarray::{Array2, Array4};

const CLASSES: usize = 29;
const COLS: usize = 4 + CLASSES;

/// Detector that replays a canned prediction matrix.
struct FakeDetector {
    preds: Array2<f32>,
}

impl Detector for FakeDetector {
    fn infer(&mut self, input: &Array4<f32>) -> Result<Array2<f32>, DetectError> {
        // the orchestrator must hand us the normalized tensor
        assert_eq!(input.shape(), &[1, 3, 640, 640]);
        Ok(self.preds.clone())
    }
}

struct FailingAdvisor;

impl TreatmentAdvisor for FailingAdvisor {
    fn treatment_plan(&self, _req: &AdviceRequest) -> Result<String, AdviceError> {
        Err(AdviceError::Unavailable("connection refused".into()))
    }
    fn quick_summary(&self, _req: &AdviceRequest) -> Result<String, AdviceError> {
        Err(AdviceError::Unavailable("connection refused".into()))
    }
}

fn anchor_row(cx: f32, cy: f32, w: f32, h: f32, class_id: usize, score: f32) -> Vec<f32> {
    let mut row = vec![0.0f32; COLS];
    row[0] = cx;
    row[1] = cy;
    row[2] = w;
    row[3] = h;
    row[4 + class_id] = score;
    row
}

fn preds(rows: Vec<Vec<f32>>) -> Array2<f32> {
    let n = rows.len();
    Array2::from_shape_vec((n, COLS), rows.into_iter().flatten().collect()).unwrap()
}

/// 640x640 leaf photo: lesion-brown square from 160..480, green elsewhere.
fn diseased_photo() -> RgbImage {
    let mut img = RgbImage::from_pixel(640, 640, Rgb([40, 120, 40]));
    for y in 160..480 {
        for x in 160..480 {
            img.put_pixel(x, y, Rgb([150, 100, 20]));
        }
    }
    img
}

#[test]
fn diseased_leaf_end_to_end() {
    // strong Tomato Early Blight box over the lesion, a weaker duplicate the
    // suppressor must remove, and sub-threshold noise
    let preds = preds(vec![
        anchor_row(320.0, 320.0, 320.0, 320.0, 20, 0.90),
        anchor_row(325.0, 325.0, 320.0, 320.0, 20, 0.75),
        anchor_row(100.0, 100.0, 50.0, 50.0, 5, 0.10),
    ]);
    let mut diagnoser = Diagnoser::new(FakeDetector { preds }, CannedAdvisor);

    let diagnosis = diagnoser.diagnose(&diseased_photo()).unwrap();

    assert_eq!(diagnosis.crop_type, "Tomato");
    assert_eq!(diagnosis.disease_name, "Early Blight");
    assert_eq!(diagnosis.disease_status, DiseaseStatus::Diseased);
    assert!(diagnosis.confidence >= 0.20);
    assert_eq!(diagnosis.confidence, 0.9);
    assert_eq!(diagnosis.bbox, [160.0, 160.0, 480.0, 480.0]);

    // the whole box is lesion-colored
    assert_eq!(diagnosis.severity.level, SeverityLevel::High);
    assert_eq!(diagnosis.severity.percentage, 100.0);

    // box covers 1/4 of the image → vegetative
    assert_eq!(diagnosis.growth_stage.code, 2);
}

#[test]
fn diagnosis_serializes_like_the_api_contract() {
    let preds = preds(vec![anchor_row(320.0, 320.0, 320.0, 320.0, 20, 0.90)]);
    let mut diagnoser = Diagnoser::new(FakeDetector { preds }, CannedAdvisor);
    let diagnosis = diagnoser.diagnose(&diseased_photo()).unwrap();

    let json = serde_json::to_value(&diagnosis).unwrap();
    assert_eq!(json["disease_status"], "diseased");
    assert_eq!(json["severity"]["level"], "High");
    assert_eq!(json["severity"]["score"], 3);
    assert_eq!(json["growth_stage"]["stage"], "Vegetative");
    assert!(json["treatment_plan"].as_str().unwrap().len() > 0);
}

#[test]
fn healthy_leaf_skips_severity_analysis() {
    // class 21 is healthy Tomato; image is fully lesion-colored on purpose
    let preds = preds(vec![anchor_row(320.0, 320.0, 500.0, 500.0, 21, 0.80)]);
    let mut diagnoser = Diagnoser::new(FakeDetector { preds }, CannedAdvisor);
    let img = RgbImage::from_pixel(640, 640, Rgb([150, 100, 20]));

    let diagnosis = diagnoser.diagnose(&img).unwrap();
    assert_eq!(diagnosis.disease_status, DiseaseStatus::Healthy);
    assert_eq!(diagnosis.severity.level, SeverityLevel::None);
    assert_eq!(diagnosis.severity.score, 0);
    assert_eq!(diagnosis.severity.percentage, 0.0);
    // 500x500 of 640x640 → ratio ≈ 0.61 → mature
    assert_eq!(diagnosis.growth_stage.code, 3);
}

#[test]
fn blank_image_is_a_structured_no_detection_error() {
    // nothing clears the 0.20 threshold
    let preds = preds(vec![
        anchor_row(320.0, 320.0, 100.0, 100.0, 0, 0.05),
        anchor_row(100.0, 100.0, 40.0, 40.0, 3, 0.19),
    ]);
    let mut diagnoser = Diagnoser::new(FakeDetector { preds }, CannedAdvisor);
    let img = RgbImage::from_pixel(640, 640, Rgb([114, 114, 114]));

    let err = diagnoser.diagnose(&img).unwrap_err();
    assert!(matches!(
        err,
        DiagnoseError::Detect(DetectError::NoDetection)
    ));
}

#[test]
fn unknown_class_is_a_configuration_error() {
    // 4 + 40 columns: the model claims more classes than the catalog knows
    let cols = 4 + 40;
    let mut row = vec![0.0f32; cols];
    row[0] = 320.0;
    row[1] = 320.0;
    row[2] = 100.0;
    row[3] = 100.0;
    row[4 + 35] = 0.9;
    let preds = Array2::from_shape_vec((1, cols), row).unwrap();
    let mut diagnoser = Diagnoser::new(FakeDetector { preds }, CannedAdvisor);

    let err = diagnoser.diagnose(&diseased_photo()).unwrap_err();
    assert!(matches!(err, DiagnoseError::UnknownClass(35)));
}

#[test]
fn advisor_failure_falls_back_instead_of_failing() {
    let preds = preds(vec![anchor_row(320.0, 320.0, 320.0, 320.0, 20, 0.90)]);
    let mut diagnoser = Diagnoser::new(FakeDetector { preds }, FailingAdvisor);

    let diagnosis = diagnoser.diagnose(&diseased_photo()).unwrap();
    // quantitative fields intact, prose replaced by canned text
    assert_eq!(diagnosis.disease_name, "Early Blight");
    assert!(diagnosis.treatment_plan.contains("consult"));
    assert!(diagnosis.quick_summary.contains("action needed"));
}
