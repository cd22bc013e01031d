//! LeafSense – detection layer
//!
//! This crate provides a backend-agnostic [`Detector`] trait plus a concrete
//! [`OrtYolo`] implementation that runs the pre-trained leaf-disease YOLO
//! network through ONNX Runtime.  Around it live the two pure post-processing
//! stages of the pipeline:
//!
//! * [`decode`] – raw per-anchor rows `(cx, cy, w, h, class scores…)` into
//!   confidence-filtered [`Candidate`] boxes in original-image pixels;
//! * [`nms`] – greedy overlap suppression leaving one box per object.
//!
//! Input tensors come from `leafsense-preprocess` (CHW, f32, batch of one).
//! Both stages are deterministic: same rows in, same candidates out.

use ndarray::{Array2, Array4, Axis, Ix2};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::cmp::Ordering;
use thiserror::Error;

/// Minimum class score for a raw row to become a candidate.
pub const DEFAULT_CONF_THRESHOLD: f32 = 0.20;

/// IoU above which the lower-scoring of two boxes is suppressed.
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.45;

#[derive(Debug, Error)]
pub enum DetectError {
    /// No row cleared the confidence threshold.  A legitimate "nothing
    /// recognizable in this photo" outcome, not a fault.
    #[error("no object of interest found in the image")]
    NoDetection,
    #[error("unexpected model output shape: {0:?}")]
    OutputShape(Vec<usize>),
    #[error("inference backend error: {0}")]
    Inference(#[from] ort::Error),
}

pub type Result<T> = std::result::Result<T, DetectError>;

/// A single surviving detection: corner box in original-image pixels,
/// best class score, and the index of that class.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub bbox: [f32; 4],
    pub score: f32,
    pub class_id: usize,
}

/// Trait for the inference collaborator.
///
/// Takes the normalized `[1, 3, S, S]` tensor and returns the raw prediction
/// matrix in anchor-major `(N, 4 + C)` layout.  Implementations own whatever
/// transposing their backend needs.
pub trait Detector {
    fn infer(&mut self, input: &Array4<f32>) -> Result<Array2<f32>>;
}

// ------------------------------------------------------------
// decoding: raw rows → candidates in original pixels
// ------------------------------------------------------------

/// Decode raw predictions into confidence-filtered candidates.
///
/// Rows whose best class score is `>= conf_threshold` survive (the boundary
/// is inclusive).  Boxes come back in corner form, rescaled from tensor
/// space to original pixels by `orig/input_size` per axis.  Note the
/// letterbox padding offset is deliberately *not* subtracted here – that
/// matches the convention the model was trained and shipped with.
pub fn decode(
    preds: ndarray::ArrayView2<f32>,
    orig_w: u32,
    orig_h: u32,
    input_size: u32,
    conf_threshold: f32,
) -> Result<Vec<Candidate>> {
    let cols = preds.ncols();
    if cols <= 4 {
        return Err(DetectError::OutputShape(vec![preds.nrows(), cols]));
    }

    let sx = orig_w as f32 / input_size as f32;
    let sy = orig_h as f32 / input_size as f32;

    let mut out = Vec::new();
    for row in preds.rows() {
        // best class: first max wins on ties, like argmax
        let mut class_id = 0usize;
        let mut score = f32::MIN;
        for (c, &s) in row.iter().skip(4).enumerate() {
            if s > score {
                score = s;
                class_id = c;
            }
        }
        if score < conf_threshold {
            continue;
        }

        let (cx, cy, w, h) = (row[0], row[1], row[2], row[3]);
        out.push(Candidate {
            bbox: [
                (cx - w / 2.0) * sx,
                (cy - h / 2.0) * sy,
                (cx + w / 2.0) * sx,
                (cy + h / 2.0) * sy,
            ],
            score,
            class_id,
        });
    }

    if out.is_empty() {
        return Err(DetectError::NoDetection);
    }
    log::debug!("decoded {} candidate boxes", out.len());
    Ok(out)
}

// ------------------------------------------------------------
// greedy suppression
// ------------------------------------------------------------

fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let ix1 = a[0].max(b[0]);
    let iy1 = a[1].max(b[1]);
    let ix2 = a[2].min(b[2]);
    let iy2 = a[3].min(b[3]);
    let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}

/// Greedy non-maximum suppression.
///
/// Candidates are visited in descending score order (stable: ties keep input
/// order).  Each kept box removes every remaining box overlapping it with
/// IoU strictly above `iou_threshold`.  The output is in keep order, so
/// index 0 is the globally highest-scoring survivor.  An empty input yields
/// an empty output.
pub fn nms(candidates: &[Candidate], iou_threshold: f32) -> Vec<Candidate> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        candidates[b]
            .score
            .partial_cmp(&candidates[a].score)
            .unwrap_or(Ordering::Equal)
    });

    let mut keep = Vec::new();
    while !order.is_empty() {
        let i = order.remove(0);
        keep.push(candidates[i].clone());
        let head = candidates[i].bbox;
        order.retain(|&j| iou(&head, &candidates[j].bbox) <= iou_threshold);
    }
    keep
}

// ------------------------------------------------------------
// ONNX Runtime backend
// ------------------------------------------------------------

/// ONNX-Runtime-powered YOLO detector.
pub struct OrtYolo {
    session: Session,
}

impl OrtYolo {
    /// Load the ONNX model and prepare an optimized session.
    pub fn new(model_path: &str) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(num_cpus::get())?
            .commit_from_file(model_path)?;
        log::info!("loaded detection model from {model_path}");
        Ok(Self { session })
    }
}

impl Detector for OrtYolo {
    fn infer(&mut self, input: &Array4<f32>) -> Result<Array2<f32>> {
        let outputs = self.session.run(ort::inputs!["images" => input.view()]?)?;
        let view = outputs[0].try_extract_tensor::<f32>()?;

        // model emits [1, 4+C, N]; callers want anchor-major (N, 4+C)
        let shape = view.shape().to_vec();
        if shape.len() != 3 || shape[0] != 1 || shape[1] <= 4 {
            return Err(DetectError::OutputShape(shape));
        }
        let preds = view
            .index_axis(Axis(0), 0)
            .reversed_axes()
            .as_standard_layout()
            .to_owned();
        preds
            .into_dimensionality::<Ix2>()
            .map_err(|_| DetectError::OutputShape(shape))
    }
}
