//! Growth-stage estimation from relative bounding-box size.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrowthStage {
    pub stage: &'static str,
    pub code: u8,
}

/// Classify growth stage from `bbox_area / image_area`.
///
/// Bands are inclusive on their lower bound: `< 0.2` early, `< 0.5`
/// vegetative, the rest mature.  Pure function, no failure modes.
pub fn estimate(bbox_area_ratio: f32) -> GrowthStage {
    if bbox_area_ratio < 0.2 {
        GrowthStage {
            stage: "Early/Seedling",
            code: 1,
        }
    } else if bbox_area_ratio < 0.5 {
        GrowthStage {
            stage: "Vegetative",
            code: 2,
        }
    } else {
        GrowthStage {
            stage: "Flowering/Mature",
            code: 3,
        }
    }
}
