//! Disease-severity estimation from pixel color distribution.
//!
//! This is a coarse proxy, not a measurement of biological severity: inside
//! the detected box we count pixels whose hue falls in the brown/yellow
//! lesion band and band the resulting ratio.  Good enough to tell "a few
//! spots" from "most of the leaf", nothing more.

use crate::catalog::DiseaseStatus;
use image::RgbImage;
use serde::Serialize;

// Lesion color band, OpenCV HSV convention (hue 0-180, sat/val 0-255).
const HUE_MIN: f32 = 10.0;
const HUE_MAX: f32 = 40.0;
const SAT_MIN: f32 = 50.0;
const VAL_MIN: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeverityLevel {
    None,
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Severity {
    pub level: SeverityLevel,
    pub score: u8,
    pub percentage: f32,
}

impl Severity {
    fn banded(ratio: f32) -> Self {
        let (level, score) = if ratio < 0.15 {
            (SeverityLevel::Low, 1)
        } else if ratio < 0.40 {
            (SeverityLevel::Moderate, 2)
        } else {
            (SeverityLevel::High, 3)
        };
        Severity {
            level,
            score,
            percentage: (ratio * 100.0 * 100.0).round() / 100.0,
        }
    }

    fn none() -> Self {
        Severity {
            level: SeverityLevel::None,
            score: 0,
            percentage: 0.0,
        }
    }

    // floor used when the box degenerates to nothing measurable
    fn low_default() -> Self {
        Severity {
            level: SeverityLevel::Low,
            score: 1,
            percentage: 10.0,
        }
    }
}

/// Estimate affected-tissue severity inside `bbox`.
///
/// Healthy leaves skip pixel analysis entirely and report
/// `{None, 0, 0.0}`.  A box that clamps to zero area yields the defensive
/// `{Low, 1, 10.0}` floor.
pub fn estimate(img: &RgbImage, bbox: [f32; 4], status: DiseaseStatus) -> Severity {
    if status == DiseaseStatus::Healthy {
        return Severity::none();
    }

    let (w, h) = img.dimensions();
    let x1 = (bbox[0] as i32).max(0);
    let y1 = (bbox[1] as i32).max(0);
    let x2 = bbox[2] as i32;
    let y2 = bbox[3] as i32;
    if x2 <= x1 || y2 <= y1 {
        return Severity::low_default();
    }

    let x1 = (x1 as u32).min(w);
    let y1 = (y1 as u32).min(h);
    let x2 = (x2 as u32).min(w);
    let y2 = (y2 as u32).min(h);
    if x1 >= x2 || y1 >= y2 {
        return Severity::low_default();
    }

    let mut masked = 0u64;
    let mut total = 0u64;
    for y in y1..y2 {
        for x in x1..x2 {
            let (hue, sat, val) = rgb_to_hsv(img.get_pixel(x, y).0);
            if (HUE_MIN..=HUE_MAX).contains(&hue) && sat >= SAT_MIN && val >= VAL_MIN {
                masked += 1;
            }
            total += 1;
        }
    }

    Severity::banded(masked as f32 / total as f32)
}

/// RGB → HSV in OpenCV's 8-bit ranges: hue 0-180, sat and val 0-255.
fn rgb_to_hsv(rgb: [u8; 3]) -> (f32, f32, f32) {
    let r = rgb[0] as f32;
    let g = rgb[1] as f32;
    let b = rgb[2] as f32;

    let val = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = val - min;

    let sat = if val == 0.0 { 0.0 } else { 255.0 * delta / val };

    let mut hue = if delta == 0.0 {
        0.0
    } else if val == r {
        60.0 * (g - b) / delta
    } else if val == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    (hue / 2.0, sat, val)
}
