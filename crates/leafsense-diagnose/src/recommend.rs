//! Irrigation/fertilization policy collaborator interface.
//!
//! The actual policy is a pre-trained model invoked through [`PolicyModel`];
//! its decision logic lives outside this crate.  Here we own the state
//! vector layout, the discrete action tables, and the rule-based soil
//! health score reported alongside the recommendation.

use serde::Serialize;
use thiserror::Error;

/// Discrete irrigation options, in mm.  Index comes from the policy.
pub const IRRIGATION_MM: [u32; 5] = [0, 5, 10, 15, 20];

/// Discrete fertilizer options, in kg/acre.
pub const FERTILIZER_KG: [u32; 4] = [0, 1, 2, 3];

// Optimal ranges for the health score (must match training environment)
const OPTIMAL_MOISTURE: (f32, f32) = (40.0, 70.0);
const OPTIMAL_N: (f32, f32) = (50.0, 150.0);
const OPTIMAL_P: (f32, f32) = (30.0, 100.0);
const OPTIMAL_K: (f32, f32) = (40.0, 120.0);
const OPTIMAL_PH: (f32, f32) = (6.0, 7.5);

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy backend unavailable: {0}")]
    Unavailable(String),
    #[error("policy returned out-of-range action index ({0}, {1})")]
    ActionOutOfRange(usize, usize),
}

/// One observation of field conditions, in the order the policy was trained
/// on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldState {
    pub moisture: f32,
    pub nitrogen: f32,
    pub phosphorus: f32,
    pub potassium: f32,
    pub ph: f32,
    pub growth: f32,
    pub temp: f32,
    pub humidity: f32,
    pub rain_prob: f32,
    pub prev_irrigation: f32,
    pub prev_fertilizer: f32,
}

impl FieldState {
    /// Flatten into the 11-element vector the policy expects.
    pub fn to_vector(&self) -> [f32; 11] {
        [
            self.moisture,
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.ph,
            self.growth,
            self.temp,
            self.humidity,
            self.rain_prob,
            self.prev_irrigation,
            self.prev_fertilizer,
        ]
    }
}

/// External pre-trained policy.  Returns the two discrete action indices
/// (irrigation, fertilizer).
pub trait PolicyModel {
    fn predict(&self, state: &[f32; 11]) -> Result<(usize, usize), PolicyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub irrigation_mm: u32,
    pub fertilizer_kg: u32,
    pub health: f32,
}

/// Rule-based crop health score (0-100) from soil conditions.
pub fn health_score(state: &FieldState) -> f32 {
    let mut health = 100.0f32;

    if state.moisture < OPTIMAL_MOISTURE.0 {
        health -= (OPTIMAL_MOISTURE.0 - state.moisture) * 0.8;
    } else if state.moisture > OPTIMAL_MOISTURE.1 {
        health -= (state.moisture - OPTIMAL_MOISTURE.1) * 0.4;
    }

    if state.nitrogen < OPTIMAL_N.0 {
        health -= (OPTIMAL_N.0 - state.nitrogen) * 0.3;
    }
    if state.phosphorus < OPTIMAL_P.0 {
        health -= (OPTIMAL_P.0 - state.phosphorus) * 0.2;
    }
    if state.potassium < OPTIMAL_K.0 {
        health -= (OPTIMAL_K.0 - state.potassium) * 0.2;
    }

    if !(OPTIMAL_PH.0..=OPTIMAL_PH.1).contains(&state.ph) {
        health -= 15.0;
    }

    health.clamp(0.0, 100.0)
}

/// Ask the policy for one recommendation.
pub fn recommend(
    policy: &dyn PolicyModel,
    state: &FieldState,
) -> Result<Recommendation, PolicyError> {
    let (irr_idx, fert_idx) = policy.predict(&state.to_vector())?;
    let irrigation_mm = *IRRIGATION_MM
        .get(irr_idx)
        .ok_or(PolicyError::ActionOutOfRange(irr_idx, fert_idx))?;
    let fertilizer_kg = *FERTILIZER_KG
        .get(fert_idx)
        .ok_or(PolicyError::ActionOutOfRange(irr_idx, fert_idx))?;

    let health = (health_score(state) * 100.0).round() / 100.0;
    Ok(Recommendation {
        irrigation_mm,
        fertilizer_kg,
        health,
    })
}
