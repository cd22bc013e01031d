//! # leafsense-diagnose
//!
//! The diagnosis core of LeafSense: everything between a decoded leaf
//! detection and the structured answer handed back to the caller.
//!
//! * [`catalog`] – the static class id → (crop, disease, status) table.
//! * [`severity`] – color-proxy estimate of how much leaf tissue is affected.
//! * [`growth`] – growth stage from relative bounding-box size.
//! * [`advice`] – the treatment-advice collaborator interface and fallbacks.
//! * [`recommend`] – the irrigation/fertilizer policy collaborator interface.
//! * [`pipeline`] – the [`pipeline::Diagnoser`] orchestrating one image
//!   start-to-finish.

pub mod advice;
pub mod catalog;
pub mod growth;
pub mod pipeline;
pub mod recommend;
pub mod severity;

pub use advice::{AdviceRequest, CannedAdvisor, TreatmentAdvisor};
pub use catalog::{DiseaseInfo, DiseaseStatus};
pub use growth::GrowthStage;
pub use pipeline::{DiagnoseConfig, DiagnoseError, Diagnoser, Diagnosis};
pub use severity::{Severity, SeverityLevel};
