//! Core domain types
//!
//! This module contains the structures returned by the analysis API.
//! Field names follow Rust conventions; serde handles the wire naming
//! (snake_case for result endpoints, camelCase for the status endpoint).

pub mod analysis;
pub mod axis;
pub mod market;
pub mod medical;
pub mod paper;
pub mod patent;
pub mod technology;
pub mod visualization;

pub use analysis::{
    AnalysisComponent, AnalysisProgress, AnalysisStatus, ComponentState, ComponentStatus,
    PollingRecommendation,
};
pub use technology::{Technology, TechnologyId};
