//! Techlens Core
//!
//! Core types for the Techlens technology-analysis client.
//!
//! This crate contains:
//! - Domain types: analysis status and the per-stage analysis results
//! - DTOs: request and error bodies exchanged with the analysis API
//! - Validation: the technology submission form rules

pub mod domain;
pub mod dto;
pub mod validation;
