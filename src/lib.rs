//! Deterministic PWA branding asset pipeline for the punch-card loyalty
//! platform.
//!
//! Given an organization's logo (or none) and brand colors, the pipeline
//! synthesizes the full catalog of PWA icons and Apple splash screens,
//! uploads them to object storage under deterministic keys, and produces
//! the matching `manifest.json` and HTML head tags. Deletion walks exactly
//! the same key set, so generate followed by delete leaves no residue.

pub mod api;
pub mod color;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod planner;
pub mod storage;
pub mod synchronizer;
pub mod synthesizer;

pub use error::{AssetError, Result};
pub use planner::{plan_deletion, plan_generation, ArtifactKind, ArtifactSpec, IconPurpose};
pub use synchronizer::{AssetGenerationResult, DeleteSummary, GenerateRequest, Synchronizer};
