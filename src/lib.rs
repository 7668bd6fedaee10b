//! Student mental health assessment API.
//!
//! Serves three pre-trained classifiers (anxiety, stress, depression) behind
//! a single prediction endpoint. The pipeline per request:
//!
//! schema validation → field-name mapping → column reordering → scaling →
//! model inference (×3) → output-range validation.
//!
//! Artifacts are loaded once at startup into an [`service::InferenceService`]
//! and shared read-only across requests.

pub mod error;
pub mod features;
pub mod model;
pub mod routes;
pub mod scaler;
pub mod schema;
pub mod service;

#[doc(hidden)]
pub mod testing;
