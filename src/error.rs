//! Error taxonomy for the prediction pipeline.
//!
//! Client-input violations are not represented here; the schema validator
//! reports them as a list of `FieldError` values that the HTTP layer turns
//! into a 422 response. Everything in this module is a server fault.

use thiserror::Error;

/// Feature-name translation failures. Both variants indicate a skew between
/// the mapping table and the artifacts, never a bad client request.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("no mapping entry for external field `{0}`")]
    UnknownExternalField(String),

    #[error("scaler expects feature `{0}` which the mapping did not produce")]
    MissingInternalFeature(String),
}

/// The ordered feature vector does not match the scaler's trained width.
#[derive(Debug, Error)]
#[error("feature vector has {actual} entries, scaler expects {expected}")]
pub struct TransformError {
    pub expected: usize,
    pub actual: usize,
}

/// A model artifact rejected a well-formed scaled vector.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model expects {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("corrupt tree structure: {0}")]
    CorruptTree(String),
}

/// A model produced a label outside its documented valid range.
#[derive(Debug, Error)]
#[error("{condition} model returned label {label}, valid range is 0..={max}")]
pub struct ModelIntegrityError {
    pub condition: &'static str,
    pub label: i64,
    pub max: i64,
}

/// Fatal startup failure: one of the four artifacts could not be loaded or
/// the loaded artifacts disagree with each other. The process must not
/// accept traffic in this state.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("failed to read artifact `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact skew: {0}")]
    Skew(String),
}

/// Any fault inside the predict pipeline after schema validation passed.
/// All variants map to an opaque 500 response.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("{condition} model inference failed: {source}")]
    Inference {
        condition: &'static str,
        #[source]
        source: InferenceError,
    },

    #[error(transparent)]
    ModelIntegrity(#[from] ModelIntegrityError),
}
