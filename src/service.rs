//! Inference orchestration.
//!
//! The four artifacts live in one [`InferenceService`] value constructed at
//! startup and shared read-only across requests via `web::Data`. There is no
//! global state; a handler sees exactly the artifacts it was given.

use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::error::{ArtifactLoadError, ModelIntegrityError, PredictError};
use crate::features::{self, FEATURE_MAPPING};
use crate::model::GbmClassifier;
use crate::scaler::StandardScaler;
use crate::schema::{PredictionRequest, FIELDS};

pub const SCALER_FILE: &str = "standard_scaler.json";
pub const ANXIETY_MODEL_FILE: &str = "catboost_anxiety_model.json";
pub const STRESS_MODEL_FILE: &str = "catboost_stress_model.json";
pub const DEPRESSION_MODEL_FILE: &str = "catboost_depression_model.json";

/// Highest valid label per condition. Anything above is a corrupted or
/// mismatched model artifact.
pub const ANXIETY_MAX_LABEL: i64 = 3;
pub const STRESS_MAX_LABEL: i64 = 2;
pub const DEPRESSION_MAX_LABEL: i64 = 5;

/// Successful three-way prediction, serialized with the exact response keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prediction {
    #[serde(rename = "Anxiety Prediction")]
    pub anxiety: i64,
    #[serde(rename = "Stress Prediction")]
    pub stress: i64,
    #[serde(rename = "Depression Prediction")]
    pub depression: i64,
}

/// The scaler and the three classifiers, loaded once and immutable.
#[derive(Debug)]
pub struct InferenceService {
    scaler: StandardScaler,
    anxiety: GbmClassifier,
    stress: GbmClassifier,
    depression: GbmClassifier,
}

impl InferenceService {
    /// Assemble a service from already-loaded artifacts, cross-checking them
    /// against each other and against the mapping table.
    pub fn new(
        scaler: StandardScaler,
        anxiety: GbmClassifier,
        stress: GbmClassifier,
        depression: GbmClassifier,
    ) -> Result<Self, ArtifactLoadError> {
        let service = Self {
            scaler,
            anxiety,
            stress,
            depression,
        };
        service.check_artifact_agreement()?;
        Ok(service)
    }

    /// Load the four artifacts from `dir`. Any failure here is fatal: the
    /// caller must not bind the listener with a partially loaded service.
    pub fn load(dir: &Path) -> Result<Self, ArtifactLoadError> {
        let scaler = StandardScaler::load(&dir.join(SCALER_FILE))?;
        let anxiety = GbmClassifier::load(&dir.join(ANXIETY_MODEL_FILE))?;
        let stress = GbmClassifier::load(&dir.join(STRESS_MODEL_FILE))?;
        let depression = GbmClassifier::load(&dir.join(DEPRESSION_MODEL_FILE))?;
        Self::new(scaler, anxiety, stress, depression)
    }

    /// Startup cross-checks: every declared field has a mapping entry, the
    /// mapping and the scaler agree on the column set, and every model
    /// consumes vectors of the scaler's width.
    fn check_artifact_agreement(&self) -> Result<(), ArtifactLoadError> {
        for (external, _) in FIELDS {
            features::internal_name(external)
                .map_err(|err| ArtifactLoadError::Skew(err.to_string()))?;
        }
        if self.scaler.n_features() != FEATURE_MAPPING.len() {
            return Err(ArtifactLoadError::Skew(format!(
                "scaler was trained on {} columns, mapping produces {}",
                self.scaler.n_features(),
                FEATURE_MAPPING.len()
            )));
        }
        for column in self.scaler.feature_names() {
            if !FEATURE_MAPPING.iter().any(|(_, internal)| internal == column) {
                return Err(ArtifactLoadError::Skew(format!(
                    "scaler column `{column}` has no mapping entry"
                )));
            }
        }
        for (condition, model) in [
            ("anxiety", &self.anxiety),
            ("stress", &self.stress),
            ("depression", &self.depression),
        ] {
            if model.n_features() != self.scaler.n_features() {
                return Err(ArtifactLoadError::Skew(format!(
                    "{condition} model expects {} features, scaler provides {}",
                    model.n_features(),
                    self.scaler.n_features()
                )));
            }
        }
        Ok(())
    }

    /// Run the full pipeline for one validated request:
    /// map → reorder → scale → infer ×3 → range-check.
    ///
    /// All-or-nothing: a fault in any stage discards the whole prediction.
    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction, PredictError> {
        let named = request.to_internal_features();
        let ordered = features::order_features(&named, self.scaler.feature_names())?;
        let scaled = self.scaler.transform(&ordered)?;
        debug!("scaled feature vector: {scaled:?}");

        let anxiety = self.infer("anxiety", &self.anxiety, &scaled, ANXIETY_MAX_LABEL)?;
        let stress = self.infer("stress", &self.stress, &scaled, STRESS_MAX_LABEL)?;
        let depression = self.infer(
            "depression",
            &self.depression,
            &scaled,
            DEPRESSION_MAX_LABEL,
        )?;

        Ok(Prediction {
            anxiety,
            stress,
            depression,
        })
    }

    fn infer(
        &self,
        condition: &'static str,
        model: &GbmClassifier,
        scaled: &[f64],
        max_label: i64,
    ) -> Result<i64, PredictError> {
        let label = model
            .predict(scaled)
            .map_err(|source| PredictError::Inference { condition, source })? as i64;
        if label > max_label {
            return Err(ModelIntegrityError {
                condition,
                label,
                max: max_label,
            }
            .into());
        }
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictError;
    use crate::testing::{
        synthetic_model, synthetic_scaler, valid_request, TRAINED_COLUMN_ORDER,
    };
    use pretty_assertions::assert_eq;

    fn service() -> InferenceService {
        InferenceService::new(
            synthetic_scaler(),
            synthetic_model(4),
            synthetic_model(3),
            synthetic_model(6),
        )
        .unwrap()
    }

    #[test]
    fn predicts_within_documented_ranges() {
        let prediction = service().predict(&valid_request()).unwrap();
        assert!((0..=ANXIETY_MAX_LABEL).contains(&prediction.anxiety));
        assert!((0..=STRESS_MAX_LABEL).contains(&prediction.stress));
        assert!((0..=DEPRESSION_MAX_LABEL).contains(&prediction.depression));
    }

    #[test]
    fn prediction_is_idempotent() {
        let service = service();
        let request = valid_request();
        let first = service.predict(&request).unwrap();
        for _ in 0..5 {
            assert_eq!(service.predict(&request).unwrap(), first);
        }
    }

    #[test]
    fn out_of_range_label_is_a_model_integrity_fault() {
        // An anxiety artifact with six classes can emit labels above 3.
        let service = InferenceService::new(
            synthetic_scaler(),
            synthetic_model_biased_to(6, 5),
            synthetic_model(3),
            synthetic_model(6),
        )
        .unwrap();
        let err = service.predict(&valid_request()).unwrap_err();
        assert!(matches!(err, PredictError::ModelIntegrity(_)));
        assert!(err.to_string().contains("anxiety"));
    }

    #[test]
    fn rejects_a_model_of_the_wrong_width() {
        let narrow = crate::model::GbmClassifier::new(3, 4, vec![0.0; 4], vec![]).unwrap();
        let err = InferenceService::new(
            synthetic_scaler(),
            narrow,
            synthetic_model(3),
            synthetic_model(6),
        )
        .unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Skew(_)));
    }

    #[test]
    fn rejects_a_scaler_with_an_unmapped_column() {
        let mut columns: Vec<String> =
            TRAINED_COLUMN_ORDER.iter().map(|c| c.to_string()).collect();
        columns[0] = "Shoe Size".to_string();
        let width = columns.len();
        let scaler =
            StandardScaler::new(columns, vec![1.5; width], vec![0.5; width]).unwrap();
        let err = InferenceService::new(
            scaler,
            synthetic_model(4),
            synthetic_model(3),
            synthetic_model(6),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Shoe Size"));
    }

    #[test]
    fn prediction_serializes_with_the_documented_keys() {
        let json = serde_json::to_value(Prediction {
            anxiety: 1,
            stress: 0,
            depression: 2,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Anxiety Prediction": 1,
                "Stress Prediction": 0,
                "Depression Prediction": 2,
            })
        );
    }

    fn synthetic_model_biased_to(n_classes: usize, label: usize) -> GbmClassifier {
        let mut bias = vec![0.0; n_classes];
        bias[label] = 10.0;
        GbmClassifier::new(TRAINED_COLUMN_ORDER.len(), n_classes, bias, vec![]).unwrap()
    }
}
