//! Pre-fitted standardization transform.
//!
//! The scaler artifact stores the column order, mean, and standard deviation
//! learned at training time. Nothing here fits anything; the transform is a
//! fixed linear map applied per feature.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactLoadError, TransformError};

/// Standardizes an ordered feature vector: `z = (x - mean) / std`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    feature_names: Vec<String>,
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from its fitted parameters, checking internal
    /// consistency (equal lengths, strictly positive deviations).
    pub fn new(
        feature_names: Vec<String>,
        mean: Vec<f64>,
        std: Vec<f64>,
    ) -> Result<Self, ArtifactLoadError> {
        let scaler = Self {
            feature_names,
            mean,
            std,
        };
        scaler.check_consistency()?;
        Ok(scaler)
    }

    /// Load the scaler from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, ArtifactLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let scaler: Self =
            serde_json::from_str(&text).map_err(|source| ArtifactLoadError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        scaler.check_consistency()?;
        Ok(scaler)
    }

    fn check_consistency(&self) -> Result<(), ArtifactLoadError> {
        if self.mean.len() != self.feature_names.len() || self.std.len() != self.feature_names.len()
        {
            return Err(ArtifactLoadError::Skew(format!(
                "scaler declares {} columns but carries {} means and {} deviations",
                self.feature_names.len(),
                self.mean.len(),
                self.std.len()
            )));
        }
        if let Some(index) = self.std.iter().position(|s| *s <= 0.0) {
            return Err(ArtifactLoadError::Skew(format!(
                "scaler column `{}` has non-positive standard deviation",
                self.feature_names[index]
            )));
        }
        Ok(())
    }

    /// The trained column order. Dictates the layout of every vector fed to
    /// [`transform`](Self::transform) and to the models.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Apply the fixed standardization to an ordered vector.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, TransformError> {
        if features.len() != self.mean.len() {
            return Err(TransformError {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(x, (mean, std))| (x - mean) / std)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn two_column_scaler() -> StandardScaler {
        StandardScaler::new(
            vec!["a".to_string(), "b".to_string()],
            vec![1.0, 10.0],
            vec![2.0, 5.0],
        )
        .unwrap()
    }

    #[test]
    fn standardizes_per_column() {
        let scaled = two_column_scaler().transform(&[3.0, 0.0]).unwrap();
        assert_eq!(scaled, vec![1.0, -2.0]);
    }

    #[test]
    fn rejects_a_vector_of_the_wrong_width() {
        let err = two_column_scaler().transform(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.expected, 2);
        assert_eq!(err.actual, 3);
    }

    #[test]
    fn rejects_mismatched_parameter_lengths() {
        let err = StandardScaler::new(
            vec!["a".to_string()],
            vec![0.0, 0.0],
            vec![1.0],
        )
        .unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Skew(_)));
    }

    #[test]
    fn rejects_degenerate_deviations() {
        let err = StandardScaler::new(
            vec!["a".to_string(), "b".to_string()],
            vec![0.0, 0.0],
            vec![1.0, 0.0],
        )
        .unwrap_err();
        assert!(err.to_string().contains('b'));
    }

    #[test]
    fn loads_from_a_json_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"feature_names": ["a", "b"], "mean": [1.0, 10.0], "std": [2.0, 5.0]}}"#
        )
        .unwrap();
        let scaler = StandardScaler::load(file.path()).unwrap();
        assert_eq!(scaler.n_features(), 2);
        assert_eq!(scaler.feature_names(), ["a", "b"]);
    }

    #[test]
    fn missing_artifact_is_an_io_error() {
        let err = StandardScaler::load(Path::new("/nonexistent/scaler.json")).unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Io { .. }));
    }
}
