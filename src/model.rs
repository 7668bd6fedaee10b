//! Tree-ensemble classifier evaluation.
//!
//! Each model artifact is a serialized gradient-boosted forest: a bias score
//! per class plus trees whose leaves carry one additive score per class.
//! Prediction sums leaf scores over all trees and takes the argmax. The
//! artifact is opaque to the rest of the system; only its feature width and
//! label range matter to callers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactLoadError, InferenceError};

/// One node in a decision tree, indexed within the tree's node array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        scores: Vec<f64>,
    },
}

/// A single decision tree; the root is node 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walk to the leaf matching `features`. Split rule: `x <= threshold`
    /// goes left. The step count is capped at the node count so a corrupt
    /// artifact with a cycle cannot loop forever.
    fn leaf_for(&self, features: &[f64]) -> Result<&[f64], InferenceError> {
        let mut index = 0;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).ok_or_else(|| {
                        InferenceError::CorruptTree(format!(
                            "split references feature {feature} beyond vector width"
                        ))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                Some(Node::Leaf { scores }) => return Ok(scores),
                None => {
                    return Err(InferenceError::CorruptTree(format!(
                        "node index {index} out of bounds"
                    )))
                }
            }
        }
        Err(InferenceError::CorruptTree(
            "traversal did not reach a leaf".to_string(),
        ))
    }
}

/// A pre-trained multiclass classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbmClassifier {
    n_features: usize,
    n_classes: usize,
    bias: Vec<f64>,
    trees: Vec<Tree>,
}

impl GbmClassifier {
    /// Build a classifier from its parts, checking structural consistency.
    pub fn new(
        n_features: usize,
        n_classes: usize,
        bias: Vec<f64>,
        trees: Vec<Tree>,
    ) -> Result<Self, ArtifactLoadError> {
        let model = Self {
            n_features,
            n_classes,
            bias,
            trees,
        };
        model.check_consistency()?;
        Ok(model)
    }

    /// Load a classifier from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, ArtifactLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model: Self =
            serde_json::from_str(&text).map_err(|source| ArtifactLoadError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        model.check_consistency()?;
        Ok(model)
    }

    fn check_consistency(&self) -> Result<(), ArtifactLoadError> {
        if self.n_classes < 2 {
            return Err(ArtifactLoadError::Skew(format!(
                "classifier declares {} classes, need at least 2",
                self.n_classes
            )));
        }
        if self.bias.len() != self.n_classes {
            return Err(ArtifactLoadError::Skew(format!(
                "bias has {} entries for {} classes",
                self.bias.len(),
                self.n_classes
            )));
        }
        for (tree_index, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ArtifactLoadError::Skew(format!(
                    "tree {tree_index} has no nodes"
                )));
            }
            for node in &tree.nodes {
                match node {
                    Node::Split { feature, left, right, .. } => {
                        if *feature >= self.n_features {
                            return Err(ArtifactLoadError::Skew(format!(
                                "tree {tree_index} splits on feature {feature}, model width is {}",
                                self.n_features
                            )));
                        }
                        if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                            return Err(ArtifactLoadError::Skew(format!(
                                "tree {tree_index} has a child index out of bounds"
                            )));
                        }
                    }
                    Node::Leaf { scores } => {
                        if scores.len() != self.n_classes {
                            return Err(ArtifactLoadError::Skew(format!(
                                "tree {tree_index} has a leaf with {} scores for {} classes",
                                scores.len(),
                                self.n_classes
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Predict the class label for one scaled feature vector.
    ///
    /// Pure and deterministic: the same vector always yields the same label.
    pub fn predict(&self, features: &[f64]) -> Result<usize, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::ShapeMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        let mut scores = self.bias.clone();
        for tree in &self.trees {
            let leaf = tree.leaf_for(features)?;
            for (total, score) in scores.iter_mut().zip(leaf) {
                *total += score;
            }
        }
        // Ties resolve to the lowest label.
        let (label, _) = scores
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best, max), (index, score)| {
                if *score > max {
                    (index, *score)
                } else {
                    (best, max)
                }
            });
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stump(feature: usize, threshold: f64, low: Vec<f64>, high: Vec<f64>) -> Tree {
        Tree {
            nodes: vec![
                Node::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                Node::Leaf { scores: low },
                Node::Leaf { scores: high },
            ],
        }
    }

    fn three_class_model() -> GbmClassifier {
        GbmClassifier::new(
            2,
            3,
            vec![0.1, 0.0, 0.0],
            vec![
                stump(0, 0.0, vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]),
                stump(1, 0.5, vec![0.0, 0.0, 0.2], vec![0.0, 0.0, 1.5]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn argmax_over_accumulated_scores() {
        let model = three_class_model();
        assert_eq!(model.predict(&[-1.0, 0.0]).unwrap(), 0);
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 1);
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 2);
    }

    #[test]
    fn prediction_is_deterministic() {
        let model = three_class_model();
        let first = model.predict(&[0.3, 0.7]).unwrap();
        for _ in 0..10 {
            assert_eq!(model.predict(&[0.3, 0.7]).unwrap(), first);
        }
    }

    #[test]
    fn ties_resolve_to_the_lowest_label() {
        let model = GbmClassifier::new(2, 3, vec![0.5, 0.5, 0.5], vec![]).unwrap();
        assert_eq!(model.predict(&[0.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn rejects_the_wrong_vector_width() {
        let err = three_class_model().predict(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::ShapeMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn rejects_a_leaf_with_wrong_score_arity() {
        let err = GbmClassifier::new(
            2,
            3,
            vec![0.0, 0.0, 0.0],
            vec![Tree {
                nodes: vec![Node::Leaf {
                    scores: vec![1.0, 2.0],
                }],
            }],
        )
        .unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Skew(_)));
    }

    #[test]
    fn rejects_a_split_beyond_the_feature_width() {
        let err = GbmClassifier::new(
            2,
            3,
            vec![0.0, 0.0, 0.0],
            vec![stump(5, 0.0, vec![0.0; 3], vec![0.0; 3])],
        )
        .unwrap_err();
        assert!(err.to_string().contains("feature 5"));
    }

    #[test]
    fn artifact_round_trips_through_json() {
        let model = three_class_model();
        let text = serde_json::to_string(&model).unwrap();
        let reloaded: GbmClassifier = serde_json::from_str(&text).unwrap();
        assert_eq!(reloaded.n_features(), 2);
        assert_eq!(reloaded.n_classes(), 3);
        assert_eq!(
            reloaded.predict(&[1.0, 1.0]).unwrap(),
            model.predict(&[1.0, 1.0]).unwrap()
        );
    }
}
