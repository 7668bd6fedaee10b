//! Shared fixtures for the unit test modules.

use serde_json::{json, Value};

use crate::features::FEATURE_MAPPING;
use crate::model::{GbmClassifier, Node, Tree};
use crate::scaler::StandardScaler;
use crate::schema::{self, PredictionRequest};

/// The canonical valid questionnaire from the API documentation.
pub fn valid_payload() -> Value {
    json!({
        "Age": 20.0,
        "Gender": 1,
        "University": 1,
        "Department": 1,
        "Academic_Year": 2,
        "CGPA": 3.5,
        "Waiver_Scholarship": 1,
        "Nervous_Anxious": 2,
        "Worrying": 2,
        "Trouble_Relaxing": 1,
        "Easily_Annoyed": 1,
        "Excessive_Worry": 2,
        "Restless": 1,
        "Fearful": 1,
        "Upset": 1,
        "Lack_of_Control": 1,
        "Nervous_Stress": 2,
        "Inadequate_Coping": 1,
        "Confident": 3,
        "Things_Going_Well": 3,
        "Control_Irritations": 3,
        "Top_Performance": 3,
        "Angered_by_Performance": 1,
        "Overwhelmed": 1,
        "Lack_of_Interest": 1,
        "Feeling_Down": 1,
        "Sleep_Issues": 1,
        "Fatigue": 1,
        "Appetite_Issues": 1,
        "Self_Doubt": 1,
        "Concentration_Issues": 1,
        "Movement_Issues": 1,
        "Suicidal_Thoughts": 1
    })
}

pub fn valid_request() -> PredictionRequest {
    schema::validate(&valid_payload()).expect("fixture payload must validate")
}

/// A trained column order that deliberately differs from the mapping order,
/// so tests exercise the reordering step. Reversing keeps it a permutation.
pub const TRAINED_COLUMN_ORDER: [&str; FEATURE_MAPPING.len()] = {
    let mut order = [""; FEATURE_MAPPING.len()];
    let mut i = 0;
    while i < FEATURE_MAPPING.len() {
        order[i] = FEATURE_MAPPING[FEATURE_MAPPING.len() - 1 - i].1;
        i += 1;
    }
    order
};

pub fn synthetic_scaler() -> StandardScaler {
    let columns: Vec<String> = TRAINED_COLUMN_ORDER.iter().map(|c| c.to_string()).collect();
    let width = columns.len();
    StandardScaler::new(columns, vec![1.5; width], vec![0.5; width])
        .expect("fixture scaler is consistent")
}

/// A small deterministic forest over the full feature width: one stump on
/// the first trained column plus a per-class bias. Labels always land in
/// `0..n_classes`.
pub fn synthetic_model(n_classes: usize) -> GbmClassifier {
    let mut low = vec![0.0; n_classes];
    low[0] = 1.0;
    let mut high = vec![0.0; n_classes];
    high[1] = 1.0;
    let stump = Tree {
        nodes: vec![
            Node::Split {
                feature: 0,
                threshold: 0.0,
                left: 1,
                right: 2,
            },
            Node::Leaf { scores: low },
            Node::Leaf { scores: high },
        ],
    };
    let mut bias = vec![0.0; n_classes];
    bias[0] = 0.1;
    GbmClassifier::new(TRAINED_COLUMN_ORDER.len(), n_classes, bias, vec![stump])
        .expect("fixture model is consistent")
}
