//! Feature-name translation and column ordering.
//!
//! The scaler and models were trained on human-readable column labels, some
//! of which carry whitespace quirks (trailing spaces, slashes). Those labels
//! are match keys against the artifacts and must be reproduced byte-exact.

use crate::error::MappingError;
use crate::schema::{PredictionRequest, FIELD_COUNT};

/// Fixed bijection from external field names to the internal column labels
/// the artifacts were trained on. Do not "fix" the trailing spaces.
pub const FEATURE_MAPPING: [(&str, &str); FIELD_COUNT] = [
    ("Age", "Age"),
    ("Gender", "Gender"),
    ("University", "University"),
    ("Department", "Department"),
    ("Academic_Year", "Academic Year"),
    ("CGPA", "Current CGPA"),
    ("Waiver_Scholarship", "Waiver/Scholarship"),
    ("Nervous_Anxious", "Nervous/Anxious"),
    ("Worrying", "Worrying"),
    ("Trouble_Relaxing", "Trouble Relaxing "),
    ("Easily_Annoyed", "Easily Annoyed"),
    ("Excessive_Worry", "Excessive Worry "),
    ("Restless", "Restless"),
    ("Fearful", "Fearful "),
    ("Upset", "Upset"),
    ("Lack_of_Control", "Lack of Control"),
    ("Nervous_Stress", "Nervous/Stress "),
    ("Inadequate_Coping", "Inadequate Coping"),
    ("Confident", "Confident"),
    ("Things_Going_Well", "Things Going Well"),
    ("Control_Irritations", "Control Irritations"),
    ("Top_Performance", "Top Performance"),
    ("Angered_by_Performance", "Angered by Performance"),
    ("Overwhelmed", "Overwhelmed"),
    ("Lack_of_Interest", "Lack of Interest"),
    ("Feeling_Down", "Feeling Down"),
    ("Sleep_Issues", "Sleep Issues"),
    ("Fatigue", "Fatigue"),
    ("Appetite_Issues", "Appetite Issues"),
    ("Self_Doubt", "Self-Doubt"),
    ("Concentration_Issues", "Concentration Issues"),
    ("Movement_Issues", "Movement Issues"),
    ("Suicidal_Thoughts", "Suicidal Thoughts"),
];

/// Look up the internal label for an external field name.
pub fn internal_name(external: &str) -> Result<&'static str, MappingError> {
    FEATURE_MAPPING
        .iter()
        .find(|(ext, _)| *ext == external)
        .map(|(_, internal)| *internal)
        .ok_or_else(|| MappingError::UnknownExternalField(external.to_string()))
}

impl PredictionRequest {
    /// Project the request onto internal column labels. Total over the
    /// struct: every field that type-checks has a label, so this step
    /// cannot fail at runtime.
    pub fn to_internal_features(&self) -> [(&'static str, f64); FIELD_COUNT] {
        [
            ("Age", self.age),
            ("Gender", self.gender as f64),
            ("University", self.university as f64),
            ("Department", self.department as f64),
            ("Academic Year", self.academic_year as f64),
            ("Current CGPA", self.cgpa),
            ("Waiver/Scholarship", self.waiver_scholarship as f64),
            ("Nervous/Anxious", self.nervous_anxious as f64),
            ("Worrying", self.worrying as f64),
            ("Trouble Relaxing ", self.trouble_relaxing as f64),
            ("Easily Annoyed", self.easily_annoyed as f64),
            ("Excessive Worry ", self.excessive_worry as f64),
            ("Restless", self.restless as f64),
            ("Fearful ", self.fearful as f64),
            ("Upset", self.upset as f64),
            ("Lack of Control", self.lack_of_control as f64),
            ("Nervous/Stress ", self.nervous_stress as f64),
            ("Inadequate Coping", self.inadequate_coping as f64),
            ("Confident", self.confident as f64),
            ("Things Going Well", self.things_going_well as f64),
            ("Control Irritations", self.control_irritations as f64),
            ("Top Performance", self.top_performance as f64),
            ("Angered by Performance", self.angered_by_performance as f64),
            ("Overwhelmed", self.overwhelmed as f64),
            ("Lack of Interest", self.lack_of_interest as f64),
            ("Feeling Down", self.feeling_down as f64),
            ("Sleep Issues", self.sleep_issues as f64),
            ("Fatigue", self.fatigue as f64),
            ("Appetite Issues", self.appetite_issues as f64),
            ("Self-Doubt", self.self_doubt as f64),
            ("Concentration Issues", self.concentration_issues as f64),
            ("Movement Issues", self.movement_issues as f64),
            ("Suicidal Thoughts", self.suicidal_thoughts as f64),
        ]
    }
}

/// Reorder named features into the scaler's trained column order.
///
/// `order` comes from the scaler artifact, not from the request, so a miss
/// here is artifact skew and surfaces as a [`MappingError`].
pub fn order_features(
    named: &[(&'static str, f64)],
    order: &[String],
) -> Result<Vec<f64>, MappingError> {
    order
        .iter()
        .map(|column| {
            named
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| *value)
                .ok_or_else(|| MappingError::MissingInternalFeature(column.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FIELDS;
    use crate::testing::valid_request;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn mapping_covers_exactly_the_declared_field_set() {
        let externals: BTreeSet<&str> = FEATURE_MAPPING.iter().map(|(e, _)| *e).collect();
        let declared: BTreeSet<&str> = FIELDS.iter().map(|(name, _)| *name).collect();
        assert_eq!(externals, declared);
    }

    #[test]
    fn mapping_is_a_bijection() {
        let internals: BTreeSet<&str> = FEATURE_MAPPING.iter().map(|(_, i)| *i).collect();
        assert_eq!(internals.len(), FEATURE_MAPPING.len());
    }

    #[test]
    fn projection_agrees_with_the_mapping_table() {
        let request = valid_request();
        let named = request.to_internal_features();
        for (projected, (_, internal)) in named.iter().zip(FEATURE_MAPPING.iter()) {
            assert_eq!(projected.0, *internal);
        }
    }

    #[test]
    fn whitespace_quirks_are_preserved() {
        assert_eq!(internal_name("Trouble_Relaxing").unwrap(), "Trouble Relaxing ");
        assert_eq!(internal_name("Nervous_Stress").unwrap(), "Nervous/Stress ");
        assert_eq!(internal_name("Self_Doubt").unwrap(), "Self-Doubt");
        assert_eq!(internal_name("CGPA").unwrap(), "Current CGPA");
    }

    #[test]
    fn unknown_external_name_is_rejected() {
        let err = internal_name("Shoe_Size").unwrap_err();
        assert!(err.to_string().contains("Shoe_Size"));
    }

    #[test]
    fn ordering_follows_the_trained_column_order() {
        let named = [("Age", 20.0), ("Worrying", 2.0), ("Fatigue", 1.0)];
        let order = vec![
            "Fatigue".to_string(),
            "Age".to_string(),
            "Worrying".to_string(),
        ];
        let ordered = order_features(&named, &order).unwrap();
        assert_eq!(ordered, vec![1.0, 20.0, 2.0]);
    }

    #[test]
    fn ordering_fails_on_a_column_the_mapping_never_produces() {
        let named = [("Age", 20.0)];
        let order = vec!["Shoe Size".to_string()];
        let err = order_features(&named, &order).unwrap_err();
        assert!(matches!(err, MappingError::MissingInternalFeature(ref c) if c == "Shoe Size"));
    }
}
