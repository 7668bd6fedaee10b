//! Request schema and validation.
//!
//! The body is inspected as raw JSON before deserialization so that every
//! field-level violation can be reported in one pass. Serde alone would stop
//! at the first missing field, which is not enough to name them all.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field-level validation failure, serialized into the 422 details array.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>, kind: &'static str) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            kind,
        }
    }
}

/// Constraint attached to a questionnaire field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A real-valued field bounded to a closed interval.
    Continuous { min: f64, max: f64 },
    /// An integer questionnaire answer on the 1..=3 scale.
    Scale,
}

pub const SCALE_MIN: i64 = 1;
pub const SCALE_MAX: i64 = 3;

/// Every field the endpoint accepts, with its constraint. Demographic codes
/// (Gender, University, Department, Academic_Year, Waiver_Scholarship) are
/// held to the same 1..=3 scale as the Likert answers.
pub const FIELDS: &[(&str, FieldKind)] = &[
    ("Age", FieldKind::Continuous { min: 0.0, max: 100.0 }),
    ("Gender", FieldKind::Scale),
    ("University", FieldKind::Scale),
    ("Department", FieldKind::Scale),
    ("Academic_Year", FieldKind::Scale),
    ("CGPA", FieldKind::Continuous { min: 0.0, max: 4.0 }),
    ("Waiver_Scholarship", FieldKind::Scale),
    ("Nervous_Anxious", FieldKind::Scale),
    ("Worrying", FieldKind::Scale),
    ("Trouble_Relaxing", FieldKind::Scale),
    ("Easily_Annoyed", FieldKind::Scale),
    ("Excessive_Worry", FieldKind::Scale),
    ("Restless", FieldKind::Scale),
    ("Fearful", FieldKind::Scale),
    ("Upset", FieldKind::Scale),
    ("Lack_of_Control", FieldKind::Scale),
    ("Nervous_Stress", FieldKind::Scale),
    ("Inadequate_Coping", FieldKind::Scale),
    ("Confident", FieldKind::Scale),
    ("Things_Going_Well", FieldKind::Scale),
    ("Control_Irritations", FieldKind::Scale),
    ("Top_Performance", FieldKind::Scale),
    ("Angered_by_Performance", FieldKind::Scale),
    ("Overwhelmed", FieldKind::Scale),
    ("Lack_of_Interest", FieldKind::Scale),
    ("Feeling_Down", FieldKind::Scale),
    ("Sleep_Issues", FieldKind::Scale),
    ("Fatigue", FieldKind::Scale),
    ("Appetite_Issues", FieldKind::Scale),
    ("Self_Doubt", FieldKind::Scale),
    ("Concentration_Issues", FieldKind::Scale),
    ("Movement_Issues", FieldKind::Scale),
    ("Suicidal_Thoughts", FieldKind::Scale),
];

pub const FIELD_COUNT: usize = FIELDS.len();

/// A fully validated questionnaire. Construction goes through [`validate`];
/// any value of this type already satisfies every field constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Gender")]
    pub gender: i64,
    #[serde(rename = "University")]
    pub university: i64,
    #[serde(rename = "Department")]
    pub department: i64,
    #[serde(rename = "Academic_Year")]
    pub academic_year: i64,
    #[serde(rename = "CGPA")]
    pub cgpa: f64,
    #[serde(rename = "Waiver_Scholarship")]
    pub waiver_scholarship: i64,
    #[serde(rename = "Nervous_Anxious")]
    pub nervous_anxious: i64,
    #[serde(rename = "Worrying")]
    pub worrying: i64,
    #[serde(rename = "Trouble_Relaxing")]
    pub trouble_relaxing: i64,
    #[serde(rename = "Easily_Annoyed")]
    pub easily_annoyed: i64,
    #[serde(rename = "Excessive_Worry")]
    pub excessive_worry: i64,
    #[serde(rename = "Restless")]
    pub restless: i64,
    #[serde(rename = "Fearful")]
    pub fearful: i64,
    #[serde(rename = "Upset")]
    pub upset: i64,
    #[serde(rename = "Lack_of_Control")]
    pub lack_of_control: i64,
    #[serde(rename = "Nervous_Stress")]
    pub nervous_stress: i64,
    #[serde(rename = "Inadequate_Coping")]
    pub inadequate_coping: i64,
    #[serde(rename = "Confident")]
    pub confident: i64,
    #[serde(rename = "Things_Going_Well")]
    pub things_going_well: i64,
    #[serde(rename = "Control_Irritations")]
    pub control_irritations: i64,
    #[serde(rename = "Top_Performance")]
    pub top_performance: i64,
    #[serde(rename = "Angered_by_Performance")]
    pub angered_by_performance: i64,
    #[serde(rename = "Overwhelmed")]
    pub overwhelmed: i64,
    #[serde(rename = "Lack_of_Interest")]
    pub lack_of_interest: i64,
    #[serde(rename = "Feeling_Down")]
    pub feeling_down: i64,
    #[serde(rename = "Sleep_Issues")]
    pub sleep_issues: i64,
    #[serde(rename = "Fatigue")]
    pub fatigue: i64,
    #[serde(rename = "Appetite_Issues")]
    pub appetite_issues: i64,
    #[serde(rename = "Self_Doubt")]
    pub self_doubt: i64,
    #[serde(rename = "Concentration_Issues")]
    pub concentration_issues: i64,
    #[serde(rename = "Movement_Issues")]
    pub movement_issues: i64,
    #[serde(rename = "Suicidal_Thoughts")]
    pub suicidal_thoughts: i64,
}

/// Validate a raw JSON body against [`FIELDS`], collecting every violation.
///
/// Returns the typed request only if no field is missing, mistyped, or out
/// of range. Unknown extra fields are ignored. No side effects.
pub fn validate(body: &Value) -> Result<PredictionRequest, Vec<FieldError>> {
    let object = match body.as_object() {
        Some(object) => object,
        None => {
            return Err(vec![FieldError::new(
                "body",
                "Input should be a valid object",
                "type_error",
            )])
        }
    };

    let mut errors = Vec::new();
    for (name, kind) in FIELDS {
        let value = match object.get(*name) {
            Some(value) => value,
            None => {
                errors.push(FieldError::new(name, "Field required", "missing"));
                continue;
            }
        };
        match kind {
            FieldKind::Continuous { min, max } => match value.as_f64() {
                Some(number) if (*min..=*max).contains(&number) => {}
                Some(_) => errors.push(FieldError::new(
                    name,
                    format!("Input should be between {min} and {max}"),
                    "out_of_range",
                )),
                None => errors.push(FieldError::new(
                    name,
                    "Input should be a valid number",
                    "type_error",
                )),
            },
            FieldKind::Scale => match value.as_i64() {
                Some(answer) if (SCALE_MIN..=SCALE_MAX).contains(&answer) => {}
                Some(_) => errors.push(FieldError::new(
                    name,
                    format!("Value must be between {SCALE_MIN} and {SCALE_MAX}"),
                    "out_of_range",
                )),
                None => errors.push(FieldError::new(
                    name,
                    "Input should be a valid integer",
                    "type_error",
                )),
            },
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value(body.clone()).map_err(|err| {
        vec![FieldError::new(
            "body",
            format!("Request does not match the expected schema: {err}"),
            "type_error",
        )]
    })
}
