pub mod matcher;

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{AppError, Result};

const BUILTIN_DATASET: &str = include_str!("../../data/faq_wm.json");

/// One curated question/answer pair. Loaded once at startup, immutable after.
#[derive(Debug, Clone, Deserialize)]
pub struct FaqRecord {
    pub id: String,
    pub question: String,
    pub answer_long: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The ordered FAQ dataset. Order matters: ties during matching keep the
/// earlier record.
#[derive(Debug, Clone)]
pub struct FaqSet {
    records: Vec<FaqRecord>,
}

impl FaqSet {
    /// Parses and validates a JSON array of records. Every record needs a
    /// non-blank id, question and answer; ids must be unique.
    pub fn from_json(raw: &str) -> Result<Self> {
        let records: Vec<FaqRecord> = serde_json::from_str(raw)
            .map_err(|e| AppError::Config(format!("invalid FAQ dataset: {e}")))?;

        let mut seen = HashSet::new();
        for record in &records {
            if record.id.trim().is_empty() {
                return Err(AppError::Config("FAQ record with a blank id".into()));
            }
            if record.question.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "FAQ record '{}' has a blank question",
                    record.id
                )));
            }
            if record.answer_long.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "FAQ record '{}' has a blank answer",
                    record.id
                )));
            }
            if !seen.insert(record.id.as_str()) {
                return Err(AppError::Config(format!("duplicate FAQ id '{}'", record.id)));
            }
        }

        Ok(Self { records })
    }

    /// The dataset embedded in the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_DATASET)
    }

    pub fn find(&self, query: &str) -> Option<&FaqRecord> {
        matcher::find(query, &self.records)
    }

    pub fn records(&self) -> &[FaqRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dataset_loads_and_validates() {
        let faq = FaqSet::builtin().unwrap();
        assert!(!faq.is_empty());
        assert!(faq.records().iter().any(|r| r.id == "horaires"));
    }

    #[test]
    fn tags_are_optional() {
        let faq = FaqSet::from_json(
            r#"[{"id":"a","question":"Q ?","answer_long":"R."}]"#,
        )
        .unwrap();
        assert!(faq.records()[0].tags.is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = r#"[
            {"id":"a","question":"Q1 ?","answer_long":"R1."},
            {"id":"a","question":"Q2 ?","answer_long":"R2."}
        ]"#;
        let err = FaqSet::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate FAQ id 'a'"));
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let raw = r#"[{"id":"a","question":"  ","answer_long":"R."}]"#;
        assert!(FaqSet::from_json(raw).is_err());

        let raw = r#"[{"id":"a","question":"Q ?","answer_long":""}]"#;
        assert!(FaqSet::from_json(raw).is_err());
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let raw = r#"[{"id":"a","question":"Q ?"}]"#;
        let err = FaqSet::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("invalid FAQ dataset"));
    }
}
