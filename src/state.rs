use crate::questionnaire::{field_spec, InputKind, REGISTRY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Answer values
// ---------------------------------------------------------------------------

/// The value of one collected field. A tagged union rather than a stringly
/// map so the assembler can enumerate exactly what a cell may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Number(u32),
    Choice(String),
    Text(String),
    Unanswered,
}

impl AnswerValue {
    /// Flatten to one output cell. `Unanswered` becomes an empty cell.
    pub fn as_cell(&self) -> String {
        match self {
            AnswerValue::Number(n) => n.to_string(),
            AnswerValue::Choice(s) | AnswerValue::Text(s) => s.clone(),
            AnswerValue::Unanswered => String::new(),
        }
    }

    pub fn is_answered(&self) -> bool {
        !matches!(self, AnswerValue::Unanswered)
    }
}

// ---------------------------------------------------------------------------
// Response state
// ---------------------------------------------------------------------------

/// Session-scoped mapping from field name to answer. Created once with
/// defaults from the registry, mutated in place by the step that owns each
/// field, read wholesale at review. Navigation never resets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answers {
    values: BTreeMap<String, AnswerValue>,
}

impl Answers {
    pub fn new() -> Self {
        let mut answers = Answers {
            values: BTreeMap::new(),
        };
        answers.ensure_initialized();
        answers
    }

    /// Populate defaults for every registry field. Idempotent: fields that
    /// already hold a value are left alone.
    pub fn ensure_initialized(&mut self) {
        for spec in REGISTRY.iter() {
            self.values.entry(spec.name.clone()).or_insert_with(|| {
                match (spec.kind, spec.default_text) {
                    (_, Some(text)) => AnswerValue::Text(text.to_string()),
                    (InputKind::Text | InputKind::TextArea, None) => {
                        AnswerValue::Text(String::new())
                    }
                    _ => AnswerValue::Unanswered,
                }
            });
        }
    }

    /// Overwrite a field's value. Unknown field names are dropped with a
    /// warning — the widget lists are generated from the same registry, so
    /// this only fires on a presentation-layer bug.
    pub fn set(&mut self, field: &str, value: AnswerValue) {
        if field_spec(field).is_none() {
            tracing::warn!(field, "ignoring answer for unknown field");
            return;
        }
        self.values.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<&AnswerValue> {
        self.values.get(field)
    }

    /// The full mapping, for the assembler.
    pub fn all(&self) -> &BTreeMap<String, AnswerValue> {
        &self.values
    }

    pub fn answered_count(&self) -> usize {
        self.values.values().filter(|v| v.is_answered()).count()
    }
}

impl Default for Answers {
    fn default() -> Self {
        Answers::new()
    }
}
