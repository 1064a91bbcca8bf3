#[cfg(test)]
#[path = "question_test.rs"]
mod tests;

use std::collections::HashSet;
use std::fmt;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::ServiceError;

/// Identifier the service assigned to a question. Echoed back verbatim on
/// submission, so numeric ids stay numeric on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(id) => return write!(f, "{id}"),
            QuestionId::Text(id) => return write!(f, "{id}"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Cardinality {
    Single,
    Multiple,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Question {
    pub fn new(id: QuestionId, prompt: &str, cardinality: Cardinality, options: &[&str]) -> Question {
        return Question {
            id,
            prompt: prompt.to_string(),
            cardinality,
            options: options.iter().map(|option| return option.to_string()).collect(),
            category: None,
        };
    }

    pub fn is_multiple(&self) -> bool {
        return self.cardinality == Cardinality::Multiple;
    }

    pub fn has_option(&self, label: &str) -> bool {
        return self.options.iter().any(|option| return option == label);
    }

    /// Options must be present and unique, otherwise answers can't be mapped
    /// back to a single control.
    pub fn ensure_well_formed(&self) -> Result<(), ServiceError> {
        if self.options.is_empty() {
            return Err(ServiceError::Malformed(format!(
                "question {} has no options",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for option in self.options.iter() {
            if !seen.insert(option.as_str()) {
                return Err(ServiceError::Malformed(format!(
                    "question {} repeats option '{option}'",
                    self.id
                )));
            }
        }

        return Ok(());
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProgressState {
    current: u32,
    total: u32,
}

impl ProgressState {
    pub fn new(current: u32, total: u32) -> Result<ProgressState, ServiceError> {
        if current == 0 || current > total {
            return Err(ServiceError::Malformed(format!(
                "progress {current} of {total} is out of range"
            )));
        }

        return Ok(ProgressState { current, total });
    }

    pub fn current(&self) -> u32 {
        return self.current;
    }

    pub fn total(&self) -> u32 {
        return self.total;
    }

    pub fn fraction(&self) -> f64 {
        return f64::from(self.current) / f64::from(self.total);
    }

    pub fn can_go_back(&self) -> bool {
        return self.current > 1;
    }
}

/// Outcome of asking the service for the active question. Running out of
/// questions is a regular answer, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionStep {
    Ask(Question, ProgressState),
    Finished,
}
