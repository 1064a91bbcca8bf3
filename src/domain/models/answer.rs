#[cfg(test)]
#[path = "answer_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Cardinality;
use super::Question;

/// A selection for one question. Serializes as a bare string or an array of
/// strings, which is what the service expects in `answer`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("Please select an answer before continuing.")]
    Missing,
    #[error("Please select at least one option before continuing.")]
    EmptySelection,
    #[error("This question expects a {0} choice answer.")]
    WrongCardinality(Cardinality),
    #[error("'{0}' is not one of the options for this question.")]
    UnknownOption(String),
}

impl Answer {
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Answer::Single(_) => return Cardinality::Single,
            Answer::Multiple(_) => return Cardinality::Multiple,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        match self {
            Answer::Single(label) => return vec![label.as_str()],
            Answer::Multiple(labels) => {
                return labels.iter().map(|label| return label.as_str()).collect();
            }
        }
    }

    /// Checks the answer is submittable for `question`: shape matches the
    /// cardinality, nothing empty, every label is an offered option.
    pub fn validate_for(&self, question: &Question) -> Result<(), AnswerError> {
        if self.cardinality() != question.cardinality {
            return Err(AnswerError::WrongCardinality(question.cardinality));
        }

        match self {
            Answer::Single(label) if label.is_empty() => return Err(AnswerError::Missing),
            Answer::Multiple(labels) if labels.is_empty() => {
                return Err(AnswerError::EmptySelection);
            }
            _ => (),
        }

        if let Some(unknown) = self.labels().into_iter().find(|l| return !question.has_option(l)) {
            return Err(AnswerError::UnknownOption(unknown.to_string()));
        }

        return Ok(());
    }

    /// Validation entry point for a pending selection that may not exist yet.
    pub fn validate_pending(
        pending: Option<&Answer>,
        question: &Question,
    ) -> Result<Answer, AnswerError> {
        let answer = pending.ok_or(AnswerError::Missing)?;
        answer.validate_for(question)?;

        return Ok(answer.clone());
    }
}
