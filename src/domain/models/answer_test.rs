use anyhow::Result;

use super::Answer;
use super::AnswerError;
use crate::domain::models::Cardinality;
use crate::domain::models::Question;
use crate::domain::models::QuestionId;

fn single_question() -> Question {
    return Question::new(
        QuestionId::Text("age_group".to_string()),
        "What is your age group?",
        Cardinality::Single,
        &["Child", "Adult", "Elderly"],
    );
}

fn multiple_question() -> Question {
    return Question::new(
        QuestionId::Text("appearance".to_string()),
        "What does the lesion look like?",
        Cardinality::Multiple,
        &["Circular", "Scaly / Flaky", "Swollen"],
    );
}

#[test]
fn it_serializes_single_answers_as_scalars() -> Result<()> {
    let answer = Answer::Single("Adult".to_string());
    assert_eq!(serde_json::to_string(&answer)?, r#""Adult""#);

    return Ok(());
}

#[test]
fn it_serializes_multiple_answers_as_arrays() -> Result<()> {
    let answer = Answer::Multiple(vec!["Circular".to_string(), "Swollen".to_string()]);
    assert_eq!(serde_json::to_string(&answer)?, r#"["Circular","Swollen"]"#);

    return Ok(());
}

#[test]
fn it_rejects_a_missing_answer() {
    let res = Answer::validate_pending(None, &single_question());
    assert_eq!(res, Err(AnswerError::Missing));
}

#[test]
fn it_rejects_an_empty_multiple_answer() {
    let answer = Answer::Multiple(vec![]);
    let res = Answer::validate_pending(Some(&answer), &multiple_question());
    assert_eq!(res, Err(AnswerError::EmptySelection));
}

#[test]
fn it_rejects_a_mismatched_shape() {
    let answer = Answer::Single("Circular".to_string());
    let res = answer.validate_for(&multiple_question());
    assert_eq!(res, Err(AnswerError::WrongCardinality(Cardinality::Multiple)));
}

#[test]
fn it_rejects_unknown_options() {
    let answer = Answer::Single("Teen".to_string());
    let res = answer.validate_for(&single_question());
    assert_eq!(res, Err(AnswerError::UnknownOption("Teen".to_string())));
}

#[test]
fn it_accepts_valid_answers() {
    let single = Answer::Single("Adult".to_string());
    assert_eq!(
        Answer::validate_pending(Some(&single), &single_question()),
        Ok(single.clone())
    );

    let multiple = Answer::Multiple(vec!["Swollen".to_string()]);
    assert!(multiple.validate_for(&multiple_question()).is_ok());
}

#[test]
fn it_formats_validation_messages() {
    insta::assert_snapshot!(AnswerError::Missing.to_string(), @"Please select an answer before continuing.");
    insta::assert_snapshot!(
        AnswerError::WrongCardinality(Cardinality::Single).to_string(),
        @"This question expects a single choice answer."
    );
}
