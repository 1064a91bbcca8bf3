use anyhow::Result;

use super::hints;
use super::progress_label;
use crate::domain::models::Cardinality;
use crate::domain::models::DiagnosisResult;
use crate::domain::models::ProgressState;
use crate::domain::models::Question;
use crate::domain::models::QuestionId;
use crate::domain::services::QuestionView;
use crate::domain::services::ResultView;
use crate::domain::services::Screen;
use crate::domain::services::SessionState;

fn on_question(current: u32) -> Result<SessionState> {
    let question = Question::new(
        QuestionId::Number(1),
        "Is the area itchy?",
        Cardinality::Single,
        &["Yes", "No"],
    );

    return Ok(SessionState {
        screen: Screen::Question(QuestionView::new(
            question,
            ProgressState::new(current, 7)?,
        )),
        ..SessionState::default()
    });
}

#[test]
fn it_labels_progress() -> Result<()> {
    assert_eq!(
        progress_label(ProgressState::new(3, 7)?),
        "Question 3 of 7"
    );

    return Ok(());
}

#[test]
fn it_hides_the_back_hint_on_the_first_question() -> Result<()> {
    insta::assert_snapshot!(hints(&on_question(1)?), @"Space/1-9 select | Enter next | r restart | q quit");
    insta::assert_snapshot!(hints(&on_question(2)?), @"Space/1-9 select | Enter next | b back | r restart | q quit");

    return Ok(());
}

#[test]
fn it_asks_for_a_resync_when_out_of_sync() -> Result<()> {
    let mut state = on_question(4)?;
    state.out_of_sync = true;

    assert!(hints(&state).starts_with("Ctrl+R resync | "));

    return Ok(());
}

#[test]
fn it_hints_landing_and_results() {
    assert_eq!(hints(&SessionState::default()), "Enter start | q quit");

    let state = SessionState {
        screen: Screen::Result(ResultView::new(&DiagnosisResult::NotFound(None))),
        ..SessionState::default()
    };
    assert_eq!(
        hints(&state),
        "e explanation | Up/Down scroll | Enter restart | q quit"
    );
}
