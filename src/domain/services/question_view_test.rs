use anyhow::Result;
use test_utils::lines_to_string;

use super::QuestionView;
use crate::domain::models::Answer;
use crate::domain::models::Cardinality;
use crate::domain::models::ProgressState;
use crate::domain::models::Question;
use crate::domain::models::QuestionId;

fn view(cardinality: Cardinality) -> Result<QuestionView> {
    let question = Question::new(
        QuestionId::Text("appearance".to_string()),
        "What does the lesion look like?",
        cardinality,
        &["Circular", "Scaly", "Swollen"],
    );

    return Ok(QuestionView::new(question, ProgressState::new(2, 5)?));
}

#[test]
fn it_has_no_single_answer_until_selected() -> Result<()> {
    let view = view(Cardinality::Single)?;
    assert_eq!(view.answer(), None);

    return Ok(());
}

#[test]
fn it_starts_multiple_answers_empty() -> Result<()> {
    let view = view(Cardinality::Multiple)?;
    assert_eq!(view.answer(), Some(Answer::Multiple(vec![])));

    return Ok(());
}

#[test]
fn it_replaces_single_selection() -> Result<()> {
    let mut view = view(Cardinality::Single)?;
    view.choose(0);
    view.choose(1);

    assert_eq!(view.answer(), Some(Answer::Single("Scaly".to_string())));
    assert!(!view.is_checked(0));
    assert!(view.is_checked(1));

    return Ok(());
}

#[test]
fn it_keeps_single_selection_when_chosen_twice() -> Result<()> {
    let mut view = view(Cardinality::Single)?;
    view.choose(2);
    view.choose(2);

    assert_eq!(view.answer(), Some(Answer::Single("Swollen".to_string())));

    return Ok(());
}

#[test]
fn it_recomputes_multiple_selection_from_toggles() -> Result<()> {
    let mut view = view(Cardinality::Multiple)?;
    view.choose(0);
    view.choose(2);
    view.choose(0);

    assert_eq!(
        view.answer(),
        Some(Answer::Multiple(vec!["Swollen".to_string()]))
    );

    return Ok(());
}

#[test]
fn it_orders_multiple_selection_by_option_order() -> Result<()> {
    let mut view = view(Cardinality::Multiple)?;
    view.choose(2);
    view.choose(0);

    assert_eq!(
        view.answer(),
        Some(Answer::Multiple(vec![
            "Circular".to_string(),
            "Swollen".to_string()
        ]))
    );

    return Ok(());
}

#[test]
fn it_ignores_out_of_range_choices() -> Result<()> {
    let mut view = view(Cardinality::Single)?;

    assert!(!view.choose(3));
    assert_eq!(view.answer(), None);

    return Ok(());
}

#[test]
fn it_moves_the_cursor_within_bounds() -> Result<()> {
    let mut view = view(Cardinality::Single)?;
    view.cursor_up();
    assert_eq!(view.cursor(), 0);

    view.cursor_down();
    view.cursor_down();
    view.cursor_down();
    assert_eq!(view.cursor(), 2);

    view.choose_cursor();
    assert_eq!(view.answer(), Some(Answer::Single("Swollen".to_string())));

    return Ok(());
}

#[test]
fn it_restores_a_previous_answer() -> Result<()> {
    let view = view(Cardinality::Multiple)?.with_answer(&Answer::Multiple(vec![
        "Scaly".to_string(),
        "Swollen".to_string(),
        "Gone".to_string(),
    ]));

    assert_eq!(
        view.answer(),
        Some(Answer::Multiple(vec![
            "Scaly".to_string(),
            "Swollen".to_string()
        ]))
    );
    assert_eq!(view.cursor(), 2);

    return Ok(());
}

#[test]
fn it_marks_single_selection() -> Result<()> {
    let mut view = view(Cardinality::Single)?;
    view.choose(1);

    insta::assert_snapshot!(lines_to_string(&view.option_lines()), @r###"
      1. ( ) Circular
    > 2. (*) Scaly
      3. ( ) Swollen
    "###);

    return Ok(());
}

#[test]
fn it_marks_multiple_selection() -> Result<()> {
    let mut view = view(Cardinality::Multiple)?;
    view.choose(0);
    view.choose(2);
    view.cursor_up();

    insta::assert_snapshot!(lines_to_string(&view.option_lines()), @r###"
      1. [x] Circular
    > 2. [ ] Scaly
      3. [x] Swollen
    "###);

    return Ok(());
}

#[test]
fn it_includes_the_category_and_prompt() -> Result<()> {
    let mut question = view(Cardinality::Multiple)?.question().clone();
    question.category = Some("Lesion Appearance".to_string());
    let view = QuestionView::new(question, ProgressState::new(1, 1)?);

    let text = lines_to_string(&view.lines());
    assert!(text.starts_with("Lesion Appearance\nWhat does the lesion look like?\nSelect all that apply."));
    assert!(!view.can_go_back());

    return Ok(());
}
