use super::Answer;
use super::QuestionId;

/// Remote requests produced by the session reducer and executed, one at a
/// time, by the actions worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    StartSession(),
    FetchQuestion(),
    SubmitAnswer(QuestionId, Answer),
    ReplayHistory(Vec<(QuestionId, Answer)>),
    Diagnose(),
    ResetSession(),
}
