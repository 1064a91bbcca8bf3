use super::DiagnosisResult;
use super::QuestionStep;
use super::ServiceError;
use super::SubmitOutcome;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    KeyboardBack(),
    KeyboardCTRLC(),
    KeyboardCTRLR(),
    KeyboardDigit(usize),
    KeyboardEnter(),
    KeyboardQuit(),
    KeyboardRestart(),
    KeyboardSpace(),
    KeyboardToggleDetails(),
    UIResize(),
    UIScrollDown(),
    UIScrollUp(),
    UITick(),

    SessionStarted(Result<(), ServiceError>),
    QuestionLoaded(Result<QuestionStep, ServiceError>),
    AnswerSubmitted(Result<SubmitOutcome, ServiceError>),
    HistoryReplayed(Result<(), ServiceError>),
    Diagnosed(Result<DiagnosisResult, ServiceError>),
    SessionReset(Result<(), ServiceError>),
}
