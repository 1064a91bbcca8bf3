use async_trait::async_trait;

use super::Answer;
use super::DiagnosisResult;
use super::QuestionId;
use super::QuestionStep;

/// Failures talking to the diagnosis service. Cloneable so outcomes can be
/// handed back to the UI as plain events.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("unable to reach the diagnosis service: {0}")]
    Transport(String),
    #[error("the diagnosis service responded with status {0}")]
    Status(u16),
    #[error("the diagnosis service rejected the request: {0}")]
    Rejected(String),
    #[error("the diagnosis service sent an unexpected response: {0}")]
    Malformed(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub finished: bool,
}

#[async_trait]
pub trait DiagnosisService {
    /// Used by `triage health` to verify the service is reachable before a
    /// session is attempted.
    async fn health_check(&self) -> Result<(), ServiceError>;

    /// Allocates a fresh server side session, discarding any previous one.
    async fn start(&self) -> Result<(), ServiceError>;

    /// Returns the active question, or `QuestionStep::Finished` once every
    /// question has been answered.
    async fn current_question(&self) -> Result<QuestionStep, ServiceError>;

    async fn submit_answer(
        &self,
        question_id: &QuestionId,
        answer: &Answer,
    ) -> Result<SubmitOutcome, ServiceError>;

    async fn diagnose(&self) -> Result<DiagnosisResult, ServiceError>;

    async fn reset(&self) -> Result<(), ServiceError>;
}

pub type ServiceBox = Box<dyn DiagnosisService + Send + Sync>;
