#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Answer;
use crate::domain::models::Event;
use crate::domain::models::QuestionId;
use crate::domain::models::ServiceBox;
use crate::domain::models::ServiceError;

fn logged<T>(operation: &str, res: Result<T, ServiceError>) -> Result<T, ServiceError> {
    if let Err(err) = &res {
        tracing::warn!(error = ?err, operation, "Diagnosis service call failed");
    }

    return res;
}

/// Rebuilds the server cursor from scratch: a fresh session, then every kept
/// answer re-submitted in order.
async fn replay_history(
    service: &ServiceBox,
    submissions: &[(QuestionId, Answer)],
) -> Result<(), ServiceError> {
    service.start().await?;

    for (idx, (question_id, answer)) in submissions.iter().enumerate() {
        let outcome = service.submit_answer(question_id, answer).await?;
        if outcome.finished && idx + 1 < submissions.len() {
            return Err(ServiceError::Malformed(format!(
                "questionnaire finished after {} of {} replayed answers",
                idx + 1,
                submissions.len()
            )));
        }
    }

    return Ok(());
}

/// Runs one remote request and wraps its outcome as the matching event.
pub async fn execute(service: &ServiceBox, action: Action) -> Event {
    tracing::debug!(action = ?action, "Executing action");

    match action {
        Action::StartSession() => {
            return Event::SessionStarted(logged("start", service.start().await));
        }
        Action::FetchQuestion() => {
            return Event::QuestionLoaded(logged(
                "current_question",
                service.current_question().await,
            ));
        }
        Action::SubmitAnswer(question_id, answer) => {
            return Event::AnswerSubmitted(logged(
                "submit_answer",
                service.submit_answer(&question_id, &answer).await,
            ));
        }
        Action::ReplayHistory(submissions) => {
            return Event::HistoryReplayed(logged(
                "replay_history",
                replay_history(service, &submissions).await,
            ));
        }
        Action::Diagnose() => {
            return Event::Diagnosed(logged("diagnose", service.diagnose().await));
        }
        Action::ResetSession() => {
            return Event::SessionReset(logged("reset", service.reset().await));
        }
    }
}

pub struct ActionsService {}

impl ActionsService {
    /// Executes actions strictly in the order they arrive, one at a time.
    /// Returns once every sender has been dropped.
    pub async fn start(
        service: ServiceBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            let event = execute(&service, action).await;
            tx.send(event)?;
        }

        tracing::debug!("Action channel closed, stopping worker");
        return Ok(());
    }
}
