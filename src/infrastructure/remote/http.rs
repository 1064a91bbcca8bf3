#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Answer;
use crate::domain::models::DiagnosisPayload;
use crate::domain::models::DiagnosisResult;
use crate::domain::models::DiagnosisService;
use crate::domain::models::ProgressState;
use crate::domain::models::Question;
use crate::domain::models::QuestionId;
use crate::domain::models::QuestionStep;
use crate::domain::models::ServiceError;
use crate::domain::models::SubmitOutcome;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AckResponse {
    success: Option<bool>,
    finished: Option<bool>,
    message: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct QuestionResponse {
    finished: Option<bool>,
    question: Option<Question>,
    current: Option<u32>,
    total: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    question_id: &'a QuestionId,
    answer: &'a Answer,
}

impl AckResponse {
    /// Start, submit and reset all report `success`; anything but `true`
    /// means the service refused the request.
    fn ensure_success(&self, endpoint: &str) -> Result<(), ServiceError> {
        match self.success {
            Some(true) => return Ok(()),
            Some(false) => {
                let reason = self
                    .message
                    .clone()
                    .unwrap_or_else(|| return "no reason given".to_string());
                return Err(ServiceError::Rejected(reason));
            }
            None => {
                return Err(ServiceError::Malformed(format!(
                    "{endpoint} response has no 'success' field"
                )));
            }
        }
    }
}

impl QuestionResponse {
    fn into_step(self) -> Result<QuestionStep, ServiceError> {
        let finished = self.finished.ok_or_else(|| {
            return ServiceError::Malformed("question response has no 'finished' field".to_string());
        })?;
        if finished {
            return Ok(QuestionStep::Finished);
        }

        let question = self.question.ok_or_else(|| {
            return ServiceError::Malformed("question response has no 'question' field".to_string());
        })?;
        question.ensure_well_formed()?;

        let (current, total) = match (self.current, self.total) {
            (Some(current), Some(total)) => (current, total),
            _ => {
                return Err(ServiceError::Malformed(
                    "question response has no progress".to_string(),
                ));
            }
        };

        return Ok(QuestionStep::Ask(question, ProgressState::new(current, total)?));
    }
}

fn transport(err: reqwest::Error) -> ServiceError {
    return ServiceError::Transport(err.to_string());
}

async fn read_json<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ServiceError> {
    let status = res.status();
    if !status.is_success() {
        tracing::error!(status = status.as_u16(), url = %res.url(), "Diagnosis service returned an error status");
        return Err(ServiceError::Status(status.as_u16()));
    }

    let body = res.bytes().await.map_err(transport)?;
    return serde_json::from_slice::<T>(&body).map_err(|err| {
        tracing::error!(error = ?err, "Failed to decode diagnosis service response");
        return ServiceError::Malformed(err.to_string());
    });
}

/// Talks to the questionnaire service over HTTP. The service keeps the
/// session behind a cookie, so one client (and its cookie jar) is reused for
/// every request.
pub struct HttpService {
    url: String,
    client: reqwest::Client,
}

impl HttpService {
    pub fn new(url: &str, timeout: Duration) -> Result<HttpService> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;

        return Ok(HttpService {
            url: url.trim_end_matches('/').to_string(),
            client,
        });
    }

    pub fn from_config() -> Result<HttpService> {
        let timeout = Config::get(ConfigKey::RequestTimeout).parse::<u64>()?;
        return HttpService::new(
            &Config::get(ConfigKey::ServiceURL),
            Duration::from_millis(timeout),
        );
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{url}{path}", url = self.url);
    }

    async fn post_ack(&self, path: &str) -> Result<AckResponse, ServiceError> {
        tracing::debug!(path, "POST");
        let res = self
            .client
            .post(self.endpoint(path))
            .send()
            .await
            .map_err(transport)?;

        let ack = read_json::<AckResponse>(res).await?;
        ack.ensure_success(path)?;

        return Ok(ack);
    }
}

#[async_trait]
impl DiagnosisService for HttpService {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<(), ServiceError> {
        let res = self
            .client
            .get(self.endpoint("/"))
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, "Diagnosis service is not running");
                return transport(err);
            })?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Diagnosis service health check failed");
            return Err(ServiceError::Status(res.status().as_u16()));
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn start(&self) -> Result<(), ServiceError> {
        self.post_ack("/start").await?;
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn current_question(&self) -> Result<QuestionStep, ServiceError> {
        tracing::debug!(path = "/get-question", "GET");
        let res = self
            .client
            .get(self.endpoint("/get-question"))
            .send()
            .await
            .map_err(transport)?;

        return read_json::<QuestionResponse>(res).await?.into_step();
    }

    #[allow(clippy::implicit_return)]
    async fn submit_answer(
        &self,
        question_id: &QuestionId,
        answer: &Answer,
    ) -> Result<SubmitOutcome, ServiceError> {
        tracing::debug!(question = %question_id, answer = ?answer, "POST /submit-answer");
        let res = self
            .client
            .post(self.endpoint("/submit-answer"))
            .json(&SubmitRequest {
                question_id,
                answer,
            })
            .send()
            .await
            .map_err(transport)?;

        let ack = read_json::<AckResponse>(res).await?;
        ack.ensure_success("/submit-answer")?;

        let finished = ack.finished.ok_or_else(|| {
            return ServiceError::Malformed(
                "/submit-answer response has no 'finished' field".to_string(),
            );
        })?;

        return Ok(SubmitOutcome { finished });
    }

    #[allow(clippy::implicit_return)]
    async fn diagnose(&self) -> Result<DiagnosisResult, ServiceError> {
        tracing::debug!(path = "/diagnose", "POST");
        let res = self
            .client
            .post(self.endpoint("/diagnose"))
            .send()
            .await
            .map_err(transport)?;

        return read_json::<DiagnosisPayload>(res).await?.into_result();
    }

    #[allow(clippy::implicit_return)]
    async fn reset(&self) -> Result<(), ServiceError> {
        self.post_ack("/reset").await?;
        return Ok(());
    }
}
