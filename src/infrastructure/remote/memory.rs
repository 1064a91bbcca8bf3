//! In-process stand-in for the questionnaire service. It keeps the same
//! session rules as the real one: `start` wipes the session, submissions
//! advance a single cursor, and `diagnose` refuses to run without answers.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::models::Answer;
use crate::domain::models::Cardinality;
use crate::domain::models::Diagnosis;
use crate::domain::models::DiagnosisResult;
use crate::domain::models::DiagnosisService;
use crate::domain::models::ProgressState;
use crate::domain::models::Question;
use crate::domain::models::QuestionId;
use crate::domain::models::QuestionStep;
use crate::domain::models::ServiceError;
use crate::domain::models::SubmitOutcome;

#[derive(Default)]
struct MemoryState {
    cursor: usize,
    answers: Vec<(QuestionId, Answer)>,
    calls: Vec<String>,
    failures: VecDeque<(String, ServiceError)>,
}

/// Cloning shares the session, so a test can keep a handle for inspection
/// while the boxed copy is driven by the worker.
#[derive(Clone)]
pub struct MemoryService {
    questions: Arc<Vec<Question>>,
    state: Arc<Mutex<MemoryState>>,
}

impl Default for MemoryService {
    fn default() -> MemoryService {
        let mut age = Question::new(
            QuestionId::Text("age_group".to_string()),
            "What is the patient's age group?",
            Cardinality::Single,
            &["Child", "Adult", "Elderly"],
        );
        age.category = Some("Patient Profile".to_string());

        let mut appearance = Question::new(
            QuestionId::Text("appearance".to_string()),
            "What does the lesion look like?",
            Cardinality::Multiple,
            &["Circular", "Scaly", "Swollen"],
        );
        appearance.category = Some("Lesion Appearance".to_string());

        let itching = Question::new(
            QuestionId::Number(3),
            "Is the area itchy?",
            Cardinality::Single,
            &["Yes", "No"],
        );

        return MemoryService::new(vec![age, appearance, itching]);
    }
}

impl MemoryService {
    pub fn new(questions: Vec<Question>) -> MemoryService {
        return MemoryService {
            questions: Arc::new(questions),
            state: Arc::new(Mutex::new(MemoryState::default())),
        };
    }

    /// Makes the next call to `operation` fail with `err`.
    pub fn fail_next(&self, operation: &str, err: ServiceError) {
        self.lock()
            .failures
            .push_back((operation.to_string(), err));
    }

    pub fn answers(&self) -> Vec<(QuestionId, Answer)> {
        return self.lock().answers.clone();
    }

    pub fn calls(&self) -> Vec<String> {
        return self.lock().calls.clone();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        return self
            .state
            .lock()
            .unwrap_or_else(|poisoned| return poisoned.into_inner());
    }

    fn record(&self, operation: &str) -> Result<(), ServiceError> {
        let mut state = self.lock();
        state.calls.push(operation.to_string());

        let failure = state
            .failures
            .iter()
            .position(|(name, _)| return name == operation);
        if let Some(idx) = failure {
            if let Some((_, err)) = state.failures.remove(idx) {
                return Err(err);
            }
        }

        return Ok(());
    }
}

#[async_trait]
impl DiagnosisService for MemoryService {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<(), ServiceError> {
        return self.record("health_check");
    }

    #[allow(clippy::implicit_return)]
    async fn start(&self) -> Result<(), ServiceError> {
        self.record("start")?;

        let mut state = self.lock();
        state.cursor = 0;
        state.answers.clear();
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn current_question(&self) -> Result<QuestionStep, ServiceError> {
        self.record("current_question")?;

        let cursor = self.lock().cursor;
        let question = match self.questions.get(cursor) {
            Some(question) => question.clone(),
            None => return Ok(QuestionStep::Finished),
        };

        let total = u32::try_from(self.questions.len())
            .map_err(|err| return ServiceError::Malformed(err.to_string()))?;
        let current = u32::try_from(cursor + 1)
            .map_err(|err| return ServiceError::Malformed(err.to_string()))?;

        return Ok(QuestionStep::Ask(question, ProgressState::new(current, total)?));
    }

    #[allow(clippy::implicit_return)]
    async fn submit_answer(
        &self,
        question_id: &QuestionId,
        answer: &Answer,
    ) -> Result<SubmitOutcome, ServiceError> {
        self.record("submit_answer")?;

        let mut state = self.lock();
        state.answers.retain(|(id, _)| return id != question_id);
        state.answers.push((question_id.clone(), answer.clone()));
        state.cursor += 1;

        return Ok(SubmitOutcome {
            finished: state.cursor >= self.questions.len(),
        });
    }

    #[allow(clippy::implicit_return)]
    async fn diagnose(&self) -> Result<DiagnosisResult, ServiceError> {
        self.record("diagnose")?;

        let state = self.lock();
        if state.answers.is_empty() {
            return Ok(DiagnosisResult::NotFound(Some(
                "No answers found. Please start again.".to_string(),
            )));
        }

        let explanation = state
            .answers
            .iter()
            .map(|(id, answer)| return format!("{id} = {}", answer.labels().join(", ")))
            .collect();

        return Ok(DiagnosisResult::Found(Diagnosis {
            pattern: Some("Fungal".to_string()),
            diagnosis: Some("Tinea Corporis".to_string()),
            treatment: vec!["Topical antifungal".to_string()],
            explanation,
            ..Diagnosis::default()
        }));
    }

    #[allow(clippy::implicit_return)]
    async fn reset(&self) -> Result<(), ServiceError> {
        self.record("reset")?;

        let mut state = self.lock();
        state.cursor = 0;
        state.answers.clear();
        return Ok(());
    }
}
