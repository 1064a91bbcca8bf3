//! Session controller expressed as a pure reducer.
//!
//! `transition` consumes the current state and one event, and returns the
//! next state plus the remote requests to run. Requests are executed by the
//! actions worker, whose outcomes come back as events. Every user intent is
//! ignored while a request is in flight.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use super::QuestionView;
use super::ResultView;
use crate::domain::models::Action;
use crate::domain::models::Answer;
use crate::domain::models::DiagnosisResult;
use crate::domain::models::Event;
use crate::domain::models::History;
use crate::domain::models::HistoryEntry;
use crate::domain::models::QuestionStep;
use crate::domain::models::ServiceError;
use crate::domain::models::SubmitOutcome;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Question(QuestionView),
    Result(ResultView),
}

/// The user facing operation currently in flight. Follow-up requests of the
/// same operation (fetch after submit, diagnose after fetch) keep it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Start,
    Submit(HistoryEntry),
    Back { kept: History, popped: HistoryEntry },
    Resync,
    Reset,
}

impl Operation {
    fn failure_text(&self) -> &'static str {
        match self {
            Operation::Start => return "Failed to start diagnosis.",
            Operation::Submit(_) => return "Failed to submit answer.",
            Operation::Back { .. } => return "Failed to go back to the previous question.",
            Operation::Resync => return "Failed to resynchronise with the diagnosis service.",
            Operation::Reset => return "Failed to reset the session.",
        }
    }
}

/// Which response the state is waiting for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Awaiting {
    SessionStarted,
    Question,
    Submission,
    Replay,
    Diagnosis,
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pending {
    pub operation: Operation,
    pub awaiting: Awaiting,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn warning(text: &str) -> Notice {
        return Notice {
            kind: NoticeKind::Warning,
            text: text.to_string(),
        };
    }

    pub fn info(text: &str) -> Notice {
        return Notice {
            kind: NoticeKind::Info,
            text: text.to_string(),
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub screen: Screen,
    pub history: History,
    pub pending: Option<Pending>,
    pub notice: Option<Notice>,
    /// Set when the service advanced but the follow-up read failed, so the
    /// screen no longer matches the server cursor.
    pub out_of_sync: bool,
    pub should_quit: bool,
}

impl Default for SessionState {
    fn default() -> SessionState {
        return SessionState {
            screen: Screen::Landing,
            history: History::default(),
            pending: None,
            notice: None,
            out_of_sync: false,
            should_quit: false,
        };
    }
}

#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub actions: Vec<Action>,
}

impl TransitionResult {
    fn new(state: SessionState) -> TransitionResult {
        return TransitionResult {
            new_state: state,
            actions: vec![],
        };
    }

    fn with_action(mut self, action: Action) -> TransitionResult {
        self.actions.push(action);
        return self;
    }
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        return self.pending.is_some();
    }

    pub fn question_view(&self) -> Option<&QuestionView> {
        if let Screen::Question(view) = &self.screen {
            return Some(view);
        }

        return None;
    }

    pub fn result_view(&self) -> Option<&ResultView> {
        if let Screen::Result(view) = &self.screen {
            return Some(view);
        }

        return None;
    }

    fn begin(mut self, operation: Operation, awaiting: Awaiting, action: Action) -> TransitionResult {
        self.pending = Some(Pending {
            operation,
            awaiting,
        });

        return TransitionResult::new(self).with_action(action);
    }

    fn follow_up(mut self, awaiting: Awaiting, action: Action) -> TransitionResult {
        if let Some(pending) = self.pending.as_mut() {
            pending.awaiting = awaiting;
        }

        return TransitionResult::new(self).with_action(action);
    }

    fn fail(mut self, err: ServiceError) -> TransitionResult {
        let pending = self.pending.take();
        let text = match &pending {
            Some(pending) => pending.operation.failure_text(),
            None => "The diagnosis service failed.",
        };

        tracing::error!(error = ?err, pending = ?pending, "Session operation failed");
        self.notice = Some(Notice::warning(&format!(
            "{text} Please try again. ({err})"
        )));

        return TransitionResult::new(self);
    }

    /// Requests a new session. Only valid from the landing screen.
    pub fn start(self) -> TransitionResult {
        if self.screen != Screen::Landing {
            tracing::debug!("Ignoring start outside of the landing screen");
            return TransitionResult::new(self);
        }

        return self.begin(
            Operation::Start,
            Awaiting::SessionStarted,
            Action::StartSession(),
        );
    }

    /// Asks for the active question on its own, outside of any other flow.
    pub fn fetch_current_question(self) -> TransitionResult {
        return self.begin(Operation::Resync, Awaiting::Question, Action::FetchQuestion());
    }

    /// Validates the pending answer locally, then sends it.
    pub fn submit(mut self) -> TransitionResult {
        let snapshot = self
            .question_view()
            .map(|view| return (view.question().clone(), view.answer()));
        let (question, pending_answer) = match snapshot {
            Some(snapshot) => snapshot,
            None => return TransitionResult::new(self),
        };

        if self.out_of_sync {
            self.notice = Some(Notice::warning(
                "This question may be out of date. Press Ctrl+R to resynchronise before continuing.",
            ));
            return TransitionResult::new(self);
        }

        let answer = match Answer::validate_pending(pending_answer.as_ref(), &question) {
            Ok(answer) => answer,
            Err(err) => {
                tracing::debug!(error = ?err, question = %question.id, "Rejected answer");
                self.notice = Some(Notice::warning(&err.to_string()));
                return TransitionResult::new(self);
            }
        };

        let action = Action::SubmitAnswer(question.id.clone(), answer.clone());
        return self.begin(
            Operation::Submit(HistoryEntry::new(question, answer)),
            Awaiting::Submission,
            action,
        );
    }

    /// Drops the newest history entry and rebuilds the server cursor by
    /// replaying what is left against a fresh session. The history is only
    /// committed once the replay succeeded.
    pub fn go_back(self) -> TransitionResult {
        let can_go_back = match &self.screen {
            Screen::Question(view) => view.can_go_back(),
            _ => false,
        };
        if !can_go_back || self.history.is_empty() {
            return TransitionResult::new(self);
        }

        let mut kept = self.history.clone();
        let popped = match kept.pop() {
            Some(entry) => entry,
            None => return TransitionResult::new(self),
        };

        let action = Action::ReplayHistory(kept.submissions());
        return self.begin(Operation::Back { kept, popped }, Awaiting::Replay, action);
    }

    /// Refreshes the question screen. When the screen is out of sync the
    /// whole local history is replayed first so the server cursor matches it.
    pub fn resync(self) -> TransitionResult {
        if self.question_view().is_none() {
            return TransitionResult::new(self);
        }

        if !self.out_of_sync {
            return self.fetch_current_question();
        }

        let action = Action::ReplayHistory(self.history.submissions());
        return self.begin(Operation::Resync, Awaiting::Replay, action);
    }

    pub fn reset(self) -> TransitionResult {
        if self.screen == Screen::Landing {
            return TransitionResult::new(self);
        }

        return self.begin(Operation::Reset, Awaiting::Reset, Action::ResetSession());
    }

    fn on_session_started(mut self, res: Result<(), ServiceError>) -> TransitionResult {
        if let Err(err) = res {
            return self.fail(err);
        }

        self.history.clear();
        self.out_of_sync = false;
        return self.follow_up(Awaiting::Question, Action::FetchQuestion());
    }

    fn on_question_loaded(mut self, res: Result<QuestionStep, ServiceError>) -> TransitionResult {
        let step = match res {
            Ok(step) => step,
            Err(err) => {
                if self.server_moved() {
                    self.out_of_sync = true;
                }
                return self.fail(err);
            }
        };

        let (question, progress) = match step {
            QuestionStep::Finished => {
                return self.follow_up(Awaiting::Diagnosis, Action::Diagnose());
            }
            QuestionStep::Ask(question, progress) => (question, progress),
        };

        let mut view = QuestionView::new(question, progress);
        if let Some(Pending {
            operation: Operation::Back { popped, .. },
            ..
        }) = &self.pending
        {
            if popped.question.id == view.question().id {
                view = view.with_answer(&popped.answer);
            }
        }

        self.pending = None;
        self.out_of_sync = false;
        self.screen = Screen::Question(view);

        return TransitionResult::new(self);
    }

    fn on_answer_submitted(mut self, res: Result<SubmitOutcome, ServiceError>) -> TransitionResult {
        let outcome = match res {
            Ok(outcome) => outcome,
            Err(err) => return self.fail(err),
        };

        if let Some(Pending {
            operation: Operation::Submit(entry),
            ..
        }) = &self.pending
        {
            self.history.push(entry.clone());
        }

        if outcome.finished {
            return self.follow_up(Awaiting::Diagnosis, Action::Diagnose());
        }

        return self.follow_up(Awaiting::Question, Action::FetchQuestion());
    }

    fn on_history_replayed(mut self, res: Result<(), ServiceError>) -> TransitionResult {
        if let Err(err) = res {
            // The replay starts with a fresh session, so the server cursor is
            // unknown after a failure.
            self.out_of_sync = true;
            return self.fail(err);
        }

        if let Some(Pending {
            operation: Operation::Back { kept, .. },
            ..
        }) = &self.pending
        {
            self.history = kept.clone();
        }

        return self.follow_up(Awaiting::Question, Action::FetchQuestion());
    }

    fn on_diagnosed(mut self, res: Result<DiagnosisResult, ServiceError>) -> TransitionResult {
        let result = match res {
            Ok(result) => result,
            Err(err) => {
                if self.server_moved() {
                    self.out_of_sync = true;
                }
                return self.fail(err);
            }
        };

        self.pending = None;
        self.out_of_sync = false;
        self.screen = Screen::Result(ResultView::new(&result));

        return TransitionResult::new(self);
    }

    fn on_session_reset(self, res: Result<(), ServiceError>) -> TransitionResult {
        if let Err(err) = res {
            tracing::warn!(error = ?err, "Reset failed, returning to landing anyway");
        }

        return TransitionResult::new(SessionState::default());
    }

    /// Whether the in-flight operation already changed the server cursor.
    fn server_moved(&self) -> bool {
        match &self.pending {
            Some(Pending {
                operation: Operation::Submit(_),
                ..
            }) => return true,
            Some(Pending {
                operation: Operation::Back { .. },
                ..
            }) => return true,
            Some(Pending {
                operation: Operation::Resync,
                awaiting: Awaiting::Diagnosis,
            }) => return true,
            _ => return false,
        }
    }

    fn expects(&self, awaiting: Awaiting) -> bool {
        return self
            .pending
            .as_ref()
            .map(|pending| return pending.awaiting == awaiting)
            .unwrap_or(false);
    }

    fn on_user_intent(mut self, event: Event) -> TransitionResult {
        self.notice = None;

        match event {
            Event::KeyboardEnter() => match self.screen {
                Screen::Landing => return self.start(),
                Screen::Question(_) => return self.submit(),
                Screen::Result(_) => return self.reset(),
            },
            Event::KeyboardBack() => return self.go_back(),
            Event::KeyboardCTRLR() => return self.resync(),
            Event::KeyboardRestart() => return self.reset(),
            Event::KeyboardSpace() => {
                if let Screen::Question(view) = &mut self.screen {
                    view.choose_cursor();
                }
            }
            Event::KeyboardDigit(n) => {
                if let Screen::Question(view) = &mut self.screen {
                    if n == 0 || !view.choose(n - 1) {
                        self.notice = Some(Notice::info(&format!("There is no option {n}.")));
                    }
                }
            }
            Event::KeyboardToggleDetails() => {
                if let Screen::Result(view) = &mut self.screen {
                    view.toggle_explanation();
                }
            }
            Event::UIScrollUp() => match &mut self.screen {
                Screen::Question(view) => view.cursor_up(),
                Screen::Result(view) => view.scroll_up(),
                Screen::Landing => (),
            },
            Event::UIScrollDown() => match &mut self.screen {
                Screen::Question(view) => view.cursor_down(),
                Screen::Result(view) => view.scroll_down(),
                Screen::Landing => (),
            },
            _ => (),
        }

        return TransitionResult::new(self);
    }
}

/// Applies one event to the session state.
pub fn transition(mut state: SessionState, event: Event) -> TransitionResult {
    match event {
        Event::KeyboardCTRLC() | Event::KeyboardQuit() => {
            state.should_quit = true;
            return TransitionResult::new(state);
        }
        Event::UITick() | Event::UIResize() => return TransitionResult::new(state),

        Event::SessionStarted(res) if state.expects(Awaiting::SessionStarted) => {
            return state.on_session_started(res);
        }
        Event::QuestionLoaded(res) if state.expects(Awaiting::Question) => {
            return state.on_question_loaded(res);
        }
        Event::AnswerSubmitted(res) if state.expects(Awaiting::Submission) => {
            return state.on_answer_submitted(res);
        }
        Event::HistoryReplayed(res) if state.expects(Awaiting::Replay) => {
            return state.on_history_replayed(res);
        }
        Event::Diagnosed(res) if state.expects(Awaiting::Diagnosis) => {
            return state.on_diagnosed(res);
        }
        Event::SessionReset(res) if state.expects(Awaiting::Reset) => {
            return state.on_session_reset(res);
        }
        Event::SessionStarted(_)
        | Event::QuestionLoaded(_)
        | Event::AnswerSubmitted(_)
        | Event::HistoryReplayed(_)
        | Event::Diagnosed(_)
        | Event::SessionReset(_) => {
            tracing::warn!(event = ?event, pending = ?state.pending, "Dropping unexpected response");
            return TransitionResult::new(state);
        }

        _ if state.is_loading() => {
            tracing::debug!(event = ?event, "Ignoring input while loading");
            return TransitionResult::new(state);
        }
        _ => return state.on_user_intent(event),
    }
}
