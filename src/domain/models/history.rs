#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use super::Answer;
use super::Question;
use super::QuestionId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub question: Question,
    pub answer: Answer,
}

impl HistoryEntry {
    pub fn new(question: Question, answer: Answer) -> HistoryEntry {
        return HistoryEntry { question, answer };
    }
}

/// Local ledger of answered steps. The service owns the real cursor; this is
/// what gets replayed when the client needs to rebuild it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        return self.entries.pop();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        return self.entries.last();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        return &self.entries;
    }

    /// Submissions in answer order, ready to be re-sent to a fresh session.
    pub fn submissions(&self) -> Vec<(QuestionId, Answer)> {
        return self
            .entries
            .iter()
            .map(|entry| return (entry.question.id.clone(), entry.answer.clone()))
            .collect();
    }
}
