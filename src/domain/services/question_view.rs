#[cfg(test)]
#[path = "question_view_test.rs"]
mod tests;

use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;

use crate::domain::models::Answer;
use crate::domain::models::ProgressState;
use crate::domain::models::Question;

/// Input controls for one question. The checked flags are the only source of
/// truth: both the pending answer and the rendered marks are derived from
/// them, so they can never disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionView {
    question: Question,
    progress: ProgressState,
    checked: Vec<bool>,
    cursor: usize,
}

impl QuestionView {
    pub fn new(question: Question, progress: ProgressState) -> QuestionView {
        let checked = vec![false; question.options.len()];
        return QuestionView {
            question,
            progress,
            checked,
            cursor: 0,
        };
    }

    /// Restores a previous selection, used when stepping back onto a question
    /// that was already answered. Labels that are no longer offered are
    /// skipped.
    pub fn with_answer(mut self, answer: &Answer) -> QuestionView {
        let labels = answer.labels();
        for (idx, option) in self.question.options.iter().enumerate() {
            if labels.contains(&option.as_str()) {
                if !self.question.is_multiple() {
                    self.checked.iter_mut().for_each(|flag| *flag = false);
                }
                self.checked[idx] = true;
                self.cursor = idx;
            }
        }

        return self;
    }

    pub fn question(&self) -> &Question {
        return &self.question;
    }

    pub fn progress(&self) -> ProgressState {
        return self.progress;
    }

    pub fn cursor(&self) -> usize {
        return self.cursor;
    }

    pub fn can_go_back(&self) -> bool {
        return self.progress.can_go_back();
    }

    pub fn is_checked(&self, idx: usize) -> bool {
        return self.checked.get(idx).copied().unwrap_or(false);
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.checked.len() {
            self.cursor += 1;
        }
    }

    /// Single choice: exclusively selects `idx`. Multiple choice: toggles it.
    /// Out of range indexes are ignored and reported as `false`.
    pub fn choose(&mut self, idx: usize) -> bool {
        if idx >= self.checked.len() {
            return false;
        }

        if self.question.is_multiple() {
            self.checked[idx] = !self.checked[idx];
        } else {
            for (pos, flag) in self.checked.iter_mut().enumerate() {
                *flag = pos == idx;
            }
        }

        self.cursor = idx;
        return true;
    }

    pub fn choose_cursor(&mut self) -> bool {
        return self.choose(self.cursor);
    }

    /// Recomputed from scratch on every call. Multiple choice questions always
    /// have an answer (possibly empty), single choice ones only once something
    /// is selected.
    pub fn answer(&self) -> Option<Answer> {
        let labels: Vec<String> = self
            .question
            .options
            .iter()
            .zip(self.checked.iter())
            .filter(|(_, checked)| return **checked)
            .map(|(option, _)| return option.to_string())
            .collect();

        if self.question.is_multiple() {
            return Some(Answer::Multiple(labels));
        }

        return labels.into_iter().next().map(Answer::Single);
    }

    pub fn option_lines(&self) -> Vec<Line<'static>> {
        return self
            .question
            .options
            .iter()
            .enumerate()
            .map(|(idx, option)| {
                let checked = self.is_checked(idx);
                let pointer = if idx == self.cursor { ">" } else { " " };
                let mark = match (self.question.is_multiple(), checked) {
                    (true, true) => "[x]",
                    (true, false) => "[ ]",
                    (false, true) => "(*)",
                    (false, false) => "( )",
                };

                let mut style = Style::default();
                if checked {
                    style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
                }
                if idx == self.cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }

                return Line::from(vec![
                    Span::from(format!("{pointer} {}. ", idx + 1)),
                    Span::styled(format!("{mark} {option}"), style),
                ]);
            })
            .collect();
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![];
        if let Some(category) = &self.question.category {
            lines.push(Line::from(Span::styled(
                category.to_string(),
                Style::default().fg(Color::DarkGray),
            )));
        }

        lines.push(Line::from(Span::styled(
            self.question.prompt.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        let hint = if self.question.is_multiple() {
            "Select all that apply."
        } else {
            "Select one."
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
        lines.extend(self.option_lines());

        return lines;
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect) {
        frame.render_widget(
            Paragraph::new(self.lines())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .wrap(Wrap { trim: false }),
            rect,
        );
    }
}
