#[cfg(test)]
#[path = "result_view_test.rs"]
mod tests;

use ratatui::prelude::Margin;
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
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::ScrollbarState;
use ratatui::widgets::Wrap;
use ratatui::Frame;

use crate::domain::models::Diagnosis;
use crate::domain::models::DiagnosisResult;

const MISSING_LABEL: &str = "N/A";
const NO_TREATMENT: &str = "No specific treatment recommendations available.";
const DEFAULT_NOT_FOUND: &str = "We could not determine a diagnosis based on your symptoms.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Framing {
    Success,
    Warning,
}

impl Framing {
    fn colour(&self) -> Color {
        match self {
            Framing::Success => return Color::Green,
            Framing::Warning => return Color::Yellow,
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Framing::Success => return "[ok]",
            Framing::Warning => return "[!]",
        }
    }
}

/// Display ready copy of a found diagnosis, placeholders already applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultDetails {
    pub pattern: String,
    pub diagnosis: String,
    pub treatment: Vec<String>,
    pub explanation: Vec<String>,
    pub lifestyle: Vec<String>,
    pub diet: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub contagious: Option<bool>,
}

impl From<&Diagnosis> for ResultDetails {
    fn from(diagnosis: &Diagnosis) -> ResultDetails {
        let mut treatment = diagnosis.treatment.clone();
        if treatment.is_empty() {
            treatment = vec![NO_TREATMENT.to_string()];
        }

        return ResultDetails {
            pattern: diagnosis
                .pattern
                .clone()
                .unwrap_or_else(|| return MISSING_LABEL.to_string()),
            diagnosis: diagnosis
                .diagnosis
                .clone()
                .unwrap_or_else(|| return MISSING_LABEL.to_string()),
            treatment,
            explanation: diagnosis.explanation.clone(),
            lifestyle: diagnosis.lifestyle.clone(),
            diet: diagnosis.diet.clone(),
            summary: diagnosis.summary.clone(),
            description: diagnosis.description.clone(),
            contagious: diagnosis.contagious,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultView {
    pub framing: Framing,
    pub title: String,
    pub message: String,
    pub details: Option<ResultDetails>,
    explanation_open: bool,
    scroll: u16,
}

fn heading(text: &str) -> Line<'static> {
    return Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
}

fn bullets(items: &[String]) -> Vec<Line<'static>> {
    return items
        .iter()
        .map(|item| return Line::from(format!("  - {item}")))
        .collect();
}

fn labelled(label: &str, value: &str) -> Line<'static> {
    return Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::from(value.to_string()),
    ]);
}

impl ResultView {
    pub fn new(result: &DiagnosisResult) -> ResultView {
        match result {
            DiagnosisResult::Found(diagnosis) => {
                return ResultView {
                    framing: Framing::Success,
                    title: "Diagnosis Complete".to_string(),
                    message: "Based on your symptoms, here is the analysis:".to_string(),
                    details: Some(ResultDetails::from(diagnosis)),
                    explanation_open: true,
                    scroll: 0,
                };
            }
            DiagnosisResult::NotFound(message) => {
                return ResultView {
                    framing: Framing::Warning,
                    title: "No Diagnosis Found".to_string(),
                    message: message
                        .clone()
                        .unwrap_or_else(|| return DEFAULT_NOT_FOUND.to_string()),
                    details: None,
                    explanation_open: true,
                    scroll: 0,
                };
            }
        }
    }

    pub fn explanation_open(&self) -> bool {
        return self.explanation_open;
    }

    pub fn toggle_explanation(&mut self) {
        self.explanation_open = !self.explanation_open;
    }

    pub fn scroll_position(&self) -> u16 {
        return self.scroll;
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = u16::try_from(self.lines().len().saturating_sub(1)).unwrap_or(u16::MAX);
        self.scroll = self.scroll.saturating_add(1).min(max);
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let accent = Style::default()
            .fg(self.framing.colour())
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} {}", self.framing.icon(), self.title),
                accent,
            )),
            Line::from(self.message.to_string()),
        ];

        let details = match &self.details {
            Some(details) => details,
            None => return lines,
        };

        lines.push(Line::from(""));
        lines.push(labelled("Pattern", &details.pattern));
        lines.push(labelled("Diagnosis", &details.diagnosis));
        if let Some(description) = &details.description {
            lines.push(labelled("About", description));
        }
        if let Some(contagious) = details.contagious {
            lines.push(labelled("Contagious", if contagious { "Yes" } else { "No" }));
        }

        lines.push(Line::from(""));
        lines.push(heading("Treatment:"));
        lines.extend(bullets(&details.treatment));

        let optional_sections = [("Lifestyle:", &details.lifestyle), ("Diet:", &details.diet)];
        for (title, items) in optional_sections {
            if items.is_empty() {
                continue;
            }
            lines.push(Line::from(""));
            lines.push(heading(title));
            lines.extend(bullets(items));
        }

        if let Some(summary) = &details.summary {
            lines.push(Line::from(""));
            lines.push(heading("Summary:"));
            lines.extend(summary.lines().map(|line| return Line::from(format!("  {line}"))));
        }

        if !details.explanation.is_empty() {
            lines.push(Line::from(""));
            if self.explanation_open {
                lines.push(heading("Explanation:"));
                lines.extend(bullets(&details.explanation));
            } else {
                lines.push(heading(&format!(
                    "Explanation: {} hidden, press e to show",
                    details.explanation.len()
                )));
            }
        }

        return lines;
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect) {
        let lines = self.lines();
        let mut scrollbar_state = ScrollbarState::new(lines.len()).position(self.scroll as usize);

        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            rect,
        );
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            rect.inner(&Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}
