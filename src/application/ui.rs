#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Gauge;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::ProgressState;
use crate::domain::services::events::EventsService;
use crate::domain::services::transition;
use crate::domain::services::NoticeKind;
use crate::domain::services::Screen;
use crate::domain::services::SessionState;

/// Key hints for the footer. The back hint only shows once there is a
/// previous question to return to.
pub fn hints(state: &SessionState) -> String {
    let hints: Vec<&str> = match &state.screen {
        Screen::Landing => vec!["Enter start", "q quit"],
        Screen::Question(view) => {
            let mut hints = vec![];
            if state.out_of_sync {
                hints.push("Ctrl+R resync");
            }
            hints.push("Space/1-9 select");
            hints.push("Enter next");
            if view.can_go_back() {
                hints.push("b back");
            }
            hints.push("r restart");
            hints.push("q quit");
            hints
        }
        Screen::Result(_) => vec!["e explanation", "Up/Down scroll", "Enter restart", "q quit"],
    };

    return hints.join(" | ");
}

pub fn progress_label(progress: ProgressState) -> String {
    return format!(
        "Question {} of {}",
        progress.current(),
        progress.total()
    );
}

fn landing_lines(service_url: &str) -> Vec<Line<'static>> {
    return vec![
        Line::from(Span::styled(
            "Diagnosis questionnaire",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("You will be asked one question at a time about your symptoms."),
        Line::from("You can step back to change an earlier answer before the diagnosis is made."),
        Line::from(""),
        Line::from(Span::styled(
            format!("Service: {service_url}"),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from("Press Enter to start."),
    ];
}

fn render_status(frame: &mut Frame, rect: Rect, state: &SessionState) {
    let line = match &state.notice {
        Some(notice) => {
            let colour = match notice.kind {
                NoticeKind::Warning => Color::Yellow,
                NoticeKind::Info => Color::Cyan,
            };
            Line::from(Span::styled(
                notice.text.to_string(),
                Style::default().fg(colour),
            ))
        }
        None => Line::from(""),
    };

    frame.render_widget(Paragraph::new(line), rect);
}

fn render(frame: &mut Frame, state: &SessionState, loading: &Loading, service_url: &str) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let header = Block::default()
        .borders(Borders::ALL)
        .title(" Triage ")
        .padding(Padding::new(1, 1, 0, 0));

    match &state.screen {
        Screen::Landing => {
            frame.render_widget(
                Paragraph::new("Answer the questions, then read the diagnosis.").block(header),
                layout[0],
            );
            frame.render_widget(
                Paragraph::new(landing_lines(service_url))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .padding(Padding::new(1, 1, 0, 0)),
                    )
                    .wrap(Wrap { trim: false }),
                layout[1],
            );
        }
        Screen::Question(view) => {
            frame.render_widget(
                Gauge::default()
                    .block(header)
                    .gauge_style(Style::default().fg(Color::Cyan))
                    .ratio(view.progress().fraction())
                    .label(progress_label(view.progress())),
                layout[0],
            );
            view.render(frame, layout[1]);
        }
        Screen::Result(view) => {
            frame.render_widget(Paragraph::new("Results").block(header), layout[0]);
            view.render(frame, layout[1]);
        }
    }

    render_status(frame, layout[2], state);

    if state.is_loading() {
        loading.render(frame, layout[3]);
    } else {
        frame.render_widget(
            Paragraph::new(hints(state))
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL)),
            layout[3],
        );
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut state = SessionState::default();
    let loading = Loading::default();
    let service_url = Config::get(ConfigKey::ServiceURL);

    loop {
        terminal.draw(|frame| {
            render(frame, &state, &loading, &service_url);
        })?;

        let event = events.next().await?;
        let res = transition(state, event);
        state = res.new_state;
        for action in res.actions {
            tx.send(action)?;
        }

        if state.should_quit {
            break;
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
