#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;

use crate::domain::models::Event;

/// Maps a key press to the intent it stands for. Releases and repeats are
/// dropped so one physical press never submits twice.
pub fn key_to_event(key: KeyEvent) -> Option<Event> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(Event::KeyboardCTRLC()),
            KeyCode::Char('r') => return Some(Event::KeyboardCTRLR()),
            _ => return None,
        }
    }

    match key.code {
        KeyCode::Enter => return Some(Event::KeyboardEnter()),
        KeyCode::Char(' ') => return Some(Event::KeyboardSpace()),
        KeyCode::Char(digit @ '1'..='9') => {
            return digit
                .to_digit(10)
                .map(|n| return Event::KeyboardDigit(n as usize));
        }
        KeyCode::Up | KeyCode::Char('k') => return Some(Event::UIScrollUp()),
        KeyCode::Down | KeyCode::Char('j') => return Some(Event::UIScrollDown()),
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('b') => {
            return Some(Event::KeyboardBack());
        }
        KeyCode::Char('r') => return Some(Event::KeyboardRestart()),
        KeyCode::Char('e') => return Some(Event::KeyboardToggleDetails()),
        KeyCode::Char('q') | KeyCode::Esc => return Some(Event::KeyboardQuit()),
        _ => return None,
    }
}

pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    fn handle_crossterm(&self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(key) => return key_to_event(key),
            CrosstermEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
                MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
                _ => return None,
            },
            CrosstermEvent::Resize(_, _) => return Some(Event::UIResize()),
            _ => return None,
        }
    }

    /// Waits for the next worker outcome, terminal input or UI tick.
    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => self.handle_crossterm(input),
                    Some(Err(err)) => {
                        tracing::warn!(error = ?err, "Failed to read terminal event");
                        None
                    },
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
