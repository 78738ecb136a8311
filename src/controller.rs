use std::time::Duration;
use tracing::trace;

use crate::domain::{AppConfig, AppError, Message};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, AppError> {
        if !event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(None);
        }
        match event::read()? {
            // crossterm also emits key release and repeat events on Windows
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                if model.raw_keyevents() {
                    Ok(Some(Message::RawKey(key)))
                } else {
                    Ok(self.handle_key(key))
                }
            }
            Event::Resize(width, height) => {
                Ok(Some(Message::Resize(width as usize, height as usize)))
            }
            _ => Ok(None),
        }
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Esc => Some(Message::Exit),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Char('/') => Some(Message::Search),
            KeyCode::Left | KeyCode::Char('h') => Some(Message::MoveLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(Message::MoveRight),
            KeyCode::Enter | KeyCode::Char('s') => Some(Message::Sort),
            KeyCode::PageDown | KeyCode::Char('n') => Some(Message::NextPage),
            KeyCode::PageUp | KeyCode::Char('p') => Some(Message::PreviousPage),
            KeyCode::Home | KeyCode::Char('g') => Some(Message::FirstPage),
            KeyCode::End | KeyCode::Char('G') => Some(Message::LastPage),
            KeyCode::Char('+') => Some(Message::GrowPageSize),
            KeyCode::Char('-') => Some(Message::ShrinkPageSize),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_navigation_keys() {
        let c = Controller::new(&AppConfig::default());
        assert_eq!(c.handle_key(key(KeyCode::Char('q'))), Some(Message::Quit));
        assert_eq!(c.handle_key(key(KeyCode::PageDown)), Some(Message::NextPage));
        assert_eq!(c.handle_key(key(KeyCode::Char('p'))), Some(Message::PreviousPage));
        assert_eq!(c.handle_key(key(KeyCode::Enter)), Some(Message::Sort));
        assert_eq!(c.handle_key(key(KeyCode::Char('+'))), Some(Message::GrowPageSize));
        assert_eq!(c.handle_key(key(KeyCode::Char('x'))), None);
    }
}
