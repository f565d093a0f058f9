use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;
use tracing::{trace, warn};

use crate::domain::{Message, TVConfig, TVError};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
    loads: Receiver<Message>,
}

impl Controller {
    pub fn new(cfg: &TVConfig, loads: Receiver<Message>) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
            loads,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, TVError> {
        match self.loads.try_recv() {
            Ok(message) => return Ok(Some(message)),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => warn!("Loader channel disconnected"),
        }

        if event::poll(Duration::from_millis(self.event_poll_time))? {
            match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    return Ok(self.handle_key(model, key));
                }
                Event::Resize(width, height) => {
                    return Ok(Some(Message::Resize(width as usize, height as usize)));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn handle_key(&self, model: &Model, key: event::KeyEvent) -> Option<Message> {
        let message = if model.raw_keyevents() {
            Some(Message::RawKey(key))
        } else if model.in_dialog() {
            Self::map_dialog_key(key)
        } else {
            Self::map_table_key(key)
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }

    fn map_table_key(key: event::KeyEvent) -> Option<Message> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            (KeyCode::Char('/'), _) => Some(Message::Search),
            (KeyCode::Char(':'), _) => Some(Message::GotoPage),
            (KeyCode::Char('f'), _) => Some(Message::FilterDialog),
            (KeyCode::Char('x'), _) => Some(Message::ClearFilters),
            (KeyCode::Char('n'), _) | (KeyCode::PageDown, _) => Some(Message::NextPage),
            (KeyCode::Char('p'), _) | (KeyCode::PageUp, _) => Some(Message::PrevPage),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(Message::FirstPage),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(Message::LastPage),
            (KeyCode::Char('s'), _) => Some(Message::SortAscending),
            (KeyCode::Char('S'), _) => Some(Message::SortDescending),
            (KeyCode::Char('u'), _) => Some(Message::ClearSort),
            (KeyCode::Char('r'), _) => Some(Message::Reload),
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => Some(Message::MoveLeft),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => Some(Message::MoveRight),
            (KeyCode::Enter, _) => Some(Message::Enter),
            (KeyCode::Esc, _) => Some(Message::Exit),
            _ => None,
        }
    }

    fn map_dialog_key(key: event::KeyEvent) -> Option<Message> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => Some(Message::Exit),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => Some(Message::MoveUp),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Some(Message::MoveDown),
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => Some(Message::MoveLeft),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => Some(Message::MoveRight),
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => Some(Message::SwitchFocus),
            (KeyCode::Enter, _) => Some(Message::Enter),
            (KeyCode::Delete, _) | (KeyCode::Char('d'), _) => Some(Message::Delete),
            (KeyCode::Char('x'), _) => Some(Message::ClearFilters),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn table_keys() {
        assert!(matches!(
            Controller::map_table_key(key(KeyCode::Char('/'))),
            Some(Message::Search)
        ));
        assert!(matches!(
            Controller::map_table_key(key(KeyCode::PageDown)),
            Some(Message::NextPage)
        ));
        assert!(matches!(
            Controller::map_table_key(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(Message::LastPage)
        ));
        assert!(Controller::map_table_key(key(KeyCode::F(5))).is_none());
    }

    #[test]
    fn dialog_keys() {
        assert!(matches!(
            Controller::map_dialog_key(key(KeyCode::Esc)),
            Some(Message::Exit)
        ));
        assert!(matches!(
            Controller::map_dialog_key(key(KeyCode::Tab)),
            Some(Message::SwitchFocus)
        ));
        assert!(matches!(
            Controller::map_dialog_key(key(KeyCode::Char('d'))),
            Some(Message::Delete)
        ));
    }
}
