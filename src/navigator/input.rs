// src/navigator/input.rs
//! Input channels. Every channel reduces to an [`Intent`]; only the
//! navigator turns intents into state changes.

use crate::ingest::types::SourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
}

impl Key {
    /// Key names as keyboard events report them. Other keys are ignored.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowLeft" => Some(Key::ArrowLeft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavButton {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Swipe(SwipeDirection),
    Click(NavButton),
    SelectTab(SourceId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Forward,
    Backward,
    Select(SourceId),
}

impl InputEvent {
    pub fn intent(self) -> Intent {
        match self {
            InputEvent::Key(Key::ArrowRight)
            | InputEvent::Swipe(SwipeDirection::Left)
            | InputEvent::Click(NavButton::Next) => Intent::Forward,
            InputEvent::Key(Key::ArrowLeft)
            | InputEvent::Swipe(SwipeDirection::Right)
            | InputEvent::Click(NavButton::Previous) => Intent::Backward,
            InputEvent::SelectTab(source) => Intent::Select(source),
        }
    }
}
