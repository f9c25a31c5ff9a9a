use itertools::{EitherOrBoth, Itertools};
use tracing::debug;

use crate::error::SessionError;

/// The fixed text for one session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Passage {
    text: String,
    chars: Vec<char>,
}

impl Passage {
    pub fn new(text: impl Into<String>) -> Result<Self, SessionError> {
        let text = text.into();
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Err(SessionError::EmptyPassage);
        }
        Ok(Self { text, chars })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    Untyped,
}

/// Why an input update was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    Finished,
    Loading,
    CapsLock,
    Unfocused,
    BackspaceDisabled,
}

/// Conditions under which the tracker must refuse input, as seen by the session
#[derive(Clone, Copy, Debug, Default)]
pub struct InputGate {
    pub finished: bool,
    pub loading: bool,
    pub caps_lock: bool,
    pub unfocused: bool,
    pub backspace_disabled: bool,
}

impl InputGate {
    fn blocking(&self) -> Option<Rejection> {
        if self.finished {
            Some(Rejection::Finished)
        } else if self.loading {
            Some(Rejection::Loading)
        } else if self.caps_lock {
            Some(Rejection::CapsLock)
        } else if self.unfocused {
            Some(Rejection::Unfocused)
        } else {
            None
        }
    }
}

/// Holds what the user has typed so far against the passage.
#[derive(Debug, Default)]
pub struct InputTracker {
    passage: Option<Passage>,
    typed: Vec<char>,
    completed: bool,
}

impl InputTracker {
    pub fn new(passage: Passage) -> Self {
        Self {
            passage: Some(passage),
            typed: Vec::new(),
            completed: false,
        }
    }

    /// Replace the stored input with `value`, the full current typed string.
    pub fn update(&mut self, value: &str, gate: InputGate) -> Result<(), Rejection> {
        if let Some(reason) = gate.blocking() {
            return Err(reason);
        }
        let Some(passage) = self.passage.as_ref() else {
            return Err(Rejection::Loading);
        };

        let mut next: Vec<char> = value.chars().collect();
        if gate.backspace_disabled && next.len() < self.typed.len() {
            return Err(Rejection::BackspaceDisabled);
        }
        if next.len() > passage.len() {
            debug!(
                target: "tracker",
                typed = next.len(),
                passage = passage.len(),
                "input_truncated"
            );
            next.truncate(passage.len());
        }

        self.typed = next;
        Ok(())
    }

    /// Fires once, the first time the input reaches the passage length while running.
    pub fn check_completion(&mut self, running: bool) -> bool {
        if self.completed || !running {
            return false;
        }
        match self.passage.as_ref() {
            Some(passage) if self.typed.len() >= passage.len() => {
                self.completed = true;
                true
            }
            _ => false,
        }
    }

    pub fn char_states(&self) -> Vec<CharState> {
        let Some(passage) = self.passage.as_ref() else {
            return Vec::new();
        };
        passage
            .chars()
            .iter()
            .zip_longest(self.typed.iter())
            .filter_map(|pair| match pair {
                EitherOrBoth::Both(expected, typed) if expected == typed => {
                    Some(CharState::Correct)
                }
                EitherOrBoth::Both(_, _) => Some(CharState::Incorrect),
                EitherOrBoth::Left(_) => Some(CharState::Untyped),
                EitherOrBoth::Right(_) => None,
            })
            .collect()
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn typed_string(&self) -> String {
        self.typed.iter().collect()
    }

    pub fn passage(&self) -> Option<&Passage> {
        self.passage.as_ref()
    }
}
