use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use tracing::debug;

use crate::runtime::AppEvent;

/// What the app should do in response to one terminal event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// The full typed string after this keystroke
    Input(String),
    CapsLock(bool),
    FocusGained,
    FocusLost,
    NewText,
    Restart,
    CycleWordCount,
    CycleLanguage,
    ToggleBackspace,
    Tick,
    Redraw,
    Quit,
}

/// Caps Lock state carried by a key event, when the terminal reports it.
///
/// Only the kitty keyboard protocol carries lock state. Plain character
/// events often arrive with an empty state, so only modifier and CapsLock
/// key events are trusted to report it turning off.
pub fn caps_lock_probe(key: &KeyEvent) -> Option<bool> {
    if key.state.contains(KeyEventState::CAPS_LOCK) {
        Some(true)
    } else if matches!(key.code, KeyCode::Modifier(_) | KeyCode::CapsLock) {
        Some(false)
    } else {
        None
    }
}

/// Translate `event` given the text typed so far. Caps Lock probing comes
/// first so a keystroke made with Caps Lock on is already blocked.
pub fn translate(event: &AppEvent, typed: &str) -> Vec<Command> {
    match event {
        AppEvent::Key(key) => {
            let mut commands = Vec::with_capacity(2);
            if let Some(on) = caps_lock_probe(key) {
                commands.push(Command::CapsLock(on));
            }
            if key.kind != KeyEventKind::Release {
                commands.extend(translate_key(key, typed));
            }
            commands
        }
        AppEvent::Paste(text) => {
            debug!(target: "keymap", chars = text.chars().count(), "paste_suppressed");
            vec![Command::Redraw]
        }
        AppEvent::FocusGained => vec![Command::FocusGained],
        AppEvent::FocusLost => vec![Command::FocusLost],
        AppEvent::Resize => vec![Command::Redraw],
        AppEvent::Tick => vec![Command::Tick],
    }
}

fn translate_key(key: &KeyEvent, typed: &str) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if ctrl => Some(Command::Quit),
        KeyCode::Char('r') if ctrl => Some(Command::NewText),
        KeyCode::Char('w') if ctrl => Some(Command::CycleWordCount),
        KeyCode::Char('l') if ctrl => Some(Command::CycleLanguage),
        KeyCode::Char('b') if ctrl => Some(Command::ToggleBackspace),
        KeyCode::Right => Some(Command::NewText),
        KeyCode::Left => Some(Command::Restart),
        KeyCode::Backspace if ctrl || alt => Some(Command::Input(delete_word(typed))),
        KeyCode::Backspace => {
            let mut next = typed.to_string();
            next.pop();
            Some(Command::Input(next))
        }
        KeyCode::Char(c) if !ctrl && !alt => {
            let mut next = String::with_capacity(typed.len() + c.len_utf8());
            next.push_str(typed);
            // kitty reports the base key with SHIFT unless alternate keys are on
            if shift && c.is_lowercase() {
                next.extend(c.to_uppercase());
            } else {
                next.push(c);
            }
            Some(Command::Input(next))
        }
        _ => None,
    }
}

/// `typed` with its last word removed, along with any spaces after it
fn delete_word(typed: &str) -> String {
    let trimmed = typed.trim_end_matches(' ');
    let cut = trimmed.rfind(' ').map_or(0, |i| i + 1);
    trimmed[..cut].to_string()
}
