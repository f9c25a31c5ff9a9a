use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use typeace::clock::ManualTimeSource;
use typeace::keymap::{self, Command};
use typeace::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use typeace::tracker::Rejection;
use typeace::{InputOutcome, Session, SessionState};

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

/// Feed one event through the keymap into the session, the way the app does
fn dispatch(session: &mut Session<ManualTimeSource>, event: &AppEvent) -> Option<InputOutcome> {
    let typed = session.typed_string();
    let mut last = None;
    for command in keymap::translate(event, &typed) {
        match command {
            Command::Input(value) => last = Some(session.input(&value)),
            Command::CapsLock(on) => session.set_caps_lock(on),
            Command::FocusGained => session.focus_gained(),
            Command::FocusLost => session.focus_lost(),
            Command::Tick => session.tick(),
            Command::Restart => session.restart(),
            _ => {}
        }
    }
    last
}

// Headless integration using the runtime + session without a TTY
#[test]
fn headless_typing_flow_completes() {
    let time = ManualTimeSource::new();
    let mut session = Session::with_time_source(time.clone());
    session.load_passage("hi").unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key('h')).unwrap();
    tx.send(key('i')).unwrap();

    for _ in 0..100u32 {
        let event = runner.step();
        if event == AppEvent::Tick {
            time.advance_secs(1.0);
        }
        dispatch(&mut session, &event);
        if session.state() == SessionState::Finished {
            break;
        }
    }

    assert_eq!(session.state(), SessionState::Finished);
    let results = session.results().expect("results after finish");
    assert_eq!(results.error_count, 0);
    assert_eq!(results.accuracy_percent, 100.0);
    assert!(results.wpm >= 0.0);
}

#[test]
fn focus_loss_holds_the_clock_across_the_gap() {
    let time = ManualTimeSource::new();
    let mut session = Session::with_time_source(time.clone());
    session.load_passage("cat dog").unwrap();

    for c in "cat".chars() {
        dispatch(&mut session, &key(c));
    }
    time.advance_secs(10.0);
    dispatch(&mut session, &AppEvent::Tick);
    dispatch(&mut session, &AppEvent::FocusLost);
    assert_eq!(session.state(), SessionState::Paused);

    // ticks while away must not count
    for _ in 0..5 {
        time.advance_secs(1.0);
        dispatch(&mut session, &AppEvent::Tick);
    }
    assert_eq!(
        dispatch(&mut session, &key(' ')),
        Some(InputOutcome::Rejected(Rejection::Unfocused))
    );

    dispatch(&mut session, &AppEvent::FocusGained);
    assert_eq!(session.state(), SessionState::Running);
    for c in " dog".chars() {
        dispatch(&mut session, &key(c));
    }
    time.advance_secs(2.0);

    assert_eq!(session.state(), SessionState::Finished);
    assert!((session.elapsed_secs() - 10.0).abs() < 1e-6);
}

#[test]
fn pasted_text_never_reaches_the_session() {
    let time = ManualTimeSource::new();
    let mut session = Session::with_time_source(time);
    session.load_passage("cat dog").unwrap();

    assert_eq!(
        dispatch(&mut session, &AppEvent::Paste("cat dog".into())),
        None
    );
    assert!(session.typed().is_empty());
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn restart_key_resets_progress() {
    let time = ManualTimeSource::new();
    let mut session = Session::with_time_source(time.clone());
    session.load_passage("hello").unwrap();

    dispatch(&mut session, &key('h'));
    time.advance_secs(3.0);
    dispatch(&mut session, &AppEvent::Tick);
    dispatch(
        &mut session,
        &AppEvent::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)),
    );

    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.elapsed_secs(), 0.0);
    assert!(session.typed().is_empty());
}
