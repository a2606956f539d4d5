use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use refrain::app::{App, AppAction};
use refrain::config::GameConfig;
use refrain::runtime::{Command, HostEvent, Runner, TestEventSource};
use refrain::session::Outcome;
use refrain::EngineState;

fn fast_config() -> GameConfig {
    GameConfig {
        note_duration_secs: 0.01,
        pause_between_notes_secs: 0.0,
        delay_before_input_secs: 0.0,
        delay_after_wrong_secs: 0.0,
        delay_after_correct_secs: 0.0,
        starting_length: 2,
        length_increase_per_level: 0,
        total_levels: 1,
        seed: Some(21),
        ..GameConfig::default()
    }
}

fn key(app: &App, c: char) -> HostEvent {
    let command = app
        .keymap()
        .translate(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
        .unwrap();
    HostEvent::Command(command)
}

// Headless integration using the internal runtime + App without a TTY
// Verifies that a minimal game completes via Runner/TestEventSource.
#[test]
fn headless_game_flow_completes() {
    let mut app = App::new(fast_config()).unwrap();
    app.start();

    // Let playback finish before any keys are queued
    app.on_tick(1.0);
    assert_eq!(app.state(), EngineState::WaitingForInput);
    let answer = app.engine.current_sequence().unwrap().clone();

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));
    for symbol in answer.iter() {
        tx.send(key(&app, symbol.as_char())).unwrap();
    }

    for _ in 0..100u32 {
        let frame = runner.next_frame();
        app.on_tick(frame.elapsed);
        if let Some(command) = frame.command {
            app.on_command(command);
        }
        if app.engine.is_terminal() {
            break;
        }
    }

    assert_eq!(app.engine.session().outcome, Some(Outcome::Won));
    assert_eq!(app.engine.session().score, 1);
    let view = app.view.borrow();
    assert!(view.won);
    assert!(view.status.starts_with("You Win! Final score: 1"));
}

#[test]
fn headless_wrong_key_replays_level() {
    let mut app = App::new(fast_config()).unwrap();
    app.start();
    app.on_tick(1.0);
    let answer = app.engine.current_sequence().unwrap().clone();
    let wrong = app
        .engine
        .alphabet()
        .symbols()
        .iter()
        .copied()
        .find(|s| *s != answer[0])
        .unwrap();

    app.on_key(KeyEvent::new(
        KeyCode::Char(wrong.as_char()),
        KeyModifiers::NONE,
    ));
    assert_eq!(app.state(), EngineState::ShowingResult);

    // zero delay: the next tick restarts the level and plays it back
    app.on_tick(1.0);
    assert_eq!(app.state(), EngineState::WaitingForInput);
    assert!(app.engine.player_input().is_empty());
    assert_eq!(app.engine.current_sequence(), Some(&answer));
}

#[test]
fn headless_timed_game_runs_out() {
    let mut app = App::new(GameConfig {
        time_limit_secs: Some(0.05),
        ..fast_config()
    })
    .unwrap();
    app.start();

    let (_tx, rx) = mpsc::channel();
    let mut runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(10));

    for _ in 0..50u32 {
        let frame = runner.next_frame();
        assert_eq!(frame.command, None);
        app.on_tick(frame.elapsed);
        if app.engine.is_terminal() {
            break;
        }
    }

    assert_eq!(app.engine.session().outcome, Some(Outcome::TimedOut));
    assert_eq!(app.view.borrow().status, "Time's up! Press Space to restart.");
}

#[test]
fn headless_escape_quits() {
    let mut app = App::new(fast_config()).unwrap();
    app.start();
    assert_eq!(
        app.on_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
        AppAction::Quit
    );
    assert_eq!(app.on_command(Command::Quit), AppAction::Quit);
}
