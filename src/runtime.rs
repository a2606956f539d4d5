//! Terminal input and frame pacing for the game loop.
//!
//! Raw key presses are translated into [`Command`]s as they are read, so the
//! rest of the game only ever sees answers, restarts and quits.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::symbol::{Alphabet, Symbol, RESTART_KEY};

/// Something the player asked the game to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Answer(Symbol),
    Restart,
    NewGame,
    Quit,
}

/// Translates key presses into commands for one alphabet.
///
/// Answer keys win over `n`: when `N` is in the alphabet it is an answer,
/// never a new game.
#[derive(Clone, Debug)]
pub struct KeyMap {
    alphabet: Alphabet,
}

impl KeyMap {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    pub fn translate(&self, key: &KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            KeyCode::Char(c) => {
                if let Some(symbol) = self.alphabet.map_key(c) {
                    Some(Command::Answer(symbol))
                } else if c == RESTART_KEY {
                    Some(Command::Restart)
                } else if c.eq_ignore_ascii_case(&'n') {
                    Some(Command::NewGame)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Command(Command),
    Resize,
}

pub trait HostEventSource {
    /// Wait up to `timeout` for the next event. `None` means nothing arrived.
    fn next_event(&self, timeout: Duration) -> Option<HostEvent>;
}

/// Reads the terminal on a background thread, dropping keys that map to nothing
pub struct CrosstermEventSource {
    rx: Receiver<HostEvent>,
}

impl CrosstermEventSource {
    pub fn new(keymap: KeyMap) -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let event = match event::read() {
                Ok(CtEvent::Key(key)) => match keymap.translate(&key) {
                    Some(command) => HostEvent::Command(command),
                    None => {
                        tracing::trace!(code = ?key.code, "unbound key");
                        continue;
                    }
                },
                Ok(CtEvent::Resize(_, _)) => HostEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!(%err, "terminal event reader stopped");
                    break;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl HostEventSource for CrosstermEventSource {
    fn next_event(&self, timeout: Duration) -> Option<HostEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Feeds pre-translated events from a channel, for driving the game without a terminal
pub struct TestEventSource {
    rx: Receiver<HostEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<HostEvent>) -> Self {
        Self { rx }
    }
}

impl HostEventSource for TestEventSource {
    fn next_event(&self, timeout: Duration) -> Option<HostEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                // keep pacing like an idle terminal once the script runs dry
                std::thread::sleep(timeout);
                None
            }
        }
    }
}

/// One pass of the game loop: the wall time since the last frame and
/// whatever the player did in it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub elapsed: f64,
    pub command: Option<Command>,
}

/// Paces the game loop. Each frame waits at most one tick for input.
pub struct Runner<E: HostEventSource> {
    source: E,
    tick_rate: Duration,
    last_frame: Instant,
}

impl<E: HostEventSource> Runner<E> {
    pub fn new(source: E, tick_rate: Duration) -> Self {
        Self {
            source,
            tick_rate,
            last_frame: Instant::now(),
        }
    }

    /// Restart elapsed-time measurement, e.g. right after a game starts
    pub fn reset_clock(&mut self) {
        self.last_frame = Instant::now();
    }

    pub fn next_frame(&mut self) -> Frame {
        let command = match self.source.next_event(self.tick_rate) {
            Some(HostEvent::Command(command)) => Some(command),
            Some(HostEvent::Resize) | None => None,
        };
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        Frame { elapsed, command }
    }
}
