use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::KeyEvent;

use crate::config::GameConfig;
use crate::engine::{EngineState, InputResult, SequenceMemoryEngine};
use crate::error::ConfigError;
use crate::events::Subscription;
use crate::runtime::{Command, KeyMap};
use crate::ui::staff::StaffView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Engine plus the view subscribed to it
pub struct App {
    pub engine: SequenceMemoryEngine,
    pub view: Rc<RefCell<StaffView>>,
    keymap: KeyMap,
    subscription: Subscription,
}

impl App {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let mut engine = SequenceMemoryEngine::new(config)?;
        let view = Rc::new(RefCell::new(StaffView::new(
            engine.alphabet(),
            engine.total_levels(),
        )));
        let subscription = engine.subscribe(Box::new(view.clone()));
        let keymap = KeyMap::new(engine.alphabet().clone());
        Ok(Self {
            engine,
            view,
            keymap,
            subscription,
        })
    }

    pub fn start(&mut self) {
        self.engine.start_new_game();
    }

    pub fn on_tick(&mut self, dt: f64) {
        self.engine.tick(dt);
    }

    /// Key bindings for this game's alphabet
    pub fn keymap(&self) -> KeyMap {
        self.keymap.clone()
    }

    pub fn on_command(&mut self, command: Command) -> AppAction {
        match command {
            Command::Quit => return AppAction::Quit,
            Command::Answer(symbol) => {
                if self.engine.submit_input(symbol) == InputResult::Ignored {
                    tracing::trace!(%symbol, "key ignored");
                }
            }
            Command::Restart => {
                self.engine.restart();
            }
            Command::NewGame => self.engine.start_new_game(),
        }
        AppAction::Continue
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        match self.keymap.translate(&key) {
            Some(command) => self.on_command(command),
            None => AppAction::Continue,
        }
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Unsubscribe the view and stop the engine
    pub fn shutdown(&mut self) {
        self.engine.unsubscribe(self.subscription);
        self.engine.dispose();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
