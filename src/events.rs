use std::cell::RefCell;
use std::rc::Rc;

use crate::sequence::Sequence;
use crate::symbol::Symbol;

/// Notifications pushed to the presentation layer
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelStarted(usize),
    LevelCompleted(usize),
    SequencePrepared(Sequence),
    NotePlaybackStart(usize, Symbol),
    NotePlaybackEnd(usize, Symbol),
    InputFeedback(usize, bool),
    StatusChanged(String),
    ScoreChanged(u32),
    GameWon(u32),
    /// Presentation should discard whatever it has drawn
    ClearRequested,
}

/// Receiver of engine notifications. Called synchronously from inside the engine.
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

/// Adapts a closure into an observer
pub struct FnObserver<F>(pub F);

impl<F: FnMut(&GameEvent)> GameObserver for FnObserver<F> {
    fn on_event(&mut self, event: &GameEvent) {
        (self.0)(event)
    }
}

/// Share one observer between the engine and whoever reads it back
impl<T: GameObserver> GameObserver for Rc<RefCell<T>> {
    fn on_event(&mut self, event: &GameEvent) {
        self.borrow_mut().on_event(event)
    }
}

/// Handle returned by `subscribe`; pass it back to `unsubscribe`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

#[derive(Default)]
pub struct ObserverSet {
    next_id: u64,
    observers: Vec<(Subscription, Box<dyn GameObserver>)>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != subscription);
        self.observers.len() != before
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn emit(&mut self, event: GameEvent) {
        tracing::trace!(?event, "emit");
        for (_, observer) in self.observers.iter_mut() {
            observer.on_event(&event);
        }
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Observer that records every event, handy for hosts that poll and for tests
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<EventLog>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl GameObserver for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}
