//! The sequence memory state machine.
//!
//! A game is a fixed number of levels, each with a sequence generated up
//! front. Every level is played back note by note through timed
//! continuations, then the player repeats it. A wrong key replays the same
//! level; a complete, correct answer scores `level + 1` and moves on.
//!
//! The engine never blocks and owns no clock: the host drives it with
//! [`SequenceMemoryEngine::tick`] and feeds it input with
//! [`SequenceMemoryEngine::submit_input`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::events::{GameEvent, GameObserver, ObserverSet, Subscription};
use crate::scheduler::{Continuation, RoutineToken, Scheduler};
use crate::sequence::{timeline, NoteEvent, PlaybackTiming, Sequence};
use crate::session::{GameSession, Outcome};
use crate::symbol::{Alphabet, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EngineState {
    Idle,
    PlayingSequence,
    WaitingForInput,
    ShowingResult,
}

/// What happened to a submitted symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Not accepting input right now, or the symbol is not in the alphabet
    Ignored,
    /// Correct so far, more symbols to go
    Accepted,
    /// Wrong symbol; the same level replays after a delay
    Wrong,
    /// Level finished; the next one starts after a delay
    LevelComplete,
    /// Final level finished
    GameWon,
}

#[derive(Debug)]
pub struct SequenceMemoryEngine<R: Rng = StdRng> {
    config: GameConfig,
    alphabet: Alphabet,
    timing: PlaybackTiming,
    rng: R,
    sequences: Vec<Sequence>,
    player_input: Vec<Symbol>,
    session: GameSession,
    state: EngineState,
    scheduler: Scheduler,
    active: Option<RoutineToken>,
    observers: ObserverSet,
}

impl SequenceMemoryEngine<StdRng> {
    /// Build an engine, seeding from `config.seed` or from entropy
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> SequenceMemoryEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        let alphabet = config.validate()?;
        let timing = PlaybackTiming::from(&config);
        Ok(Self {
            config,
            alphabet,
            timing,
            rng,
            sequences: Vec::new(),
            player_input: Vec::new(),
            session: GameSession::default(),
            state: EngineState::Idle,
            scheduler: Scheduler::new(),
            active: None,
            observers: ObserverSet::new(),
        })
    }

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) -> Subscription {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    /// Reset score and level, generate every level's sequence and start playing level 0
    pub fn start_new_game(&mut self) {
        self.cancel();
        self.session = GameSession::new(self.config.time_limit_secs);
        let sequences: Vec<Sequence> = (0..self.config.total_levels)
            .map(|level| self.generate(level))
            .collect();
        self.sequences = sequences;
        info!(
            levels = self.config.total_levels,
            time_limit = ?self.config.time_limit_secs,
            "new game"
        );
        self.emit(GameEvent::ScoreChanged(0));
        self.start_level();
    }

    /// Start again after the game has ended. Returns false while a game is still running.
    pub fn restart(&mut self) -> bool {
        if !self.is_terminal() {
            return false;
        }
        self.start_new_game();
        true
    }

    /// Draw a fresh sequence sized for `level_index`
    pub fn generate(&mut self, level_index: usize) -> Sequence {
        let length = self.config.sequence_length(level_index);
        Sequence::generate(&mut self.rng, &self.alphabet, length)
    }

    /// Note onsets and durations for playing `level_index`, measured from the level start
    pub fn playback_timeline(&self, level_index: usize) -> Option<Vec<NoteEvent>> {
        self.sequences
            .get(level_index)
            .map(|seq| timeline(seq, self.timing))
    }

    /// Feed a symbol entered by the player
    pub fn submit_input(&mut self, symbol: Symbol) -> InputResult {
        if self.state != EngineState::WaitingForInput {
            debug!(%symbol, state = %self.state, "input dropped");
            return InputResult::Ignored;
        }
        if !self.alphabet.contains(symbol) {
            debug!(%symbol, "input outside alphabet");
            return InputResult::Ignored;
        }

        let level = self.session.level_index;
        let index = self.player_input.len();
        let Some(sequence) = self.sequences.get(level) else {
            warn!(level, "no sequence for current level");
            return InputResult::Ignored;
        };
        let Some(expected) = sequence.get(index) else {
            warn!(level, index, "input past end of sequence");
            return InputResult::Ignored;
        };
        let sequence_len = sequence.len();

        self.player_input.push(symbol);
        let correct = symbol == expected;
        self.emit(GameEvent::InputFeedback(index, correct));

        if !correct {
            debug!(level, index, %symbol, %expected, "wrong answer");
            self.state = EngineState::ShowingResult;
            self.emit(GameEvent::StatusChanged(
                "Wrong! Restarting this level...".to_string(),
            ));
            self.schedule(self.config.delay_after_wrong_secs, Continuation::StartLevel);
            return InputResult::Wrong;
        }

        if self.player_input.len() < sequence_len {
            return InputResult::Accepted;
        }

        let points = self.session.complete_level();
        debug!(level, points, score = self.session.score, "level complete");
        self.emit(GameEvent::ScoreChanged(self.session.score));
        self.emit(GameEvent::LevelCompleted(level));

        if self.session.level_index >= self.sequences.len() {
            self.win();
            return InputResult::GameWon;
        }

        self.state = EngineState::ShowingResult;
        self.emit(GameEvent::StatusChanged(
            "Correct! Get ready for the next level...".to_string(),
        ));
        self.schedule(
            self.config.delay_after_correct_secs,
            Continuation::StartLevel,
        );
        InputResult::LevelComplete
    }

    /// Advance time by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        if self.state == EngineState::Idle {
            return;
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        if self.session.count_down(dt) {
            self.time_out();
            return;
        }

        let mut budget = dt;
        while let Some((token, continuation)) = self.scheduler.poll(&mut budget) {
            self.resume(token, continuation);
        }
    }

    /// Cancel the active playback or delay routine, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.active.take() {
            if self.scheduler.cancel(token) {
                debug!(?token, "cancelled routine");
            }
        }
    }

    /// Tear down: cancel pending work, release every observer and go idle
    pub fn dispose(&mut self) {
        self.cancel();
        self.scheduler.cancel_all();
        self.observers.clear();
        self.sequences.clear();
        self.player_input.clear();
        self.session = GameSession::default();
        self.state = EngineState::Idle;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn sequence(&self, level_index: usize) -> Option<&Sequence> {
        self.sequences.get(level_index)
    }

    pub fn current_sequence(&self) -> Option<&Sequence> {
        self.sequence(self.session.level_index)
    }

    pub fn player_input(&self) -> &[Symbol] {
        &self.player_input
    }

    pub fn total_levels(&self) -> usize {
        self.config.total_levels
    }

    pub fn has_active_routine(&self) -> bool {
        self.active.is_some_and(|t| self.scheduler.is_pending(t))
    }

    pub fn is_terminal(&self) -> bool {
        self.session.is_over()
    }

    fn start_level(&mut self) {
        self.cancel();
        let level = self.session.level_index;
        debug!(level, "level started");
        self.emit(GameEvent::LevelStarted(level));
        self.state = EngineState::PlayingSequence;
        self.player_input.clear();
        self.emit(GameEvent::ClearRequested);
        self.emit(GameEvent::StatusChanged(format!(
            "Watch & Listen... (Level {})",
            level + 1
        )));
        self.schedule(
            self.config.delay_before_input_secs,
            Continuation::RevealSequence,
        );
    }

    fn resume(&mut self, token: RoutineToken, continuation: Continuation) {
        if self.active != Some(token) {
            warn!(?token, ?continuation, "dropping stale continuation");
            return;
        }
        self.active = None;

        match continuation {
            Continuation::RevealSequence => {
                if let Some(sequence) = self.current_sequence().cloned() {
                    self.emit(GameEvent::SequencePrepared(sequence));
                }
                self.sound_note(0);
            }
            Continuation::NoteOff(index) => {
                if let Some(symbol) = self.current_sequence().and_then(|s| s.get(index)) {
                    self.emit(GameEvent::NotePlaybackEnd(index, symbol));
                }
                self.schedule(
                    self.config.pause_between_notes_secs,
                    Continuation::NextNote(index),
                );
            }
            Continuation::NextNote(index) => self.sound_note(index + 1),
            Continuation::OpenInput => {
                self.state = EngineState::WaitingForInput;
                debug!(level = self.session.level_index, "waiting for input");
                self.emit(GameEvent::StatusChanged(format!(
                    "Your turn! Repeat the sequence ({})",
                    self.alphabet.key_list()
                )));
            }
            Continuation::StartLevel => self.start_level(),
        }
    }

    /// Sound note `index`, or hand over to the player once past the end
    fn sound_note(&mut self, index: usize) {
        match self.current_sequence().and_then(|s| s.get(index)) {
            Some(symbol) => {
                self.emit(GameEvent::NotePlaybackStart(index, symbol));
                self.schedule(self.config.note_duration_secs, Continuation::NoteOff(index));
            }
            None => self.schedule(
                self.config.delay_before_input_secs,
                Continuation::OpenInput,
            ),
        }
    }

    fn win(&mut self) {
        self.cancel();
        self.state = EngineState::ShowingResult;
        self.session.outcome = Some(Outcome::Won);
        let score = self.session.score;
        info!(score, "game won");
        self.emit(GameEvent::GameWon(score));
        self.emit(GameEvent::StatusChanged(format!(
            "You Win! Final score: {score}. Press Space to play again."
        )));
    }

    fn time_out(&mut self) {
        self.cancel();
        self.state = EngineState::ShowingResult;
        info!(
            score = self.session.score,
            level = self.session.level_index,
            "time is up"
        );
        self.emit(GameEvent::StatusChanged(
            "Time's up! Press Space to restart.".to_string(),
        ));
    }

    fn schedule(&mut self, delay: f64, continuation: Continuation) {
        self.cancel();
        self.active = Some(self.scheduler.schedule(delay, continuation));
    }

    fn emit(&mut self, event: GameEvent) {
        self.observers.emit(event);
    }
}
