use crate::events::{GameEvent, GameObserver};
use crate::symbol::{Alphabet, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    Default,
    Highlight,
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteCell {
    pub symbol: Symbol,
    pub state: NoteState,
}

/// What the screen shows, rebuilt purely from engine notifications
#[derive(Debug, Clone)]
pub struct StaffView {
    pub lines: Vec<Symbol>,
    pub total_levels: usize,
    pub level: usize,
    pub score: u32,
    pub status: String,
    pub notes: Vec<NoteCell>,
    pub won: bool,
}

impl StaffView {
    pub fn new(alphabet: &Alphabet, total_levels: usize) -> Self {
        Self {
            lines: alphabet.symbols().to_vec(),
            total_levels,
            level: 0,
            score: 0,
            status: String::new(),
            notes: Vec::new(),
            won: false,
        }
    }

    /// Staff line a symbol sits on, counted from the top
    pub fn line_of(&self, symbol: Symbol) -> Option<usize> {
        let pos = self.lines.iter().position(|s| *s == symbol)?;
        Some(self.lines.len() - 1 - pos)
    }

    pub fn level_label(&self) -> String {
        format!("Level: {} / {}", self.level + 1, self.total_levels)
    }

    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    fn set_state(&mut self, index: usize, state: NoteState) {
        if let Some(note) = self.notes.get_mut(index) {
            note.state = state;
        }
    }
}

impl GameObserver for StaffView {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::LevelStarted(level) => self.level = *level,
            GameEvent::LevelCompleted(level) => {
                self.level = (level + 1).min(self.total_levels.saturating_sub(1))
            }
            GameEvent::SequencePrepared(sequence) => {
                self.notes = sequence
                    .iter()
                    .map(|symbol| NoteCell {
                        symbol,
                        state: NoteState::Default,
                    })
                    .collect();
            }
            GameEvent::NotePlaybackStart(idx, _) => self.set_state(*idx, NoteState::Highlight),
            GameEvent::NotePlaybackEnd(idx, _) => self.set_state(*idx, NoteState::Default),
            GameEvent::InputFeedback(idx, true) => self.set_state(*idx, NoteState::Correct),
            GameEvent::InputFeedback(idx, false) => {
                // the rest of the attempt is lost, show it all in red
                for i in *idx..self.notes.len() {
                    self.set_state(i, NoteState::Wrong);
                }
            }
            GameEvent::StatusChanged(message) => self.status = message.clone(),
            GameEvent::ScoreChanged(score) => self.score = *score,
            GameEvent::GameWon(score) => {
                self.score = *score;
                self.won = true;
            }
            GameEvent::ClearRequested => {
                self.notes.clear();
                self.won = false;
            }
        }
    }
}
