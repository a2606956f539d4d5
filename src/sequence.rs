use rand::Rng;
use std::ops::Index;

use crate::config::GameConfig;
use crate::symbol::{Alphabet, Symbol};

/// The target pattern for one level
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequence(Vec<Symbol>);

impl Sequence {
    /// Draw `length` symbols uniformly from `alphabet`, with replacement.
    /// Adjacent repeats are allowed.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, alphabet: &Alphabet, length: usize) -> Self {
        let symbols = alphabet.symbols();
        Sequence(
            (0..length)
                .map(|_| symbols[rng.gen_range(0..symbols.len())])
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Symbol> {
        self.0.get(idx).copied()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().copied()
    }
}

impl Index<usize> for Sequence {
    type Output = Symbol;

    fn index(&self, idx: usize) -> &Symbol {
        &self.0[idx]
    }
}

impl From<Vec<Symbol>> for Sequence {
    fn from(symbols: Vec<Symbol>) -> Self {
        Sequence(symbols)
    }
}

impl FromIterator<Symbol> for Sequence {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Sequence(iter.into_iter().collect())
    }
}

/// Pacing of a playback round, in seconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackTiming {
    pub note_duration: f64,
    pub pause_between_notes: f64,
    pub delay_before_input: f64,
}

impl PlaybackTiming {
    /// Wall time from the level starting until input opens
    pub fn total(&self, notes: usize) -> f64 {
        self.delay_before_input * 2.0
            + notes as f64 * (self.note_duration + self.pause_between_notes)
    }
}

impl From<&GameConfig> for PlaybackTiming {
    fn from(cfg: &GameConfig) -> Self {
        Self {
            note_duration: cfg.note_duration_secs,
            pause_between_notes: cfg.pause_between_notes_secs,
            delay_before_input: cfg.delay_before_input_secs,
        }
    }
}

/// One note of a playback round. `onset` is measured from the level start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteEvent {
    pub index: usize,
    pub symbol: Symbol,
    pub onset: f64,
    pub duration: f64,
}

/// Lay out when each note of `sequence` sounds during playback
pub fn timeline(sequence: &Sequence, timing: PlaybackTiming) -> Vec<NoteEvent> {
    let step = timing.note_duration + timing.pause_between_notes;
    sequence
        .iter()
        .enumerate()
        .map(|(index, symbol)| NoteEvent {
            index,
            symbol,
            onset: timing.delay_before_input + index as f64 * step,
            duration: timing.note_duration,
        })
        .collect()
}
