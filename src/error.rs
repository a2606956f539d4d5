/// Configuration problems detected before a game can be built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("alphabet must contain at least one key")]
    EmptyAlphabet,

    #[error("key '{0}' appears more than once in the alphabet")]
    DuplicateSymbol(char),

    #[error("key {0:?} cannot be used as an answer key")]
    InvalidSymbol(char),

    #[error("{name} must be a positive number of seconds, got {value}")]
    NonPositiveDuration { name: &'static str, value: f64 },

    #[error("{name} must be zero or more seconds, got {value}")]
    NegativeDelay { name: &'static str, value: f64 },

    #[error("starting sequence length must be at least 1")]
    ZeroStartingLength,

    #[error("a game needs at least one level")]
    ZeroLevels,

    #[error("a game can have at most {max} levels, got {levels}")]
    TooManyLevels { levels: usize, max: usize },

    #[error("the last level's sequence must be at most {max} notes long")]
    SequenceTooLong { max: usize },

    #[error("time limit must be a positive number of seconds, got {0}")]
    InvalidTimeLimit(f64),
}
