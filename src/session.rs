/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Outcome {
    Won,
    TimedOut,
}

/// Progress of one game, reset by every new game
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub level_index: usize,
    pub score: u32,
    pub outcome: Option<Outcome>,
    pub time_remaining: Option<f64>,
}

impl GameSession {
    pub fn new(time_limit: Option<f64>) -> Self {
        Self {
            level_index: 0,
            score: 0,
            outcome: None,
            time_remaining: time_limit,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Award the current level and move past it. Returns the points awarded.
    pub fn complete_level(&mut self) -> u32 {
        let points = self.level_index as u32 + 1;
        self.score += points;
        self.level_index += 1;
        points
    }

    /// Count the clock down. Returns true the moment it runs out.
    pub fn count_down(&mut self, dt: f64) -> bool {
        if self.is_over() {
            return false;
        }
        match self.time_remaining.as_mut() {
            Some(remaining) => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    *remaining = 0.0;
                    self.outcome = Some(Outcome::TimedOut);
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_level_scores_level_number() {
        let mut session = GameSession::default();
        assert_eq!(session.complete_level(), 1);
        assert_eq!(session.complete_level(), 2);
        assert_eq!(session.complete_level(), 3);
        assert_eq!(session.score, 6);
        assert_eq!(session.level_index, 3);
    }

    #[test]
    fn test_count_down_without_limit_never_expires() {
        let mut session = GameSession::new(None);
        assert!(!session.count_down(1_000.0));
        assert_eq!(session.outcome, None);
    }

    #[test]
    fn test_count_down_expires_once() {
        let mut session = GameSession::new(Some(1.0));
        assert!(!session.count_down(0.6));
        assert!(session.count_down(0.6));
        assert_eq!(session.time_remaining, Some(0.0));
        assert_eq!(session.outcome, Some(Outcome::TimedOut));
        assert!(!session.count_down(0.6));
    }

    #[test]
    fn test_count_down_stops_after_win() {
        let mut session = GameSession::new(Some(1.0));
        session.outcome = Some(Outcome::Won);
        assert!(!session.count_down(5.0));
        assert_eq!(session.time_remaining, Some(1.0));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Won.to_string(), "Won");
        assert_eq!(Outcome::TimedOut.to_string(), "TimedOut");
    }
}
