use ratatui::Frame;

use crate::{app::App, ui::ResultBanner};

/// A UI Screen boundary: responsible for rendering one phase of the game
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Playback and answering - the staff, header and status line
pub struct PlayScreen;

impl Screen for PlayScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Game over - the final staff with a result banner on top
pub struct ResultScreen;

impl Screen for ResultScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
        if let Some(outcome) = app.engine.session().outcome {
            let banner = ResultBanner {
                outcome,
                score: app.engine.session().score,
            };
            f.render_widget(banner, f.area());
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(app: &App) -> Box<dyn Screen> {
    if app.engine.is_terminal() {
        Box::new(ResultScreen)
    } else {
        Box::new(PlayScreen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_play_screen_shows_header_and_status() {
        let mut app = App::new(GameConfig {
            seed: Some(1),
            ..GameConfig::default()
        })
        .unwrap();
        app.start();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| current_screen(&app).render(&app, f))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Level: 1 / 5"));
        assert!(text.contains("Score: 0"));
        assert!(text.contains("Watch & Listen... (Level 1)"));
    }

    #[test]
    fn test_result_screen_after_timeout() {
        let mut app = App::new(GameConfig {
            time_limit_secs: Some(0.5),
            seed: Some(1),
            ..GameConfig::default()
        })
        .unwrap();
        app.start();
        app.on_tick(1.0);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| current_screen(&app).render(&app, f))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Time's up!"));
        assert!(text.contains("final score 0"));
    }
}
