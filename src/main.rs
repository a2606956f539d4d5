use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use refrain::{
    app::{App, AppAction},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, GameConfig},
    logging,
    runtime::{CrosstermEventSource, Runner},
    ui::screen::current_screen,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 50;

/// terminal music memory game: watch the staff, then play the sequence back
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Notes light up on a staff one after another. Repeat them with the answer keys. Every level adds notes; a wrong key replays the level."
)]
pub struct Cli {
    /// number of levels in a game
    #[clap(short = 'l', long)]
    levels: Option<usize>,

    /// number of notes in the first level
    #[clap(short = 's', long)]
    starting_length: Option<usize>,

    /// notes added per level
    #[clap(short = 'i', long)]
    length_increase: Option<usize>,

    /// answer keys, lowest staff line first
    #[clap(short = 'k', long)]
    keys: Option<String>,

    /// end the game after this many seconds
    #[clap(short = 't', long)]
    time_limit: Option<f64>,

    /// play without a time limit, even if the config file sets one
    #[clap(long, conflicts_with = "time_limit")]
    no_time_limit: bool,

    /// seconds each note is shown
    #[clap(long)]
    note_duration: Option<f64>,

    /// seconds between notes
    #[clap(long)]
    note_pause: Option<f64>,

    /// seconds before playback and before input opens
    #[clap(long)]
    input_delay: Option<f64>,

    /// seconds before a failed level replays
    #[clap(long)]
    wrong_delay: Option<f64>,

    /// seconds before the next level starts
    #[clap(long)]
    correct_delay: Option<f64>,

    /// seed for reproducible sequences
    #[clap(long)]
    seed: Option<u64>,

    /// config file to read (and write with --save-config)
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the resulting settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line values over `base`
    fn apply(&self, base: GameConfig) -> GameConfig {
        GameConfig {
            total_levels: self.levels.unwrap_or(base.total_levels),
            starting_length: self.starting_length.unwrap_or(base.starting_length),
            length_increase_per_level: self
                .length_increase
                .unwrap_or(base.length_increase_per_level),
            keys: self.keys.clone().unwrap_or(base.keys),
            time_limit_secs: if self.no_time_limit {
                None
            } else {
                self.time_limit.or(base.time_limit_secs)
            },
            note_duration_secs: self.note_duration.unwrap_or(base.note_duration_secs),
            pause_between_notes_secs: self.note_pause.unwrap_or(base.pause_between_notes_secs),
            delay_before_input_secs: self.input_delay.unwrap_or(base.delay_before_input_secs),
            delay_after_wrong_secs: self.wrong_delay.unwrap_or(base.delay_after_wrong_secs),
            delay_after_correct_secs: self
                .correct_delay
                .unwrap_or(base.delay_after_correct_secs),
            seed: self.seed.or(base.seed),
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        logging::init(&path);
    }

    let store = cli.config_store();
    let config = cli.apply(store.load());
    if let Err(err) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, err).exit();
    }
    if cli.save_config {
        store.save(&config)?;
        tracing::info!(path = %store.path().display(), "saved config");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(config)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(app.keymap()),
        Duration::from_millis(TICK_RATE_MS),
    );

    app.start();
    runner.reset_clock();

    loop {
        let frame = runner.next_frame();
        app.on_tick(frame.elapsed);

        if let Some(command) = frame.command {
            if app.on_command(command) == AppAction::Quit {
                break;
            }
        }

        terminal.draw(|f| current_screen(app).render(app, f))?;
    }

    app.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["refrain"]);
        assert_eq!(cli.levels, None);
        assert_eq!(cli.keys, None);
        assert!(!cli.save_config);
        assert_eq!(cli.apply(GameConfig::default()), GameConfig::default());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "refrain", "-l", "3", "-s", "2", "-k", "asdf", "-t", "30", "--seed", "9",
        ]);
        let base = GameConfig {
            total_levels: 7,
            delay_after_wrong_secs: 2.0,
            ..GameConfig::default()
        };
        let cfg = cli.apply(base);
        assert_eq!(cfg.total_levels, 3);
        assert_eq!(cfg.starting_length, 2);
        assert_eq!(cfg.keys, "asdf");
        assert_eq!(cfg.time_limit_secs, Some(30.0));
        assert_eq!(cfg.seed, Some(9));
        // untouched values come from the config file
        assert_eq!(cfg.delay_after_wrong_secs, 2.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_cli_clears_saved_time_limit() {
        let base = GameConfig {
            time_limit_secs: Some(60.0),
            ..GameConfig::default()
        };
        let cli = Cli::parse_from(["refrain"]);
        assert_eq!(cli.apply(base.clone()).time_limit_secs, Some(60.0));

        let cli = Cli::parse_from(["refrain", "--no-time-limit"]);
        assert_eq!(cli.apply(base).time_limit_secs, None);

        assert!(Cli::try_parse_from(["refrain", "-t", "30", "--no-time-limit"]).is_err());
    }

    #[test]
    fn test_cli_timing_flags() {
        let cli = Cli::parse_from([
            "refrain",
            "--note-duration",
            "0.3",
            "--note-pause",
            "0.1",
            "--input-delay",
            "0.25",
            "--wrong-delay",
            "1",
            "--correct-delay",
            "0.75",
        ]);
        let cfg = cli.apply(GameConfig::default());
        assert_eq!(cfg.note_duration_secs, 0.3);
        assert_eq!(cfg.pause_between_notes_secs, 0.1);
        assert_eq!(cfg.delay_before_input_secs, 0.25);
        assert_eq!(cfg.delay_after_wrong_secs, 1.0);
        assert_eq!(cfg.delay_after_correct_secs, 0.75);
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["refrain", "--config", "/tmp/x.json", "--save-config"]);
        assert!(cli.save_config);
        assert_eq!(
            cli.config_store().path(),
            std::path::Path::new("/tmp/x.json")
        );
    }

    #[test]
    fn test_cli_command_is_well_formed() {
        Cli::command().debug_assert();
    }
}
