mod ui;

use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    event::{
        DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn};

use typeace::{
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, Settings},
    keymap::{self, Command},
    language::{Language, WordList},
    logging,
    runtime::{AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    text_source::{FixedSource, ResilientSource, TextSource, WordListSource},
    InputOutcome, Session,
};

/// typing speed test with live correctness feedback
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing speed test for the terminal. Timing pauses while the terminal is unfocused or Caps Lock is on; results report wpm, cpm, accuracy and errors."
)]
pub struct Cli {
    /// number of words in each passage (overrides the saved setting)
    #[clap(short = 'w', long)]
    word_count: Option<usize>,

    /// language to pull words from (overrides the saved setting)
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// refuse deletions while typing (saved for later runs)
    #[clap(long)]
    backspace_off: bool,

    /// custom passage to type instead of random words
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// period of the timer tick in milliseconds
    #[clap(long, default_value_t = 1000)]
    tick_ms: u64,

    /// settings file to use instead of the platform default
    #[clap(long)]
    config: Option<PathBuf>,

    /// merge WORDS into the word list JSON file at this path, then exit
    #[clap(long, value_name = "WORD_LIST")]
    add_words: Option<PathBuf>,

    /// words for --add-words
    #[clap(requires = "add_words")]
    words: Vec<String>,
}

impl Cli {
    /// Saved settings with command line overrides applied
    fn apply_to(&self, mut settings: Settings) -> Settings {
        if let Some(n) = self.word_count {
            settings.word_count = n;
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
        if self.backspace_off {
            settings.backspace_disabled = true;
        }
        settings.sanitized()
    }

    fn text_source(&self) -> ResilientSource {
        let primary: Box<dyn TextSource> = match self.prompt.as_ref() {
            Some(prompt) => Box::new(FixedSource::new(prompt.clone())),
            None => Box::new(WordListSource),
        };
        ResilientSource::new(primary)
    }
}

pub struct App {
    pub session: Session,
    pub settings: Settings,
    source: ResilientSource,
    store: Box<dyn ConfigStore>,
}

impl App {
    pub fn new(cli: &Cli, store: Box<dyn ConfigStore>) -> Self {
        let stored = store.load();
        let settings = cli.apply_to(stored);

        let mut app = Self {
            session: Session::new(),
            settings,
            source: cli.text_source(),
            store,
        };
        if settings != stored {
            app.persist();
        }
        app.session
            .set_backspace_disabled(app.settings.backspace_disabled);
        app.new_text();
        app
    }

    pub fn new_text(&mut self) {
        self.session.request_passage(
            &mut self.source,
            self.settings.word_count,
            self.settings.language,
        );
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.settings) {
            warn!(target: "config", error = %err, "settings_save_failed");
        }
    }

    /// Apply one command; returns true when the app should exit
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Input(value) => {
                if let InputOutcome::Finished(results) = self.session.input(&value) {
                    info!(target: "app", wpm = results.wpm.round(), accuracy = results.accuracy_percent.round(), "results_ready");
                }
            }
            Command::CapsLock(on) => self.session.set_caps_lock(on),
            Command::FocusGained => self.session.focus_gained(),
            Command::FocusLost => self.session.focus_lost(),
            Command::NewText => self.new_text(),
            Command::Restart => self.session.restart(),
            Command::CycleWordCount => {
                self.settings.word_count = self.settings.next_word_count();
                self.persist();
                self.new_text();
            }
            Command::CycleLanguage => {
                self.settings.language = self.settings.language.next();
                self.persist();
                self.new_text();
            }
            Command::ToggleBackspace => {
                self.settings.backspace_disabled = !self.settings.backspace_disabled;
                self.persist();
                self.session
                    .set_backspace_disabled(self.settings.backspace_disabled);
            }
            Command::Tick => self.session.tick(),
            Command::Redraw => {}
            Command::Quit => return true,
        }
        false
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = cli.add_words.as_ref() {
        let added = WordList::add_to_file(path, &cli.words)?;
        println!("Added {added} word(s) to {}", path.display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = AppDirs::log_dir().and_then(|dir| logging::init(&dir));
    info!(target: "app", version = env!("CARGO_PKG_VERSION"), "startup");

    let store: Box<dyn ConfigStore> = match cli.config.as_ref() {
        Some(path) => Box::new(FileConfigStore::with_path(path)),
        None => Box::new(FileConfigStore::new()),
    };
    let mut app = App::new(&cli, store);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(err) = execute!(
        stdout,
        EnterAlternateScreen,
        EnableFocusChange,
        EnableBracketedPaste
    ) {
        let _ = restore_terminal(&mut stdout, false);
        return Err(err.into());
    }
    // Lock key state is only reported through the kitty keyboard protocol;
    // terminals without it simply never report Caps Lock.
    let keyboard_enhanced = execute!(
        stdout,
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES,
        )
    )
    .is_ok();
    info!(target: "app", keyboard_enhanced, "terminal_ready");

    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = restore_terminal(&mut io::stdout(), keyboard_enhanced);
            return Err(err.into());
        }
    };

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(cli.tick_ms.max(1))),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    restore_terminal(terminal.backend_mut(), keyboard_enhanced)?;
    terminal.show_cursor()?;

    result
}

/// Undo raw mode and every terminal mode `main` turns on
fn restore_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) -> io::Result<()> {
    if keyboard_enhanced {
        let _ = execute!(out, PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(
        out,
        DisableBracketedPaste,
        DisableFocusChange,
        LeaveAlternateScreen,
        Show,
    )
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let event = runner.step();
        let typed = app.session.typed_string();
        for command in keymap::translate(&event, &typed) {
            if app.apply(command) {
                info!(target: "app", "quit");
                return Ok(());
            }
        }
    }
}
