use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use env_logger::{Env, Target};
use guessword::{
    app::App,
    app_dirs::AppDirs,
    config::AppConfig,
    loader::{load_all, resolve_source, validate_loaded_data},
    runtime::{CrosstermEventSource, EventSource, FixedTicker, GameEvent, Runner, Ticker},
    validate::{validate_data, ValidateOptions},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    process,
};

/// two pictures, one compound word: guess it before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// directory holding app.config.json, strings and puzzles (default: embedded data)
    #[clap(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// locale to load strings and puzzles for (default: from app.config.json)
    #[clap(short = 'l', long, global = true)]
    locale: Option<String>,

    /// mode to start in; must be one of the enabled modes
    #[clap(short = 'm', long)]
    mode: Option<String>,

    /// seed for a reproducible puzzle order
    #[clap(long)]
    seed: Option<u64>,

    /// length of a timed round in seconds
    #[clap(short = 't', long, value_name = "SECS")]
    timer: Option<u32>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// check the data files (and optionally the image files) and exit
    Validate {
        /// directory the image paths are relative to
        #[clap(long, value_name = "DIR")]
        public_dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Fold the command line overrides into the loaded config
    fn apply_overrides(&self, config: &mut AppConfig) -> Result<(), String> {
        if let Some(mode) = &self.mode {
            if !config.enabled_modes.contains(mode) {
                return Err(format!(
                    "mode \"{mode}\" is not enabled (available: {})",
                    config.enabled_modes.join(", ")
                ));
            }
        }
        if let Some(seed) = self.seed {
            config.selection.seed = Some(seed);
        }
        if let Some(secs) = self.timer {
            if secs == 0 {
                return Err("timer must be at least one second".to_string());
            }
            config.timer.default = secs;
        }
        Ok(())
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    // The TUI owns the terminal, so everything goes to the log file.
    env_logger::Builder::from_env(Env::default().filter_or("GUESSWORD_LOG", "info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let source = resolve_source(cli.data_dir.clone());

    if let Some(Command::Validate { public_dir }) = &cli.command {
        let options = ValidateOptions {
            locale: cli.locale.clone(),
            public_dir: public_dir.clone(),
        };
        let report = validate_data(source.as_ref(), &options);
        report.print(&mut io::stdout())?;
        if report.has_errors() {
            process::exit(1);
        }
        return Ok(());
    }

    let mut data = match load_all(source.as_ref(), cli.locale.as_deref())
        .and_then(|data| validate_loaded_data(&data).map(|_| data))
    {
        Ok(data) => data,
        Err(e) => {
            log::error!("{e}");
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::Io, e).exit();
        }
    };

    if let Err(message) = cli.apply_overrides(&mut data.app) {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, message).exit();
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(data, cli.mode.clone())?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        let redraw = match runner.step() {
            GameEvent::Tick(elapsed) => {
                app.on_tick(elapsed)?;
                // The clock and any running effect change every tick.
                app.game().is_some_and(|g| g.time_left().is_some()) || app.is_animating()
            }
            GameEvent::Resize => {
                let size = terminal.size()?;
                app.resize(size.width, size.height);
                true
            }
            GameEvent::Key(key) => {
                app.handle_key(key)?;
                true
            }
        };

        if redraw && !app.should_quit {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
