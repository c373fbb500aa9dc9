pub mod app;
pub mod event;
pub mod game_ui;
pub mod tui;
pub mod update;

use app::App;
use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use event::{Event, EventHandler};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::File, path::Path, path::PathBuf, sync::Mutex};
use tracing::Level;
use tui::Tui;
use update::update;

const DEFAULT_ROWS_AMOUNT: u8 = 23;
const DEFAULT_COLUMNS_AMOUNT: u8 = 30;
const DEFAULT_MINES_AMOUNT: u16 = 99;
/// How often (in milliseconds) the screen gets redrawn without any input.
const TICK_RATE: u64 = 250;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The number of rows
    #[arg(short = 'H', long, default_value_t = DEFAULT_ROWS_AMOUNT)]
    height: u8,
    /// The number of columns
    #[arg(short, long, default_value_t = DEFAULT_COLUMNS_AMOUNT)]
    width: u8,
    /// The number of mines
    #[arg(short, long, default_value_t = DEFAULT_MINES_AMOUNT)]
    mines: u16,
    /// Seed for the mines placement, to replay the same games
    #[arg(short, long)]
    seed: Option<u64>,
    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// The most verbose level to log
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    init_logging(args.log_file.as_deref(), args.log_level)?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Create the terminal application. Bad parameters are reported before the terminal gets touched.
    let mut app = App::new(args.height, args.width, args.mines, rng)
        .wrap_err("Couldn't create the game. Bad parameters?")?;

    // Initialize the terminal user interface.
    let backend = CrosstermBackend::new(std::io::stderr());
    let terminal = Terminal::new(backend)?;
    let events = EventHandler::new(TICK_RATE);
    let mut tui = Tui::new(terminal, events);
    tui.enter()?;

    let result = run(&mut tui, &mut app);

    // Exit the user interface, even if the loop failed.
    tui.exit()?;
    result
}

/// The main loop: draw, wait for an event, apply it.
fn run(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(app)?;

        match tui.events.next()? {
            Event::Key(key_event) => update(app, key_event)?,
            // nothing to do, the next iteration redraws the screen
            Event::Tick | Event::Resize(_, _) => {}
        };
    }

    Ok(())
}

/// Logs go to a file, if one is given. Otherwise they are dropped.
fn init_logging(log_file: Option<&Path>, level: Level) -> Result<()> {
    if let Some(path) = log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("Couldn't create the log file {}", path.display()))?;

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    Ok(())
}
