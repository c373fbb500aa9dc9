//! The terminal lifecycle: raw mode, the alternate screen and drawing.

use crate::event::EventHandler;
use color_eyre::Result;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, Stderr};
use std::panic;

pub type CrosstermTerminal = Terminal<CrosstermBackend<Stderr>>;

/// Anything that can draw itself into a frame.
pub trait Render {
    fn render(&mut self, frame: &mut Frame);
}

pub struct Tui {
    terminal: CrosstermTerminal,
    pub events: EventHandler,
}

impl Tui {
    pub fn new(terminal: CrosstermTerminal, events: EventHandler) -> Self {
        Tui { terminal, events }
    }

    /// Switches the terminal into raw mode and the alternate screen. A panic hook restores the terminal before the
    /// panic message gets printed.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(io::stderr(), EnterAlternateScreen)?;

        let panic_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic| {
            // Nothing else to do if even that fails.
            let _ = Self::reset();
            panic_hook(panic);
        }));

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;

        Ok(())
    }

    fn reset() -> Result<()> {
        terminal::disable_raw_mode()?;
        crossterm::execute!(io::stderr(), LeaveAlternateScreen)?;

        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        Self::reset()?;
        self.terminal.show_cursor()?;

        Ok(())
    }

    pub fn draw<R: Render>(&mut self, app: &mut R) -> Result<()> {
        self.terminal.draw(|frame| app.render(frame))?;

        Ok(())
    }
}
