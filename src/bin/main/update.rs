//! The terminal application updater: turns key presses into app controls.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use termsweeper::{Direction, MinesweeperError};

/// The controls the app has to support. Each key press is turned into exactly one of them.
pub trait ControlsSupport {
    fn move_cursor(&mut self, direction: Direction);
    fn perform_main_action(&mut self) -> Result<(), MinesweeperError>;
    fn perform_secondary_action(&mut self) -> Result<(), MinesweeperError>;
    fn leave(&mut self, force: bool);
}

pub fn update<C: ControlsSupport>(app: &mut C, key_event: KeyEvent) -> Result<(), MinesweeperError> {
    use Direction::*;

    match key_event.code {
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => app.leave(true),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => app.move_cursor(Up),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => app.move_cursor(Left),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => app.move_cursor(Down),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => app.move_cursor(Right),
        KeyCode::Enter | KeyCode::Char(' ') => app.perform_main_action()?,
        KeyCode::Char('f') => app.perform_secondary_action()?,
        KeyCode::Esc | KeyCode::Char('q') => app.leave(false),
        _ => {}
    };

    Ok(())
}
